//! Receiver start-up configuration
//!
//! Sent once at boot. Both sequences are sent regardless of which receiver is
//! attached; each receiver ignores the other's commands.

/// TSIP 0x8E-A5: enable only the 0x8F-AB primary timing packet
pub const BINARY_INIT: [u8; 9] = [0x10, 0x8E, 0xA5, 0x00, 0x01, 0x00, 0x00, 0x10, 0x03];

/// Magellan output selection: silence everything except the `A00` time and
/// `H00` status sentences, which are enabled every 2 seconds
pub const TEXT_INIT: &[u8] = b"$PMGLI,00,G00,0,A\r\n\
$PMGLI,00,B00,0,A\r\n\
$PMGLI,00,B02,0,A\r\n\
$PMGLI,00,D00,0,A\r\n\
$PMGLI,00,E00,0,A\r\n\
$PMGLI,00,F02,0,A\r\n\
$PMGLI,00,R04,0,A\r\n\
$PMGLI,00,S01,0,A\r\n\
$PMGLI,00,A00,2,B\r\n\
$PMGLI,00,H00,2,B\r\n";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_init_is_framed() {
        assert_eq!(BINARY_INIT[0], crate::tsip::DLE);
        assert_eq!(&BINARY_INIT[7..], &[crate::tsip::DLE, crate::tsip::ETX]);
    }

    #[test]
    fn test_text_init_commands() {
        let commands = TEXT_INIT
            .split(|&b| b == b'\n')
            .filter(|line| !line.is_empty());
        let mut count = 0;
        for command in commands {
            assert!(command.starts_with(b"$PMGLI,00,"));
            assert!(command.ends_with(b"\r"));
            count += 1;
        }
        assert_eq!(count, 10);
    }
}
