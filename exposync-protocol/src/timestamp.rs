//! UTC timestamp published by the decoders

/// A UTC second as reported by the receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timestamp {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
    pub day: u8,
    pub month: u8,
    pub year: u16,
    /// Receiver has a valid position/time fix
    pub locked: bool,
}
