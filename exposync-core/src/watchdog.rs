//! Serial silence watchdog
//!
//! Fed by every received byte and advanced by a periodic tick. Expires once
//! per silence period; feeding re-arms it.

/// Default silence window before the link is declared lost
pub const DEFAULT_TIMEOUT_MS: u32 = 4000;

/// Silence watchdog
#[derive(Debug, Clone)]
pub struct LinkWatchdog {
    timeout_ms: u32,
    silent_ms: u32,
    expired: bool,
}

impl Default for LinkWatchdog {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT_MS)
    }
}

impl LinkWatchdog {
    /// Create a watchdog with the given silence window
    ///
    /// Starts expired: the link is unavailable until the first byte.
    pub const fn new(timeout_ms: u32) -> Self {
        Self {
            timeout_ms,
            silent_ms: 0,
            expired: true,
        }
    }

    pub fn set_timeout(&mut self, timeout_ms: u32) {
        self.timeout_ms = timeout_ms;
    }

    /// A byte was received
    pub fn feed(&mut self) {
        self.silent_ms = 0;
        self.expired = false;
    }

    /// Advance time
    ///
    /// Returns `true` on the tick that crosses the silence window, and only
    /// on that tick.
    pub fn tick(&mut self, delta_ms: u32) -> bool {
        if self.expired {
            return false;
        }
        self.silent_ms = self.silent_ms.saturating_add(delta_ms);
        if self.silent_ms >= self.timeout_ms {
            self.expired = true;
            return true;
        }
        false
    }
}
