//! Exposure countdown controller
//!
//! Couples two independent event sources: the PPS edge, which marks the exact
//! start of a UTC second, and the timestamp decoded shortly afterwards, which
//! names that second. The countdown decrements once per second and fires the
//! exposure trigger when it reaches zero.
//!
//! ```text
//!   configure(n>0)          seconds % n == 0
//! ───────────────► Syncing ─────────────────► Enabled ◄──────┐
//!                                                │           │ timestamp
//!                                            PPS │           │
//!                                                ▼           │
//!                                            Triggered ──────┘
//! ```
//!
//! A PPS edge moves the countdown to `Triggered` ("edge seen this second").
//! The following timestamp moves it back to `Enabled`. A timestamp that finds
//! the countdown still `Enabled` means the edge never arrived; the missing
//! step is forced so the exposure stays on its second boundaries.

use crate::link::LinkState;

/// Countdown state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CountdownMode {
    /// No exposure length configured
    Disabled,
    /// Waiting for a second that is a multiple of the exposure length
    Syncing,
    /// Armed, waiting for the next PPS edge
    Enabled,
    /// PPS edge counted, waiting for its timestamp
    Triggered,
}

/// Exposure timing window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ExposureWindow {
    /// Seconds remaining in the current exposure
    pub count: u16,
    /// Configured exposure length in seconds
    pub total: u16,
    /// Waiting to align with an exposure boundary
    pub syncing: bool,
}

impl ExposureWindow {
    /// Seconds elapsed in the current exposure
    pub fn elapsed(&self) -> u16 {
        self.total.saturating_sub(self.count)
    }
}

/// What a timestamp did to the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimestampOutcome {
    /// The PPS edge for this second never arrived and was compensated
    pub missed_pps: bool,
    /// The compensating step ended an exposure
    pub fired: bool,
}

/// Exposure countdown state machine
#[derive(Debug, Clone)]
pub struct Countdown {
    mode: CountdownMode,
    window: ExposureWindow,
    /// Next timestamp is the exposure boundary
    record_synctime: bool,
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Countdown {
    pub const fn new() -> Self {
        Self {
            mode: CountdownMode::Disabled,
            window: ExposureWindow {
                count: 0,
                total: 0,
                syncing: true,
            },
            record_synctime: false,
        }
    }

    pub fn mode(&self) -> CountdownMode {
        self.mode
    }

    pub fn window(&self) -> ExposureWindow {
        self.window
    }

    /// Set the exposure length; 0 disables synchronization
    ///
    /// A non-zero length restarts alignment with the next boundary.
    pub fn configure(&mut self, total_s: u16) {
        self.window = ExposureWindow {
            count: total_s,
            total: total_s,
            syncing: true,
        };
        self.record_synctime = false;
        self.mode = if total_s == 0 {
            CountdownMode::Disabled
        } else {
            CountdownMode::Syncing
        };
    }

    /// Count one second; returns `true` when the exposure ends
    fn step(&mut self) -> bool {
        self.window.count = self.window.count.saturating_sub(1);
        if self.window.count == 0 {
            self.window.count = self.window.total;
            self.record_synctime = true;
            return true;
        }
        false
    }

    /// PPS rising edge
    ///
    /// Returns `true` when this edge ends an exposure and the trigger must
    /// fire.
    pub fn on_pps(&mut self, link: LinkState) -> bool {
        if !link.is_time_good() {
            return false;
        }
        match self.mode {
            CountdownMode::Enabled | CountdownMode::Triggered => {
                let fired = self.step();
                self.mode = CountdownMode::Triggered;
                fired
            }
            CountdownMode::Disabled | CountdownMode::Syncing => false,
        }
    }

    /// A valid timestamp for second `seconds` arrived
    pub fn on_timestamp(&mut self, seconds: u8, link: LinkState) -> TimestampOutcome {
        let mut outcome = TimestampOutcome::default();

        match self.mode {
            CountdownMode::Triggered => self.mode = CountdownMode::Enabled,
            CountdownMode::Enabled if link.is_time_good() => {
                // Stand in for the missing edge, then handle this timestamp
                // as if it had followed it
                outcome.missed_pps = true;
                outcome.fired = self.step();
            }
            CountdownMode::Syncing
                if link.is_time_good() && seconds as u16 % self.window.total == 0 =>
            {
                self.window.count = self.window.total;
                self.window.syncing = false;
                self.mode = CountdownMode::Enabled;
            }
            _ => {}
        }
        outcome
    }

    /// The link was lost; realign once it comes back
    pub fn on_link_lost(&mut self) {
        if self.mode != CountdownMode::Disabled {
            self.window.count = self.window.total;
            self.window.syncing = true;
            self.mode = CountdownMode::Syncing;
        }
        self.record_synctime = false;
    }

    /// Consume the "record the next timestamp as the boundary" flag
    pub fn take_record_synctime(&mut self) -> bool {
        core::mem::take(&mut self.record_synctime)
    }
}
