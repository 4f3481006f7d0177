//! GPS link state
//!
//! Advances as the receiver is heard from and produces timestamps; only the
//! silence watchdog moves it back to `Unavailable`.

/// Receiver link state
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    /// Nothing received within the watchdog window
    Unavailable,
    /// Bytes arriving, no valid timestamp yet
    Syncing,
    /// Valid timestamps, receiver never reported a lock
    Active,
    /// Receiver has reported a lock; PPS edges are trustworthy
    TimeGood,
}

impl LinkState {
    /// A byte arrived from the receiver
    ///
    /// Returns the new state and whether the link just came back from
    /// `Unavailable`, in which case the synchronizer must restart.
    pub fn on_byte(self) -> (Self, bool) {
        match self {
            LinkState::Unavailable => (LinkState::Syncing, true),
            other => (other, false),
        }
    }

    /// A valid timestamp or lock report was decoded
    pub fn on_decoded(self, locked: bool) -> Self {
        match (self, locked) {
            (LinkState::TimeGood, _) => LinkState::TimeGood,
            (_, true) => LinkState::TimeGood,
            (_, false) => LinkState::Active,
        }
    }

    /// The silence watchdog expired
    pub fn on_silence(self) -> Self {
        LinkState::Unavailable
    }

    pub fn is_time_good(self) -> bool {
        self == LinkState::TimeGood
    }
}
