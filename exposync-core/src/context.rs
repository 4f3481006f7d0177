//! Shared device context
//!
//! All state touched from more than one execution context lives here: the
//! receive-interrupt side, the PPS edge handler, the watchdog tick, and the
//! main-loop GPS engine. Each field group sits behind a critical-section
//! mutex and every accessor is one short critical section. Nothing in here
//! logs; callers format diagnostics after the section ends.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use exposync_protocol::Timestamp;

use crate::countdown::{Countdown, CountdownMode, ExposureWindow};
use crate::link::LinkState;
use crate::ring::{RingBuffer, RingError};
use crate::watchdog::{LinkWatchdog, DEFAULT_TIMEOUT_MS};

/// Receive ring capacity
pub const RX_CAPACITY: usize = 256;
/// Transmit ring capacity
pub const TX_CAPACITY: usize = 256;

type Shared<T> = Mutex<CriticalSectionRawMutex, RefCell<T>>;

/// Timing state shared between the interrupt handlers and the main loop
#[derive(Debug, Clone)]
struct TimingState {
    timestamp: Option<Timestamp>,
    link: LinkState,
    countdown: Countdown,
    watchdog: LinkWatchdog,
    synctime: Option<Timestamp>,
    /// Link came back from silence; the decoder must start over
    resync_pending: bool,
}

impl TimingState {
    const fn new(watchdog_timeout_ms: u32) -> Self {
        Self {
            timestamp: None,
            link: LinkState::Unavailable,
            countdown: Countdown::new(),
            watchdog: LinkWatchdog::new(watchdog_timeout_ms),
            synctime: None,
            resync_pending: false,
        }
    }
}

/// What publishing a timestamp caused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Publication {
    /// This timestamp is an exposure boundary and was stored as synctime
    pub synchronized: bool,
    /// The PPS edge for this second never arrived
    pub missed_pps: bool,
    /// The compensating countdown step ended an exposure
    pub fired: bool,
}

/// Consistent copy of the timing state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Snapshot {
    /// Most recent valid timestamp
    pub timestamp: Option<Timestamp>,
    pub link: LinkState,
    pub mode: CountdownMode,
    pub window: ExposureWindow,
    /// Timestamp of the last exposure boundary
    pub synctime: Option<Timestamp>,
}

impl Snapshot {
    /// Seconds elapsed in the current exposure
    pub fn progress(&self) -> u16 {
        self.window.elapsed()
    }
}

/// Device-wide shared state
pub struct DeviceContext {
    rx: Shared<RingBuffer<RX_CAPACITY>>,
    tx: Shared<RingBuffer<TX_CAPACITY>>,
    timing: Shared<TimingState>,
}

impl Default for DeviceContext {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT_MS)
    }
}

impl DeviceContext {
    pub const fn new(watchdog_timeout_ms: u32) -> Self {
        Self {
            rx: Mutex::new(RefCell::new(RingBuffer::new())),
            tx: Mutex::new(RefCell::new(RingBuffer::new())),
            timing: Mutex::new(RefCell::new(TimingState::new(watchdog_timeout_ms))),
        }
    }

    // ---- Receive side ----

    /// A byte arrived from the receiver
    ///
    /// Feeds the watchdog and queues the byte. If the link was unavailable,
    /// stale bytes are dropped and the decoder is told to resynchronize.
    /// Returns `Err(Full)` if the byte had to be dropped.
    pub fn on_rx_byte(&self, byte: u8) -> Result<(), RingError> {
        self.timing.lock(|timing| {
            let mut timing = timing.borrow_mut();
            timing.watchdog.feed();
            let (link, woke) = timing.link.on_byte();
            timing.link = link;
            if woke {
                timing.resync_pending = true;
            }
            self.rx.lock(|rx| {
                let mut rx = rx.borrow_mut();
                if woke {
                    rx.clear();
                }
                rx.push(byte)
            })
        })
    }

    /// Next received byte, if any
    pub fn pop_rx(&self) -> Option<u8> {
        self.rx.lock(|rx| rx.borrow_mut().pop())
    }

    /// Number of received bytes waiting
    pub fn rx_pending(&self) -> usize {
        self.rx.lock(|rx| rx.borrow().len())
    }

    /// Consume the resynchronization request
    pub fn take_resync(&self) -> bool {
        self.timing
            .lock(|timing| core::mem::take(&mut timing.borrow_mut().resync_pending))
    }

    // ---- Transmit side ----

    /// Queue a byte for the receiver
    ///
    /// Returns `Err(Full)` without queueing; the caller waits for the drain
    /// side to make room and retries.
    pub fn try_queue_tx(&self, byte: u8) -> Result<(), RingError> {
        self.tx.lock(|tx| tx.borrow_mut().push(byte))
    }

    /// Next byte to transmit, if any
    pub fn pop_tx(&self) -> Option<u8> {
        self.tx.lock(|tx| tx.borrow_mut().pop())
    }

    pub fn tx_pending(&self) -> usize {
        self.tx.lock(|tx| tx.borrow().len())
    }

    // ---- PPS and watchdog ----

    /// PPS rising edge; returns `true` when the trigger must fire
    pub fn on_pps(&self) -> bool {
        self.timing.lock(|timing| {
            let mut timing = timing.borrow_mut();
            let link = timing.link;
            timing.countdown.on_pps(link)
        })
    }

    /// Advance the silence watchdog
    ///
    /// Returns `true` exactly once per silence period, when the link has just
    /// been declared unavailable.
    pub fn watchdog_tick(&self, delta_ms: u32) -> bool {
        self.timing.lock(|timing| {
            let mut timing = timing.borrow_mut();
            if !timing.watchdog.tick(delta_ms) {
                return false;
            }
            timing.link = timing.link.on_silence();
            timing.countdown.on_link_lost();
            true
        })
    }

    pub fn set_watchdog_timeout(&self, timeout_ms: u32) {
        self.timing
            .lock(|timing| timing.borrow_mut().watchdog.set_timeout(timeout_ms));
    }

    // ---- Decoder publication ----

    /// Publish a decoded timestamp
    pub fn publish_time(&self, ts: Timestamp) -> Publication {
        self.timing.lock(|timing| {
            let mut timing = timing.borrow_mut();
            let link = timing.link.on_decoded(ts.locked);
            timing.link = link;
            timing.timestamp = Some(ts);

            let outcome = timing.countdown.on_timestamp(ts.seconds, link);
            let synchronized = timing.countdown.take_record_synctime();
            if synchronized {
                timing.synctime = Some(ts);
            }
            Publication {
                synchronized,
                missed_pps: outcome.missed_pps,
                fired: outcome.fired,
            }
        })
    }

    /// Publish a changed lock report from a status sentence
    pub fn publish_lock(&self, locked: bool) {
        self.timing.lock(|timing| {
            let mut timing = timing.borrow_mut();
            if let Some(ts) = timing.timestamp.as_mut() {
                ts.locked = locked;
            }
            if locked && timing.link >= LinkState::Active {
                timing.link = LinkState::TimeGood;
            }
        });
    }

    // ---- Configuration and inspection ----

    /// Set the exposure length in seconds; 0 disables synchronization
    pub fn configure_exposure(&self, length_s: u16) {
        self.timing
            .lock(|timing| timing.borrow_mut().countdown.configure(length_s));
    }

    pub fn link_state(&self) -> LinkState {
        self.timing.lock(|timing| timing.borrow().link)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.timing.lock(|timing| {
            let timing = timing.borrow();
            Snapshot {
                timestamp: timing.timestamp,
                link: timing.link,
                mode: timing.countdown.mode(),
                window: timing.countdown.window(),
                synctime: timing.synctime,
            }
        })
    }
}
