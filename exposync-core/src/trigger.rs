//! Exposure trigger output
//!
//! Drives the camera's download line. The pin is raised when an exposure
//! ends and lowered again once the pulse width has elapsed; the timing of
//! the pulse belongs to the caller.

use embedded_hal::digital::OutputPin;

/// Camera trigger line
pub struct TriggerOutput<P> {
    pin: P,
    active: bool,
    pulses: u32,
}

impl<P: OutputPin> TriggerOutput<P> {
    /// Take ownership of the pin and drive it to idle
    pub fn new(mut pin: P) -> Result<Self, P::Error> {
        pin.set_low()?;
        Ok(Self {
            pin,
            active: false,
            pulses: 0,
        })
    }

    /// Raise the trigger line
    pub fn fire(&mut self) -> Result<(), P::Error> {
        self.pin.set_high()?;
        if !self.active {
            self.pulses = self.pulses.wrapping_add(1);
        }
        self.active = true;
        Ok(())
    }

    /// Lower the trigger line
    pub fn release(&mut self) -> Result<(), P::Error> {
        self.pin.set_low()?;
        self.active = false;
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Pulses started since creation
    pub fn pulses(&self) -> u32 {
        self.pulses
    }
}
