//! Level control for a single output pin.
//!
//! Levels are changed only through BSRR, which makes each change a single
//! store with no read-modify-write, and so safe to issue from any context.
//!
//! The pin is wired to sink the LED's current: driving it low lights the LED.
//! `set_on` therefore drives the pin *low*, and `set_off` drives it high.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin, StatefulOutputPin};

use crate::config::PinConfig;
use crate::gpio::{configure_pin, wrap_pin};
use crate::regs::{PortRegisters, Reg};
use crate::PINS_PER_PORT;

/// The two BSRR patterns for one pin.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PinMasks {
    /// Resets the pin (high half of BSRR), lighting the LED.
    pub on: u32,
    /// Sets the pin (low half of BSRR), darkening the LED.
    pub off: u32,
}

impl PinMasks {
    /// Masks for `pin`. An index of 16 or more wraps the same way
    /// configuration does (`gpio::wrap_pin`).
    pub const fn for_pin(pin: u8) -> Self {
        let pin = wrap_pin(pin);
        PinMasks {
            on: 1 << (pin as u32 + 16),
            off: 1 << pin as u32,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PinError {
    /// The pin index was 16 or more.
    OutOfRange(u8),
}

/// Driver for an LED on one pin of a port.
///
/// Holds nothing but the port and the pin's masks; the LED's state lives in
/// the port.
#[derive(Debug)]
pub struct Led<'a, R: PortRegisters + ?Sized> {
    regs: &'a R,
    masks: PinMasks,
}

impl<'a, R: PortRegisters + ?Sized> Led<'a, R> {
    /// Makes `pin` a fast push-pull output and takes charge of it.
    ///
    /// The pin's level is left alone. `pin` should be less than 16; a larger
    /// index wraps around the high register's pins, for configuration and
    /// level alike. See `new` for the checked version.
    pub fn init(regs: &'a R, pin: u8) -> Self {
        Self::init_with(regs, pin, PinConfig::LED)
    }

    /// Like `init`, but with the output configuration of your choice (e.g.
    /// open drain, for an LED pulled up to a higher voltage).
    pub fn init_with(regs: &'a R, pin: u8, conf: PinConfig) -> Self {
        configure_pin(regs, pin, conf);
        Self::attach(regs, pin)
    }

    /// Takes charge of a pin that is already configured as an output.
    pub(crate) fn attach(regs: &'a R, pin: u8) -> Self {
        Led {
            regs,
            masks: PinMasks::for_pin(pin),
        }
    }

    /// Checked form of `init`. Touches no register if `pin` is out of range.
    pub fn new(regs: &'a R, pin: u8) -> Result<Self, PinError> {
        if pin >= PINS_PER_PORT {
            return Err(PinError::OutOfRange(pin));
        }
        Ok(Self::init(regs, pin))
    }

    pub fn masks(&self) -> PinMasks {
        self.masks
    }

    /// Lights the LED by driving the pin low.
    #[inline]
    pub fn set_on(&self) {
        self.regs.write(Reg::Bsrr, self.masks.on);
    }

    /// Darkens the LED by driving the pin high.
    #[inline]
    pub fn set_off(&self) {
        self.regs.write(Reg::Bsrr, self.masks.off);
    }

    /// Checks whether the pin is currently being driven low.
    pub fn is_on(&self) -> bool {
        self.regs.read(Reg::Odr) & self.masks.off == 0
    }

    pub fn toggle(&self) {
        if self.is_on() {
            self.set_off();
        } else {
            self.set_on();
        }
    }

    /// One period of the fast waveform: two resets, then a set.
    ///
    /// The reset goes through BRR rather than BSRR's high half. It is written
    /// twice so that the low phase is about as long as the high phase, which
    /// also pays for the branch back to the top of the loop.
    #[inline(always)]
    pub(crate) fn pulse(&self) {
        self.regs.write(Reg::Brr, self.masks.off);
        self.regs.write(Reg::Brr, self.masks.off);
        self.regs.write(Reg::Bsrr, self.masks.off);
    }
}

// The embedded-hal traits speak in electrical levels, not LED states.

impl<'a, R: PortRegisters + ?Sized> ErrorType for Led<'a, R> {
    type Error = Infallible;
}

impl<'a, R: PortRegisters + ?Sized> OutputPin for Led<'a, R> {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.set_on();
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.set_off();
        Ok(())
    }
}

impl<'a, R: PortRegisters + ?Sized> StatefulOutputPin for Led<'a, R> {
    fn is_set_high(&mut self) -> Result<bool, Infallible> {
        Ok(!self.is_on())
    }

    fn is_set_low(&mut self) -> Result<bool, Infallible> {
        Ok(self.is_on())
    }
}
