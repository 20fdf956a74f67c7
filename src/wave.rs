//! Free-running waveforms.
//!
//! Each waveform comes in two forms. The `run_*` functions check an `Until`
//! before every period and return once it says so; the bare ones loop until
//! power-down, which is what the firmware wants. The frequency is whatever the
//! loop body costs: there are no delays.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::config::PinConfig;
use crate::gpio::{configure_all, configure_pin};
use crate::led::Led;
use crate::regs::{PortRegisters, Reg};

/// Decides when a waveform loop stops. Checked once per period.
pub trait Until {
    fn done(&mut self) -> bool;
}

/// Stops after a fixed number of periods.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Cycles(pub u32);

impl Until for Cycles {
    fn done(&mut self) -> bool {
        match self.0.checked_sub(1) {
            Some(left) => {
                self.0 = left;
                false
            }
            None => true,
        }
    }
}

/// Stops once the flag is raised, e.g. from an interrupt handler.
impl Until for &AtomicBool {
    fn done(&mut self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

/// Toggles the LED's pin as fast as the loop allows, until `until` says to
/// stop. The pin is left high (LED off).
///
/// Makes about 1MHz on a Blue Pill.
pub fn run_fast_waveform<R>(led: &Led<'_, R>, mut until: impl Until)
where
    R: PortRegisters + ?Sized,
{
    while !until.done() {
        led.pulse();
    }
}

/// Toggles the LED's pin as fast as the loop allows, forever.
pub fn fast_waveform<R>(led: &Led<'_, R>) -> !
where
    R: PortRegisters + ?Sized,
{
    loop {
        led.pulse();
    }
}

/// Prepares ports A, B and C for `survey`: every pin of A and B becomes an
/// output, and so does the onboard LED pin, C13. The rest of port C is left
/// alone, since it holds the crystal.
pub fn prepare_survey<R: PortRegisters>(ports: [&R; 3]) {
    let [a, b, c] = ports;
    configure_all(a, PinConfig::LED);
    configure_all(b, PinConfig::LED);
    configure_pin(c, 13, PinConfig::LED);
}

/// One period of the survey waveform: all pins of all three ports low, then
/// all high, in port order.
#[inline(always)]
fn survey_pulse<R: PortRegisters>(ports: &[&R; 3]) {
    for port in ports {
        port.write(Reg::Brr, 0xFFFF);
    }
    for port in ports {
        port.write(Reg::Bsrr, 0xFFFF);
    }
}

/// Drives every pin of three ports with the same square wave, so each pin can
/// be checked with a scope probe. See `Port::waveform_safe_pins` for what this
/// turned up on a Blue Pill.
pub fn run_survey<R: PortRegisters>(ports: [&R; 3], mut until: impl Until) {
    while !until.done() {
        survey_pulse(&ports);
    }
}

/// `run_survey`, forever.
pub fn survey<R: PortRegisters>(ports: [&R; 3]) -> ! {
    loop {
        survey_pulse(&ports);
    }
}
