//! Drives every usable pin of ports A, B and C with the same square wave, so a
//! board can be checked pin by pin with a scope probe.
//!
//! This grabs all of ports A and B. Don't run it with anything attached that
//! minds.

#![no_std]
#![no_main]

#[cfg(feature = "panic-halt")]
extern crate panic_halt;
#[cfg(feature = "panic-itm")]
extern crate panic_itm;

use cortex_m::iprintln;
use stm32f1::stm32f103 as device;

use bluepill_led::{board, wave, Port};

#[cortex_m_rt::entry]
fn main() -> ! {
    let mut cp = cortex_m::Peripherals::take().unwrap();
    let p = device::Peripherals::take().unwrap();

    board::enable_gpio_clocks(&p.RCC);

    // Safety: clocks are on, and we're the only code running.
    let ports = unsafe { board::ports() };
    wave::prepare_survey(ports);

    let stim = &mut cp.ITM.stim[0];
    for port in Port::ALL.iter() {
        iprintln!(
            stim,
            "P{:?}: expect a clean wave on {:#06x}",
            port,
            port.waveform_safe_pins()
        );
    }

    wave::survey(ports)
}
