//! Toggles the LED pin as fast as a loop can, for a look with a scope.

#![no_std]
#![no_main]

#[cfg(feature = "panic-halt")]
extern crate panic_halt;
#[cfg(feature = "panic-itm")]
extern crate panic_itm;

use cortex_m::iprintln;
use stm32f1::stm32f103 as device;

use bluepill_led::{board, wave};

#[cortex_m_rt::entry]
fn main() -> ! {
    let mut cp = cortex_m::Peripherals::take().unwrap();
    let p = device::Peripherals::take().unwrap();

    board::enable_gpio_clocks(&p.RCC);

    let cfg = leddemos::led_config();
    // Safety: clocks are on, and we're the only code running.
    let led = unsafe { board::led(&cfg) };

    iprintln!(&mut cp.ITM.stim[0], "square wave on P{:?}{}", cfg.port, cfg.pin);

    wave::fast_waveform(&led)
}
