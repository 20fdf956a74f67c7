//! Blinks the LED about once a second.

#![no_std]
#![no_main]

#[cfg(feature = "panic-halt")]
extern crate panic_halt;
#[cfg(feature = "panic-itm")]
extern crate panic_itm;

use cortex_m::iprintln;
use stm32f1::stm32f103 as device;

use bluepill_led::board;

/// Cycles between level changes: half a second on the 8MHz internal
/// oscillator the part boots on.
const HALF_PERIOD: u32 = 4_000_000;

#[cortex_m_rt::entry]
fn main() -> ! {
    let mut cp = cortex_m::Peripherals::take().unwrap();
    let p = device::Peripherals::take().unwrap();

    board::enable_gpio_clocks(&p.RCC);

    let cfg = leddemos::led_config();
    // Safety: clocks are on, and we're the only code running.
    let led = unsafe { board::led(&cfg) };

    iprintln!(
        &mut cp.ITM.stim[0],
        "blinking P{:?}{} as {:?}",
        cfg.port,
        cfg.pin,
        cfg.conf
    );

    loop {
        led.set_on();
        cortex_m::asm::delay(HALF_PERIOD);
        led.set_off();
        cortex_m::asm::delay(HALF_PERIOD);
    }
}
