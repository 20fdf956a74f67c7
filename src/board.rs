//! Hardware glue for the STM32F103, on the target only.

use stm32f1::stm32f103 as device;

use crate::config::{BlinkConfig, PinConfig};
use crate::gpio;
use crate::led::Led;
use crate::port::Port;
use crate::regs::{PortRegisters, RegisterBlock};

/// Turns on the clocks for ports A, B and C. Until this runs, their
/// registers ignore writes and read as zero.
pub fn enable_gpio_clocks(rcc: &device::RCC) {
    rcc.apb2enr.modify(|_, w| {
        w.iopaen().set_bit().iopben().set_bit().iopcen().set_bit()
    });
    // Make sure the clock is running before anyone pokes the ports.
    cortex_m::asm::dsb();
}

/// `gpio::configure_pin` with interrupts masked, so that an interrupt handler
/// configuring pins on the same port can't slip in between the read and the
/// write.
pub fn configure_pin_critical(
    regs: &(impl PortRegisters + ?Sized),
    pin: u8,
    conf: PinConfig,
) {
    cortex_m::interrupt::free(|_| gpio::configure_pin(regs, pin, conf));
}

/// Register blocks of all three ports, in order.
///
/// # Safety
///
/// Port clocks must be enabled (`enable_gpio_clocks`).
pub unsafe fn ports() -> [&'static RegisterBlock; 3] {
    [
        Port::A.registers(),
        Port::B.registers(),
        Port::C.registers(),
    ]
}

/// Sets up the pin described by `cfg` and returns its driver.
///
/// # Safety
///
/// Port clocks must be enabled, and nothing else may be configuring pins on
/// the same port at the same time.
pub unsafe fn led(cfg: &BlinkConfig) -> Led<'static, RegisterBlock> {
    Led::init_with(cfg.port.registers(), cfg.pin, cfg.conf)
}
