//! Output pin driver for the STM32F1 general-purpose I/O ports.
//!
//! The driver takes a port's register block and a pin index, packs the pin's
//! 4-bit configuration into the split CRL/CRH configuration registers, and then
//! changes the pin's level through the atomic set/reset registers. On top of
//! that it can generate free-running waveforms, either on one pin or on every
//! pin of three ports at once for probing a board with an oscilloscope.
//!
//! Everything above the register access is architecture-independent, so it can
//! be tested on the host against the simulated port in `sim`.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod config;
pub mod gpio;
pub mod led;
pub mod port;
pub mod regs;
pub mod util;
pub mod wave;

#[cfg(any(test, feature = "std"))]
pub mod sim;

cfg_if::cfg_if! {
    if #[cfg(target_os = "none")] {
        pub mod board;
    }
}

pub use config::{BlinkConfig, InputStyle, OutputStyle, PinConfig, Speed};
pub use led::{Led, PinError, PinMasks};
pub use port::Port;
pub use regs::{PortRegisters, Reg, RegisterBlock};

/// Number of pins in one port.
pub const PINS_PER_PORT: u8 = 16;
