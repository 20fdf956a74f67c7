//! The three GPIO ports and where they live.

use crate::regs::RegisterBlock;

/// One of the GPIO ports brought out on the STM32F103C8.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Port {
    A,
    B,
    C,
}

impl Port {
    pub const ALL: [Port; 3] = [Port::A, Port::B, Port::C];

    /// Physical address of the port's register block.
    pub const fn base(self) -> usize {
        match self {
            Port::A => 0x4001_0800,
            Port::B => 0x4001_0C00,
            Port::C => 0x4001_1000,
        }
    }

    /// Produces the port's register block.
    ///
    /// # Safety
    ///
    /// Only meaningful on the target, with the port's clock enabled in the
    /// RCC. The result aliases every other reference to the same port; callers
    /// that configure pins from more than one context need to serialize their
    /// configuration writes (see `util::port_lock`).
    pub unsafe fn registers(self) -> &'static RegisterBlock {
        RegisterBlock::at(self.base())
    }

    /// Pins that produce a clean waveform on a Blue Pill, as a bitmask.
    ///
    /// Found by driving every pin with `wave::survey` and watching it on a
    /// scope. PA13-15 are the debug port. PB2 is BOOT1; PB3 and PB4 come out of
    /// reset as JTAG pins. PC13 carries the onboard LED, PC14 and PC15 the
    /// 32kHz crystal, and the rest of port C is not bonded out.
    pub const fn waveform_safe_pins(self) -> u16 {
        match self {
            Port::A => 0x1FFF,
            Port::B => 0xFFE3,
            Port::C => 1 << 13,
        }
    }
}
