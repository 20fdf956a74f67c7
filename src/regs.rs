//! Register-level view of one GPIO port.
//!
//! The driver never touches memory directly; it names a register with `Reg`
//! and goes through `PortRegisters`. `RegisterBlock` is the real thing, an
//! overlay on the memory-mapped port, while tests substitute `sim::SimPort`.

use core::cell::UnsafeCell;
use core::mem::{offset_of, size_of};
use core::ptr::{read_volatile, write_volatile};

/// The seven registers of a port, in address order.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Reg {
    /// Configuration for pins 0-7, one nibble each.
    Crl,
    /// Configuration for pins 8-15, one nibble each.
    Crh,
    /// Input data (low 16 bits).
    Idr,
    /// Output data (low 16 bits).
    Odr,
    /// Bit set/reset. Low half sets output bits, high half clears them.
    Bsrr,
    /// Bit reset. Low half clears output bits.
    Brr,
    /// Configuration lock (17 bits).
    Lckr,
}

impl Reg {
    pub const ALL: [Reg; 7] = [
        Reg::Crl,
        Reg::Crh,
        Reg::Idr,
        Reg::Odr,
        Reg::Bsrr,
        Reg::Brr,
        Reg::Lckr,
    ];

    /// Byte offset of the register from the port base.
    pub const fn offset(self) -> usize {
        match self {
            Reg::Crl => 0x00,
            Reg::Crh => 0x04,
            Reg::Idr => 0x08,
            Reg::Odr => 0x0C,
            Reg::Bsrr => 0x10,
            Reg::Brr => 0x14,
            Reg::Lckr => 0x18,
        }
    }

    /// Word index of the register from the port base.
    pub const fn index(self) -> usize {
        self.offset() / 4
    }
}

/// Access to one port's registers.
///
/// Each call is exactly one access of the named register. Nothing is cached
/// and nothing is combined: a read-modify-write exists only where the caller
/// spells it out as a `read` followed by a `write`.
pub trait PortRegisters {
    fn read(&self, reg: Reg) -> u32;
    fn write(&self, reg: Reg, value: u32);
}

impl<T: PortRegisters + ?Sized> PortRegisters for &T {
    #[inline]
    fn read(&self, reg: Reg) -> u32 {
        (**self).read(reg)
    }

    #[inline]
    fn write(&self, reg: Reg, value: u32) {
        (**self).write(reg, value)
    }
}

/// Overlay of a GPIO port's memory-mapped registers.
///
/// There is no way to construct one of these by value; they only exist as
/// references produced by `RegisterBlock::at`.
#[repr(C)]
pub struct RegisterBlock {
    crl: UnsafeCell<u32>,
    crh: UnsafeCell<u32>,
    idr: UnsafeCell<u32>,
    odr: UnsafeCell<u32>,
    bsrr: UnsafeCell<u32>,
    brr: UnsafeCell<u32>,
    lckr: UnsafeCell<u32>,
}

// Each access is a single volatile load or store, which the bus performs
// indivisibly. Sequences of accesses are the caller's to serialize.
unsafe impl Sync for RegisterBlock {}

const _: () = {
    assert!(offset_of!(RegisterBlock, crl) == Reg::Crl.offset());
    assert!(offset_of!(RegisterBlock, crh) == Reg::Crh.offset());
    assert!(offset_of!(RegisterBlock, idr) == Reg::Idr.offset());
    assert!(offset_of!(RegisterBlock, odr) == Reg::Odr.offset());
    assert!(offset_of!(RegisterBlock, bsrr) == Reg::Bsrr.offset());
    assert!(offset_of!(RegisterBlock, brr) == Reg::Brr.offset());
    assert!(offset_of!(RegisterBlock, lckr) == Reg::Lckr.offset());
    assert!(size_of::<RegisterBlock>() == 0x1C);
};

impl RegisterBlock {
    /// Overlays a register block on the port whose registers start at `base`.
    ///
    /// This has no side effects and checks nothing.
    ///
    /// # Safety
    ///
    /// `base` must be the word-aligned address of a GPIO port's register
    /// block (or of seven words of memory standing in for one), valid for
    /// volatile access for all of `'a`. For a real port, the port's clock must
    /// be running before any register is touched.
    pub unsafe fn at<'a>(base: usize) -> &'a RegisterBlock {
        &*(base as *const RegisterBlock)
    }

    fn cell(&self, reg: Reg) -> *mut u32 {
        match reg {
            Reg::Crl => self.crl.get(),
            Reg::Crh => self.crh.get(),
            Reg::Idr => self.idr.get(),
            Reg::Odr => self.odr.get(),
            Reg::Bsrr => self.bsrr.get(),
            Reg::Brr => self.brr.get(),
            Reg::Lckr => self.lckr.get(),
        }
    }
}

impl PortRegisters for RegisterBlock {
    #[inline]
    fn read(&self, reg: Reg) -> u32 {
        // Safety: the cell lies inside the block `at` was promised.
        unsafe { read_volatile(self.cell(reg)) }
    }

    #[inline]
    fn write(&self, reg: Reg, value: u32) {
        // Safety: as above.
        unsafe { write_volatile(self.cell(reg), value) }
    }
}
