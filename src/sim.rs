//! A GPIO port simulated in memory, for host-side testing.
//!
//! `SimPort` behaves like the hardware as far as the driver can observe: the
//! set/reset registers act on the output data register instead of holding a
//! value, and the input data register reads back the output levels (as it
//! does for a pin driven as an output). Every write is also recorded, in
//! order, so tests can check exactly what reached the port.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::vec::Vec;

use crate::regs::{PortRegisters, Reg};

/// CRL/CRH reset value: every pin a floating input.
pub const CR_RESET: u32 = 0x4444_4444;

#[derive(Debug)]
pub struct SimPort {
    cells: [AtomicU32; 7],
    log: Mutex<Vec<(Reg, u32)>>,
}

impl Default for SimPort {
    fn default() -> Self {
        Self::new()
    }
}

impl SimPort {
    /// Creates a port in its reset state.
    pub fn new() -> Self {
        let port = SimPort {
            cells: Default::default(),
            log: Mutex::new(Vec::new()),
        };
        port.preset(Reg::Crl, CR_RESET);
        port.preset(Reg::Crh, CR_RESET);
        port
    }

    /// Overwrites a register's stored value without going through the
    /// hardware rules and without logging.
    pub fn preset(&self, reg: Reg, value: u32) {
        self.cells[reg.index()].store(value, Ordering::SeqCst);
    }

    /// Returns a register's stored value without logging.
    pub fn peek(&self, reg: Reg) -> u32 {
        self.cells[reg.index()].load(Ordering::SeqCst)
    }

    /// Every write made so far, oldest first.
    pub fn writes(&self) -> Vec<(Reg, u32)> {
        self.log.lock().unwrap().clone()
    }

    /// Values written to one register so far, oldest first.
    pub fn writes_to(&self, reg: Reg) -> Vec<u32> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|(r, _)| *r == reg)
            .map(|(_, v)| *v)
            .collect()
    }

    pub fn clear_log(&self) {
        self.log.lock().unwrap().clear();
    }

    fn update_odr(&self, f: impl Fn(u32) -> u32) {
        let odr = &self.cells[Reg::Odr.index()];
        let _ = odr.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |v| {
            Some(f(v) & 0xFFFF)
        });
    }
}

impl PortRegisters for SimPort {
    fn read(&self, reg: Reg) -> u32 {
        match reg {
            Reg::Idr => self.peek(Reg::Odr),
            Reg::Bsrr | Reg::Brr => 0,
            _ => self.peek(reg),
        }
    }

    fn write(&self, reg: Reg, value: u32) {
        self.log.lock().unwrap().push((reg, value));
        match reg {
            Reg::Idr => (),
            Reg::Odr => self.update_odr(|_| value),
            // Reset first, so a set of the same bit wins.
            Reg::Bsrr => self.update_odr(|v| (v & !(value >> 16)) | value),
            Reg::Brr => self.update_odr(|v| v & !value),
            _ => self.preset(reg, value),
        }
    }
}
