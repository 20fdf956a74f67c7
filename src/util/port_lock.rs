//! Serializing pin configuration on a shared port.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicBool, Ordering};

use crate::config::PinConfig;
use crate::gpio;
use crate::led::Led;
use crate::regs::PortRegisters;

/// Guards a port's registers with a spinlock, so that pin configuration from
/// more than one context (threads, or thread and interrupt) can't lose
/// updates in the CRL/CRH read-modify-write.
///
/// Like the rest of this crate, locking is best-effort: `try_lock` fails
/// rather than waiting, and `lock` just spins on it. An interrupt handler must
/// only use the `try_` forms, since spinning there on a lock held by the code
/// it interrupted never ends.
///
/// Level changes don't need the lock. They go through the set/reset
/// registers, and `led` hands out drivers that bypass it.
#[derive(Debug)]
pub struct PortLock<R> {
    locked: AtomicBool,
    regs: UnsafeCell<R>,
}

// Drivers from `led` share `&R` across contexts outside the lock, so `R`
// itself has to be `Sync`.
unsafe impl<R: Send + Sync> Sync for PortLock<R> {}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LockError {
    Contended,
}

impl<R> PortLock<R> {
    pub const fn new(regs: R) -> Self {
        PortLock {
            locked: AtomicBool::new(false),
            regs: UnsafeCell::new(regs),
        }
    }
}

impl<R: PortRegisters + Send + Sync> PortLock<R> {
    pub fn try_lock(&self) -> Result<PortGuard<'_, R>, LockError> {
        if self.locked.swap(true, Ordering::Acquire) {
            // Somebody else made the false->true transition.
            Err(LockError::Contended)
        } else {
            Ok(PortGuard {
                _locked: LockBorrow(&self.locked),
                // Safety: we hold the lock.
                regs: unsafe { &*self.regs.get() },
            })
        }
    }

    pub fn lock(&self) -> PortGuard<'_, R> {
        loop {
            match self.try_lock() {
                Ok(guard) => return guard,
                Err(_) => core::hint::spin_loop(),
            }
        }
    }

    /// `gpio::configure_pin` under the lock.
    pub fn configure_pin(&self, pin: u8, conf: PinConfig) {
        gpio::configure_pin(&*self.lock(), pin, conf);
    }

    /// `gpio::configure_pin` if the lock is free; safe from interrupts.
    pub fn try_configure_pin(
        &self,
        pin: u8,
        conf: PinConfig,
    ) -> Result<(), LockError> {
        gpio::configure_pin(&*self.try_lock()?, pin, conf);
        Ok(())
    }

    /// Configures `pin` as the LED output under the lock, then returns a
    /// driver for it.
    pub fn led(&self, pin: u8) -> Led<'_, R> {
        self.configure_pin(pin, PinConfig::LED);
        // Safety: the driver only ever writes BSRR/BRR and reads ODR, none of
        // which take part in a configuration read-modify-write.
        Led::attach(unsafe { &*self.regs.get() }, pin)
    }
}

#[must_use = "if dropped, the port will immediately unlock"]
#[derive(Debug)]
pub struct PortGuard<'a, R> {
    _locked: LockBorrow<'a>,
    regs: &'a R,
}

/// Releases the lock flag when dropped.
#[derive(Debug)]
struct LockBorrow<'a>(&'a AtomicBool);

impl<'a> Drop for LockBorrow<'a> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<'a, R> core::ops::Deref for PortGuard<'a, R> {
    type Target = R;
    fn deref(&self) -> &R {
        self.regs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regs::Reg;
    use crate::sim::SimPort;

    #[test]
    fn second_lock_is_refused() {
        let port = PortLock::new(SimPort::new());
        let guard = port.try_lock().unwrap();
        assert_eq!(port.try_lock().err(), Some(LockError::Contended));
        assert_eq!(
            port.try_configure_pin(0, PinConfig::LED),
            Err(LockError::Contended)
        );
        assert!(guard.writes().is_empty());
        drop(guard);
        assert!(port.try_configure_pin(0, PinConfig::LED).is_ok());
        assert_eq!(port.lock().peek(Reg::Crl), 0x4444_4443);
    }

    #[test]
    fn led_is_usable_while_port_is_locked() {
        let port = PortLock::new(SimPort::new());
        let led = port.led(5);
        let guard = port.lock();
        led.set_on();
        assert!(led.is_on());
        assert_eq!(guard.peek(Reg::Crl), 0x4434_4444);
    }

    #[test]
    fn configuration_while_a_driver_is_live_still_takes_the_lock() {
        let port = PortLock::new(SimPort::new());
        let led = port.led(0);
        let guard = port.lock();
        assert_eq!(
            port.try_configure_pin(1, PinConfig::LED),
            Err(LockError::Contended)
        );
        led.set_off();
        assert_eq!(guard.peek(Reg::Crl), 0x4444_4443);
        drop(guard);
        assert!(port.try_configure_pin(1, PinConfig::LED).is_ok());
        assert_eq!(port.lock().peek(Reg::Crl), 0x4444_4433);
    }

    #[test]
    fn shares_across_threads_only_with_sync_registers() {
        fn assert_sync<T: Sync>() {}
        assert_sync::<PortLock<SimPort>>();
        assert_sync::<PortLock<&'static crate::regs::RegisterBlock>>();
    }

    #[test]
    fn concurrent_configuration_loses_nothing() {
        let port = PortLock::new(SimPort::new());
        std::thread::scope(|s| {
            for t in 0..4u8 {
                let port = &port;
                s.spawn(move || {
                    for round in 0..500 {
                        let conf = if round % 2 == 0 {
                            PinConfig::RESET
                        } else {
                            PinConfig::LED
                        };
                        for pin in (t..16).step_by(4) {
                            port.configure_pin(pin, conf);
                        }
                    }
                });
            }
        });
        let regs = port.lock();
        assert_eq!(regs.peek(Reg::Crl), 0x3333_3333);
        assert_eq!(regs.peek(Reg::Crh), 0x3333_3333);
    }
}
