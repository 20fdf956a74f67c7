//! Pin configuration.
//!
//! A port's 16 configuration nibbles are split across two registers: pins 0-7
//! live in CRL and pins 8-15 in CRH, each pin at bit `(pin % 8) * 4`. Changing
//! one pin therefore means a read-modify-write of a register shared with seven
//! other pins. That sequence is not atomic. If more than one context configures
//! pins on the same port, serialize them (`util::port_lock::PortLock`, or
//! `board::configure_pin_critical` on the target).

use crate::config::PinConfig;
use crate::regs::{PortRegisters, Reg};
use crate::PINS_PER_PORT;

/// The pin an unchecked index actually lands on. Indices 0-15 are themselves;
/// anything larger wraps around the pins of the high register.
pub const fn wrap_pin(pin: u8) -> u8 {
    if pin < 8 {
        pin
    } else {
        8 + (pin - 8) % 8
    }
}

/// Finds the configuration register holding `pin`'s nibble, and the nibble's
/// bit offset within it.
pub const fn config_slot(pin: u8) -> (Reg, u32) {
    let pin = wrap_pin(pin);
    if pin < 8 {
        (Reg::Crl, pin as u32 * 4)
    } else {
        (Reg::Crh, (pin as u32 - 8) * 4)
    }
}

/// Sets the configuration of one pin, leaving the other pins sharing its
/// configuration register as they were.
///
/// `pin` must be less than 16. This is not checked; a larger index configures
/// some other pin of the high register (see `wrap_pin`).
pub fn configure_pin(
    regs: &(impl PortRegisters + ?Sized),
    pin: u8,
    conf: PinConfig,
) {
    let (reg, shift) = config_slot(pin);
    let others = regs.read(reg) & !(0xF << shift);
    regs.write(reg, others | conf.bits() << shift);
}

/// Gives every pin of the port the same configuration, pin 0 first.
pub fn configure_all(regs: &(impl PortRegisters + ?Sized), conf: PinConfig) {
    for pin in 0..PINS_PER_PORT {
        configure_pin(regs, pin, conf);
    }
}

/// Reads back the configuration of one pin. `None` means the slot holds the
/// reserved encoding.
pub fn pin_config(
    regs: &(impl PortRegisters + ?Sized),
    pin: u8,
) -> Option<PinConfig> {
    let (reg, shift) = config_slot(pin);
    PinConfig::from_bits((regs.read(reg) >> shift) as u8 & 0xF)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{InputStyle, OutputStyle, Speed};
    use crate::sim::{SimPort, CR_RESET};

    const ALL_CONFIGS: [PinConfig; 15] = [
        PinConfig::Input(InputStyle::Analog),
        PinConfig::Input(InputStyle::Floating),
        PinConfig::Input(InputStyle::Pulled),
        PinConfig::Output(Speed::Mhz10, OutputStyle::PushPull),
        PinConfig::Output(Speed::Mhz10, OutputStyle::OpenDrain),
        PinConfig::Output(Speed::Mhz10, OutputStyle::AltPushPull),
        PinConfig::Output(Speed::Mhz10, OutputStyle::AltOpenDrain),
        PinConfig::Output(Speed::Mhz2, OutputStyle::PushPull),
        PinConfig::Output(Speed::Mhz2, OutputStyle::OpenDrain),
        PinConfig::Output(Speed::Mhz2, OutputStyle::AltPushPull),
        PinConfig::Output(Speed::Mhz2, OutputStyle::AltOpenDrain),
        PinConfig::Output(Speed::Mhz50, OutputStyle::PushPull),
        PinConfig::Output(Speed::Mhz50, OutputStyle::OpenDrain),
        PinConfig::Output(Speed::Mhz50, OutputStyle::AltPushPull),
        PinConfig::Output(Speed::Mhz50, OutputStyle::AltOpenDrain),
    ];

    #[test]
    fn slot_selection() {
        for pin in 0..8 {
            assert_eq!(config_slot(pin), (Reg::Crl, pin as u32 * 4));
        }
        for pin in 8..16 {
            assert_eq!(config_slot(pin), (Reg::Crh, (pin as u32 - 8) * 4));
        }
    }

    #[test]
    fn large_indices_wrap_into_the_high_register() {
        for pin in 0..16 {
            assert_eq!(wrap_pin(pin), pin);
        }
        assert_eq!(wrap_pin(16), 8);
        assert_eq!(wrap_pin(23), 15);
        assert_eq!(wrap_pin(255), 15);
        assert_eq!(config_slot(16), (Reg::Crh, 0));
        assert_eq!(config_slot(255), (Reg::Crh, 28));
    }

    #[test]
    fn works_through_a_trait_object() {
        let port = SimPort::new();
        let regs: &dyn PortRegisters = &port;
        configure_pin(regs, 9, PinConfig::LED);
        configure_all(regs, PinConfig::LED);
        assert_eq!(pin_config(regs, 9), Some(PinConfig::LED));
        assert_eq!(port.peek(Reg::Crl), 0x3333_3333);
    }

    #[test]
    fn neighbors_survive_every_configuration() {
        // Background patterns chosen so that every neighbor nibble differs
        // from every value we write.
        for &background in &[0x0000_0000, 0xFFFF_FFFF, 0x5A5A_5A5A, 0x1234_5678] {
            for pin in 0..16 {
                for &conf in ALL_CONFIGS.iter() {
                    let port = SimPort::new();
                    port.preset(Reg::Crl, background);
                    port.preset(Reg::Crh, !background);

                    configure_pin(&port, pin, conf);

                    let (reg, shift) = config_slot(pin);
                    let other = if reg == Reg::Crl { Reg::Crh } else { Reg::Crl };
                    let before = if reg == Reg::Crl { background } else { !background };
                    let mask = !(0xF << shift);
                    assert_eq!(port.peek(reg) & mask, before & mask);
                    assert_eq!((port.peek(reg) >> shift) & 0xF, conf.bits());
                    assert_eq!(port.peek(other), !before);
                }
            }
        }
    }

    #[test]
    fn touches_only_the_selected_register() {
        let port = SimPort::new();
        configure_pin(&port, 3, PinConfig::LED);
        configure_pin(&port, 12, PinConfig::LED);
        assert_eq!(
            port.writes(),
            vec![(Reg::Crl, 0x4444_3444), (Reg::Crh, 0x4443_4444)]
        );
    }

    #[test]
    fn pin_five_reads_back_as_led_output() {
        let port = SimPort::new();
        configure_pin(&port, 5, PinConfig::LED);
        assert_eq!((port.peek(Reg::Crl) >> 20) & 0xF, 0x3);
        assert_eq!(pin_config(&port, 5), Some(PinConfig::LED));
        assert_eq!(pin_config(&port, 4), Some(PinConfig::RESET));
    }

    #[test]
    fn configure_all_fills_both_registers() {
        let port = SimPort::new();
        configure_all(&port, PinConfig::LED);
        assert_eq!(port.peek(Reg::Crl), 0x3333_3333);
        assert_eq!(port.peek(Reg::Crh), 0x3333_3333);

        // One write per pin, in pin order.
        let writes = port.writes();
        assert_eq!(writes.len(), 16);
        assert!(writes[..8].iter().all(|(r, _)| *r == Reg::Crl));
        assert!(writes[8..].iter().all(|(r, _)| *r == Reg::Crh));
        assert_eq!(writes[0], (Reg::Crl, 0x4444_4443));
        assert_eq!(writes[8], (Reg::Crh, 0x4444_4443));
    }

    #[test]
    fn reserved_slot_reads_as_none() {
        let port = SimPort::new();
        port.preset(Reg::Crh, CR_RESET & !(0xF << 8) | (0xC << 8));
        assert_eq!(pin_config(&port, 10), None);
        assert_eq!(pin_config(&port, 11), Some(PinConfig::RESET));
    }
}
