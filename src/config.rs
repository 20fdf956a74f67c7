//! Pin configuration nibbles.
//!
//! Each pin has four configuration bits. The low two (MODE) select input or an
//! output slew rate; the high two (CNF) select the flavor of input or output.
//! Because the CNF values are kept pre-shifted, a nibble is just
//! `mode | style`.

use smart_default::SmartDefault;

use crate::port::Port;

/// Output slew rate limit, i.e. the MODE bits of an output pin.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Speed {
    Mhz10 = 0b01,
    Mhz2 = 0b10,
    Mhz50 = 0b11,
}

/// CNF bits of an output pin.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum OutputStyle {
    /// General purpose, push-pull.
    PushPull = 0x0,
    /// General purpose, open drain.
    OpenDrain = 0x4,
    /// Alternate function, push-pull.
    AltPushPull = 0x8,
    /// Alternate function, open drain.
    AltOpenDrain = 0xC,
}

/// CNF bits of an input pin.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum InputStyle {
    Analog = 0x0,
    /// The reset state of every pin.
    Floating = 0x4,
    /// Pulled up or down, depending on the pin's ODR bit.
    Pulled = 0x8,
}

/// The complete configuration of one pin.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PinConfig {
    Input(InputStyle),
    Output(Speed, OutputStyle),
}

const MODE_IN: u8 = 0b00;

impl PinConfig {
    /// Fastest push-pull output; what the LED gets.
    pub const LED: PinConfig =
        PinConfig::Output(Speed::Mhz50, OutputStyle::PushPull);

    /// Configuration of every pin out of reset.
    pub const RESET: PinConfig = PinConfig::Input(InputStyle::Floating);

    /// The 4-bit encoding of this configuration.
    pub const fn bits(self) -> u32 {
        let nibble = match self {
            PinConfig::Input(style) => MODE_IN | style as u8,
            PinConfig::Output(speed, style) => speed as u8 | style as u8,
        };
        nibble as u32
    }

    /// Decodes a nibble. Returns `None` for values that don't fit in four bits
    /// and for the reserved input encoding `0xC`.
    pub const fn from_bits(bits: u8) -> Option<PinConfig> {
        if bits > 0xF {
            return None;
        }
        let cnf = bits & 0xC;
        let speed = match bits & 0b11 {
            0b01 => Speed::Mhz10,
            0b10 => Speed::Mhz2,
            0b11 => Speed::Mhz50,
            _ => {
                return match cnf {
                    0x0 => Some(PinConfig::Input(InputStyle::Analog)),
                    0x4 => Some(PinConfig::Input(InputStyle::Floating)),
                    0x8 => Some(PinConfig::Input(InputStyle::Pulled)),
                    _ => None,
                };
            }
        };
        let style = match cnf {
            0x0 => OutputStyle::PushPull,
            0x4 => OutputStyle::OpenDrain,
            0x8 => OutputStyle::AltPushPull,
            _ => OutputStyle::AltOpenDrain,
        };
        Some(PinConfig::Output(speed, style))
    }
}

/// Which pin the firmware drives, and how.
#[derive(Copy, Clone, Debug, Eq, PartialEq, SmartDefault)]
pub struct BlinkConfig {
    #[default(Port::A)]
    pub port: Port,
    #[default(0)]
    pub pin: u8,
    #[default(PinConfig::LED)]
    pub conf: PinConfig,
}

impl BlinkConfig {
    /// The LED soldered onto the Blue Pill itself, on PC13.
    pub const ONBOARD: BlinkConfig = BlinkConfig {
        port: Port::C,
        pin: 13,
        conf: PinConfig::LED,
    };
}
