//! Bits shared by the demo binaries.

#![no_std]

use bluepill_led::BlinkConfig;

/// The pin the demos drive, chosen by the `onboard-led` feature.
pub fn led_config() -> BlinkConfig {
    if cfg!(feature = "onboard-led") {
        BlinkConfig::ONBOARD
    } else {
        BlinkConfig::default()
    }
}
