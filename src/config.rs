//! Board wiring and timing for the sketches
//!
//! Everything here is compile-time configuration. Pin numbers are ESP32-C3
//! GPIO numbers.

use core::time::Duration;

use crate::platform::RadioWakeMode;

// Status LED ("builtin"), active-low
pub const STATUS_LED_PIN: u8 = 2;
// Work LED ("external"), active-low
pub const WORK_LED_PIN: u8 = 10;

// Button pins pick the `GpioPin<N>` types `board::buttons` takes, so the
// sketches must pass the matching `peripherals.GPIOn`.
// BOOT button, pulled up on the board
pub const FLASH_BUTTON_PIN: u8 = 9;
// External button, uses the internal pull-up
pub const EXTERNAL_BUTTON_PIN: u8 = 3;

// I2C bus shared by the OLED and anything else on the header
pub const I2C_SCL_PIN: u8 = 7;
pub const I2C_SDA_PIN: u8 = 6;
pub const I2C_FREQ_HZ: u32 = 400_000;

/// Debounce interval for the LED/button demo
pub const LEDS_DEBOUNCE_MS: u32 = 40;
/// Debounce interval while the deep-sleep sketch is doing its work
pub const DEEP_SLEEP_DEBOUNCE_MS: u32 = 100;

/// LED on-time of a single boot flash
pub const FLASH_ON_MS: u32 = 100;
/// LED off-time between boot flashes
pub const FLASH_OFF_MS: u32 = 200;

/// Sleep cycle timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SleepCycleConfig {
    /// How long the simulated work phase lasts
    pub work_duration_ms: u32,
    /// Button poll period during the work phase
    pub poll_interval_ms: u32,
    /// How long to stay in deep sleep
    pub sleep_duration: Duration,
    /// Radio state requested for the next wake
    pub wake_mode: RadioWakeMode,
    /// Wait after each radio on/off request before carrying on
    pub radio_settle_ms: u32,
    /// Put the display in power save before sleeping
    pub disable_display_during_sleep: bool,
}

impl SleepCycleConfig {
    pub const fn new() -> Self {
        Self {
            work_duration_ms: 5_000,
            poll_interval_ms: 50,
            sleep_duration: Duration::from_secs(30),
            wake_mode: RadioWakeMode::Disabled,
            radio_settle_ms: 0,
            disable_display_during_sleep: false,
        }
    }
}

impl Default for SleepCycleConfig {
    fn default() -> Self {
        Self::new()
    }
}
