//! Deep-sleep, button, display and I2C scan sketches for the ESP32-C3
//!
//! The library holds everything that does not need esp-hal: the reset
//! reason classifier, the debounced buttons, the sleep cycle, and the
//! register-level drivers for the LEDs, the I2C bus and the SSD1306 OLED.
//! The `board` module (feature `esp32c3`) wires those to the chip.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod console;
pub mod debounce;
pub mod font5x7;
pub mod gpio;
pub mod i2c;
pub mod led;
pub mod platform;
pub mod reset;
pub mod sleep_cycle;
pub mod ssd1306;

#[cfg(feature = "esp32c3")]
pub mod board;

#[cfg(test)]
mod testing;
