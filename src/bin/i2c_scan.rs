//! I2C scan sketch
//!
//! Probes every non-reserved 7-bit address once at boot and lists the ones
//! that acknowledge, on the log and on the OLED.

#![no_std]
#![no_main]

use esp_backtrace as _;
use esp_hal::prelude::*;

use esp_sleep_sketches::board;
use esp_sleep_sketches::console::{show, Console};
use esp_sleep_sketches::i2c::{self, SCAN_END_ADDR, SCAN_FIRST_ADDR};

const MAX_FOUND: usize = (SCAN_END_ADDR - SCAN_FIRST_ADDR) as usize;

#[entry]
fn main() -> ! {
    let _peripherals = board::init();
    log::info!("I2C scan");

    let mut bus = match board::i2c_bus() {
        Ok(bus) => bus,
        Err(err) => panic!("I2C pins: {err}"),
    };

    let mut found = [0u8; MAX_FOUND];
    let mut count = 0;
    for addr in i2c::scan(&mut bus) {
        log::info!("Found address: {} (0x{:02X})", addr, addr);
        found[count] = addr;
        count += 1;
    }
    log::info!("Found: {} device(s)", count);

    let oled = match board::open_display_on(bus) {
        Ok(oled) => Some(oled),
        Err(err) => {
            log::warn!("OLED initialization failed: {}", err);
            None
        }
    };
    let mut console = Console::new(oled);

    show(&mut console, format_args!("I2C scan:\n\n"));
    for addr in &found[..count] {
        show(&mut console, format_args!("0x{:02X}\n", addr));
    }
    show(&mut console, format_args!("\nFound {} devices\n", count));

    loop {
        core::hint::spin_loop();
    }
}
