//! Display test sketch
//!
//! Writes "The display is working" to the OLED console, then scrolls it off
//! one blank line at a time, forever.

#![no_std]
#![no_main]

use esp_backtrace as _;
use esp_hal::prelude::*;

use esp_sleep_sketches::board::{self, EspClock};
use esp_sleep_sketches::console::{show, Console};
use esp_sleep_sketches::platform::Clock;

const SCROLL_LINES: usize = 5;

#[entry]
fn main() -> ! {
    let _peripherals = board::init();
    let mut clock = EspClock::new();

    log::info!("Testing the OLED display");
    let mut console = Console::new(board::open_display_or_log());

    loop {
        show(&mut console, format_args!("\x0C\n\n\n\n\nThe display\n\nis working\n"));
        clock.delay_ms(1000);

        for _ in 0..SCROLL_LINES {
            clock.delay_ms(250);
            show(&mut console, format_args!("\n"));
        }

        clock.delay_ms(1000);
    }
}
