//! LEDs and buttons sketch
//!
//! The BOOT button toggles the status LED, the external button toggles the
//! work LED. Both buttons are debounced in their edge interrupt.

#![no_std]
#![no_main]

use esp_backtrace as _;
use esp_hal::prelude::*;

use esp_sleep_sketches::board;
use esp_sleep_sketches::config;
use esp_sleep_sketches::console::{show, Console};
use esp_sleep_sketches::debounce::{ButtonId, ButtonPair};
use esp_sleep_sketches::led::Led;

static BUTTONS: ButtonPair = ButtonPair::new(config::LEDS_DEBOUNCE_MS);

#[entry]
fn main() -> ! {
    let peripherals = board::init();
    let mut console = Console::new(board::open_display_or_log());

    log::info!("Leds and buttons test");
    log::info!("Press the BOOT button or external button to toggle their LED");
    show(
        &mut console,
        format_args!(
            "\x0CLeds & buttons\n\nPress external\nbutton or flash\nbutton to\ntoggle LEDs\n\n"
        ),
    );

    let mut status_led = board::led(config::STATUS_LED_PIN);
    let mut work_led = board::led(config::WORK_LED_PIN);

    board::buttons(peripherals.IO_MUX, peripherals.GPIO9, peripherals.GPIO3, &BUTTONS);

    loop {
        BUTTONS.poll(|id| match id {
            ButtonId::Flash => {
                status_led.toggle();
                log::info!("Flash button pressed");
                show(&mut console, format_args!("flash button\n"));
            }
            ButtonId::External => {
                work_led.toggle();
                log::info!("External button pressed");
                show(&mut console, format_args!("external button\n"));
            }
        });

        core::hint::spin_loop();
    }
}
