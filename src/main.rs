//! Deep-sleep sketch
//!
//! Boot: flash the status LED by reset reason (2 = woke from deep sleep,
//! 4 = watchdog, 3 = anything else) and show the reason on the OLED.
//! Then five seconds of "work" with the buttons live, then 30 seconds of
//! deep sleep, which ends in a fresh boot.
//!
//! During work the BOOT button toggles the status LED and the external
//! button forces a software restart.

#![no_std]
#![no_main]

use esp_backtrace as _;
use esp_hal::prelude::*;

use esp_sleep_sketches::board::{self, DormantRadio, EspClock, RtcDeepSleep};
use esp_sleep_sketches::config::{self, SleepCycleConfig};
use esp_sleep_sketches::console::{show, Console};
use esp_sleep_sketches::debounce::{ButtonId, ButtonPair};
use esp_sleep_sketches::led::Led;
use esp_sleep_sketches::sleep_cycle::{Flow, SleepCycle, WorkOutcome};

static BUTTONS: ButtonPair = ButtonPair::new(config::DEEP_SLEEP_DEBOUNCE_MS);

#[entry]
fn main() -> ! {
    let peripherals = board::init();
    let mut clock = EspClock::new();
    let mut console = Console::new(board::open_display_or_log());

    log::info!("Started");
    show(&mut console, format_args!("Started\n\n"));

    let mut status_led = board::led(config::STATUS_LED_PIN);
    let mut work_led = board::led(config::WORK_LED_PIN);

    let report = board::boot_report();
    report.announce(&mut status_led, &mut clock);
    show(&mut console, format_args!("Reset reason:\n{}\n\n", report.label()));

    let cycle = SleepCycle::new(SleepCycleConfig::new());
    cycle.radio_off(&mut DormantRadio, &mut clock);

    board::buttons(peripherals.IO_MUX, peripherals.GPIO9, peripherals.GPIO3, &BUTTONS);

    let mut sleeper = RtcDeepSleep::new(peripherals.LPWR);

    work_led.on();
    log::info!("Doing work");
    show(&mut console, format_args!("Doing work\n\n"));

    let outcome = cycle.work(&mut clock, &BUTTONS, |id, _| match id {
        ButtonId::Flash => {
            status_led.toggle();
            log::info!("Flash button pressed");
            show(&mut console, format_args!("flash button\n"));
            Flow::Continue
        }
        ButtonId::External => {
            log::info!("External button pressed");
            show(&mut console, format_args!("external button\n"));
            Flow::Restart
        }
    });

    match outcome {
        WorkOutcome::Restart => board::restart(),
        WorkOutcome::Finished => cycle.sleep(&mut console, &mut sleeper),
    }
}
