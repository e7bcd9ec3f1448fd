//! End-to-end boot and button scenarios against the public API

use std::time::Duration;

use esp_sleep_sketches::config::SleepCycleConfig;
use esp_sleep_sketches::console::{Console, Screen};
use esp_sleep_sketches::debounce::{ButtonId, ButtonPair};
use esp_sleep_sketches::led::Led;
use esp_sleep_sketches::platform::{Clock, RadioWakeMode, SleepRequest};
use esp_sleep_sketches::reset::{BootReport, ResetCause};
use esp_sleep_sketches::sleep_cycle::{Flow, SleepCycle, WorkOutcome};

#[derive(Default)]
struct Ticks(u32);

impl Clock for Ticks {
    fn now_ms(&self) -> u32 {
        self.0
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0 += ms;
    }
}

#[derive(Default)]
struct Blinker {
    lit: bool,
    blinks: u8,
}

impl Led for Blinker {
    fn set(&mut self, lit: bool) {
        if lit && !self.lit {
            self.blinks += 1;
        }
        self.lit = lit;
    }

    fn is_lit(&self) -> bool {
        self.lit
    }
}

struct Blank;

impl Screen for Blank {
    type Error = core::convert::Infallible;

    fn columns(&self) -> usize {
        21
    }

    fn rows(&self) -> usize {
        8
    }

    fn clear(&mut self) {}

    fn draw_text(&mut self, _column: usize, _row: usize, _text: &str) {}

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_power_save(&mut self, _enabled: bool) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[test]
fn wake_from_deep_sleep_blinks_twice() {
    let report = BootReport::from_code(5);
    let mut led = Blinker::default();
    let mut clock = Ticks::default();

    report.announce(&mut led, &mut clock);

    assert_eq!(report.cause(), Some(ResetCause::DeepSleepWake));
    assert_eq!(report.label(), "Deep Sleep Awake");
    assert_eq!(led.blinks, 2);
    assert!(!led.is_lit());
}

#[test]
fn unrecognized_reset_blinks_three_times() {
    let report = BootReport::from_code(42);
    let mut led = Blinker::default();

    report.announce(&mut led, &mut Ticks::default());

    assert_eq!(report.cause(), None);
    assert_eq!(report.label(), "Unknown Reset");
    assert_eq!(led.blinks, 3);
}

#[test]
fn bouncy_press_counts_once() {
    let buttons = ButtonPair::new(40);

    assert!(buttons.flash.on_edge(0));
    assert!(!buttons.flash.on_edge(39));
    assert!(buttons.flash.on_edge(41));
    assert_eq!(buttons.flash.last_accepted_ms(), Some(41));

    let mut presses = Vec::new();
    buttons.poll(|id| presses.push(id));
    buttons.poll(|id| presses.push(id));
    assert_eq!(presses, [ButtonId::Flash]);
}

#[test]
fn buttons_debounce_independently() {
    let buttons = ButtonPair::new(40);

    assert!(buttons.flash.on_edge(10));
    assert!(buttons.external.on_edge(20));
    assert!(!buttons.flash.on_edge(30));

    let mut presses = Vec::new();
    buttons.poll(|id| presses.push(id));
    assert_eq!(presses, [ButtonId::Flash, ButtonId::External]);
}

#[test]
fn full_cycle_ends_in_thirty_second_sleep() {
    let cycle = SleepCycle::new(SleepCycleConfig::default());
    let buttons = ButtonPair::new(100);
    let mut clock = Ticks::default();
    let mut console = Console::new(Blank);

    let outcome = cycle.work(&mut clock, &buttons, |_, _| Flow::Continue);
    assert_eq!(outcome, WorkOutcome::Finished);
    assert_eq!(clock.now_ms(), 5_000);

    let request = cycle.prepare(&mut console);
    assert_eq!(
        request,
        SleepRequest { duration: Duration::from_secs(30), wake_mode: RadioWakeMode::Disabled }
    );
    assert_eq!(console.line(0), "Entering sleep");
}
