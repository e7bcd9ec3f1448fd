//! Sleep Cycle Driver
//!
//! Awake for a fixed stretch of simulated work (servicing the buttons), then
//! a timed deep sleep. Waking is a full restart, so nothing here survives a
//! cycle; the next boot's reset reason tells which way the chip came back.

use crate::config::SleepCycleConfig;
use crate::console::{show, Console, Screen};
use crate::debounce::{ButtonId, ButtonPair};
use crate::platform::{Clock, DeepSleep, Radio, SleepRequest};

/// What a button press asks the work phase to do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Restart,
}

/// How a work phase ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkOutcome {
    /// Work time is up, go to sleep
    Finished,
    /// A button handler asked for a software restart
    Restart,
}

pub struct SleepCycle {
    config: SleepCycleConfig,
}

impl SleepCycle {
    pub const fn new(config: SleepCycleConfig) -> Self {
        Self { config }
    }

    /// Power the radio down for the awake period
    pub fn radio_off<R: Radio, C: Clock>(&self, radio: &mut R, clock: &mut C) {
        radio.disable();
        if self.config.radio_settle_ms > 0 {
            clock.delay_ms(self.config.radio_settle_ms);
        }
        log::debug!("radio disabled");
    }

    /// Power the radio up (before a connection attempt)
    pub fn radio_on<R: Radio, C: Clock>(&self, radio: &mut R, clock: &mut C) {
        radio.enable();
        if self.config.radio_settle_ms > 0 {
            clock.delay_ms(self.config.radio_settle_ms);
        }
        log::debug!("radio enabled");
    }

    /// Poll the buttons until the work time is up or a handler asks for a
    /// restart. Presses are handed to `on_press` in the order they are drained.
    pub fn work<C: Clock>(
        &self,
        clock: &mut C,
        buttons: &ButtonPair,
        mut on_press: impl FnMut(ButtonId, &mut C) -> Flow,
    ) -> WorkOutcome {
        let started = clock.now_ms();
        loop {
            let mut restart = false;
            buttons.poll(|id| {
                if on_press(id, clock) == Flow::Restart {
                    restart = true;
                }
            });
            if restart {
                return WorkOutcome::Restart;
            }

            clock.delay_ms(self.config.poll_interval_ms);

            if clock.now_ms().wrapping_sub(started) >= self.config.work_duration_ms {
                return WorkOutcome::Finished;
            }
        }
    }

    /// The request the cycle sleeps with
    pub fn request(&self) -> SleepRequest {
        SleepRequest {
            duration: self.config.sleep_duration,
            wake_mode: self.config.wake_mode,
        }
    }

    /// Announce the sleep and quiet the display; returns the request to hand
    /// to the platform
    pub fn prepare<S: Screen>(&self, console: &mut Console<S>) -> SleepRequest {
        let request = self.request();
        log::info!(
            "Entering sleep for {} seconds (radio on wake: {:?})",
            request.duration.as_secs(),
            request.wake_mode
        );
        show(console, format_args!("Entering sleep\n"));
        if self.config.disable_display_during_sleep {
            if let Err(err) = console.set_power_save(true) {
                log::warn!("display power save failed: {:?}", err);
            }
        }
        // TODO: checkpoint state to RTC fast memory once a sketch has state worth keeping
        request
    }

    /// Prepare and enter deep sleep
    pub fn sleep<S: Screen, P: DeepSleep>(&self, console: &mut Console<S>, platform: &mut P) -> ! {
        let request = self.prepare(console);
        platform.deep_sleep(request)
    }
}
