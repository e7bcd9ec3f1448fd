//! Platform services the sketches depend on
//!
//! The firmware implements these on top of esp-hal (see `board`); the tests
//! implement them with plain counters.

use core::time::Duration;

/// Millisecond time base and blocking delay
pub trait Clock {
    /// Milliseconds since boot. Wraps after ~49 days.
    fn now_ms(&self) -> u32;

    /// Busy-wait for `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);
}

/// Radio state to come up in after a deep-sleep wake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioWakeMode {
    /// Keep the radio powered down on wake
    Disabled,
    /// Power the radio and run RF calibration on wake
    Calibrate,
}

/// Radio power control
pub trait Radio {
    fn disable(&mut self);
    fn enable(&mut self);
}

/// A timed deep sleep, handed to the platform and never returned from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SleepRequest {
    pub duration: Duration,
    pub wake_mode: RadioWakeMode,
}

/// Whole-chip deep sleep. Execution resumes only through a full restart.
pub trait DeepSleep {
    fn deep_sleep(&mut self, request: SleepRequest) -> !;
}
