//! Reset Reason Classifier
//! =======================
//!
//! Works out why the chip (re)started and turns that into something a person
//! can see: a label for the log and the display, and a number of status LED
//! flashes.
//!
//! | Flashes | Meaning                                   |
//! |---------|-------------------------------------------|
//! | 2       | woke from a programmed deep sleep         |
//! | 4       | recovered from a watchdog reset           |
//! | 3       | anything else (power-on, reset, restart)  |

use core::fmt;

use crate::led::Led;
use crate::platform::Clock;

/// Why the chip started running this time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetCause {
    /// Normal startup by power on
    PowerOn,
    /// Hardware watchdog reset
    HardwareWatchdog,
    /// Exception reset, GPIO state unchanged
    Exception,
    /// Software watchdog reset, GPIO state unchanged
    SoftwareWatchdog,
    /// Software restart, GPIO state unchanged
    SoftwareRestart,
    /// Wake up from deep sleep
    DeepSleepWake,
    /// External system reset
    ExternalReset,
}

/// A reset code with no entry in the cause table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownResetCause(pub u32);

impl fmt::Display for UnknownResetCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown reset cause code {:#04x}", self.0)
    }
}

impl core::error::Error for UnknownResetCause {}

impl ResetCause {
    pub const ALL: [ResetCause; 7] = [
        ResetCause::PowerOn,
        ResetCause::HardwareWatchdog,
        ResetCause::Exception,
        ResetCause::SoftwareWatchdog,
        ResetCause::SoftwareRestart,
        ResetCause::DeepSleepWake,
        ResetCause::ExternalReset,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ResetCause::PowerOn => "Power-on Reset",
            ResetCause::HardwareWatchdog => "Hardware Watchdog Timer",
            ResetCause::Exception => "Exception Reset",
            ResetCause::SoftwareWatchdog => "Software Watchdog Timer",
            ResetCause::SoftwareRestart => "Software Restart",
            ResetCause::DeepSleepWake => "Deep Sleep Awake",
            ResetCause::ExternalReset => "External Reset",
        }
    }

    pub const fn flash_count(self) -> u8 {
        match self {
            ResetCause::DeepSleepWake => 2,
            ResetCause::HardwareWatchdog | ResetCause::SoftwareWatchdog => 4,
            ResetCause::PowerOn
            | ResetCause::Exception
            | ResetCause::SoftwareRestart
            | ResetCause::ExternalReset => 3,
        }
    }

    /// Fold an ESP32-C3 `SocResetReason` code onto the seven causes
    pub fn from_soc_code(code: u32) -> Result<Self, UnknownResetCause> {
        let cause = match code {
            // ChipPowerOn, SysBrownOut
            0x01 | 0x0F => ResetCause::PowerOn,
            // CoreSw, Cpu0Sw
            0x03 | 0x0C => ResetCause::SoftwareRestart,
            // CoreDeepSleep
            0x05 => ResetCause::DeepSleepWake,
            // Timer group (main) watchdogs
            0x07 | 0x08 | 0x0B | 0x11 => ResetCause::SoftwareWatchdog,
            // RTC and super watchdogs
            0x09 | 0x0D | 0x10 | 0x12 => ResetCause::HardwareWatchdog,
            // SysClkGlitch, CoreEfuseCrc, CorePwrGlitch
            0x13 | 0x14 | 0x17 => ResetCause::Exception,
            // CoreUsbUart, CoreUsbJtag
            0x15 | 0x16 => ResetCause::ExternalReset,
            other => return Err(UnknownResetCause(other)),
        };
        Ok(cause)
    }
}

/// Table codes 0..=6, in the order of `ResetCause::ALL`
impl TryFrom<u32> for ResetCause {
    type Error = UnknownResetCause;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        usize::try_from(code)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
            .ok_or(UnknownResetCause(code))
    }
}

impl fmt::Display for ResetCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What the boot sequence reports about the last reset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootReport {
    // Err(None): the chip did not report a reason at all
    cause: Result<ResetCause, Option<UnknownResetCause>>,
}

impl BootReport {
    pub const UNKNOWN_LABEL: &'static str = "Unknown Reset";
    pub const UNKNOWN_FLASHES: u8 = 3;

    pub fn new(cause: Result<ResetCause, UnknownResetCause>) -> Self {
        Self { cause: cause.map_err(Some) }
    }

    /// No reason available from the chip; reported in the default bucket
    pub fn unreported() -> Self {
        Self { cause: Err(None) }
    }

    /// Classify a table code (0..=6)
    pub fn from_code(code: u32) -> Self {
        Self::new(ResetCause::try_from(code))
    }

    pub fn cause(&self) -> Option<ResetCause> {
        self.cause.ok()
    }

    pub fn label(&self) -> &'static str {
        match self.cause {
            Ok(cause) => cause.label(),
            Err(_) => Self::UNKNOWN_LABEL,
        }
    }

    pub fn flash_count(&self) -> u8 {
        match self.cause {
            Ok(cause) => cause.flash_count(),
            Err(_) => Self::UNKNOWN_FLASHES,
        }
    }

    /// Blink the status LED and log the reason
    pub fn announce<L: Led, C: Clock>(&self, led: &mut L, clock: &mut C) {
        match self.cause {
            Ok(cause) => log::info!("Reset reason: {}", cause),
            Err(Some(err)) => log::warn!("Reset reason: {} ({})", Self::UNKNOWN_LABEL, err),
            Err(None) => log::warn!("Reset reason: {} (not reported)", Self::UNKNOWN_LABEL),
        }
        led.flash(self.flash_count(), clock);
    }
}
