//! Indicator LEDs

use crate::config::{FLASH_OFF_MS, FLASH_ON_MS};
use crate::platform::Clock;

/// Which pin level turns the LED on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveLevel {
    High,
    Low,
}

impl ActiveLevel {
    /// Pin level (true = high) that gives the requested LED state
    pub const fn level_for(self, lit: bool) -> bool {
        match self {
            ActiveLevel::High => lit,
            ActiveLevel::Low => !lit,
        }
    }
}

pub trait Led {
    fn set(&mut self, lit: bool);

    fn is_lit(&self) -> bool;

    fn on(&mut self) {
        self.set(true);
    }

    fn off(&mut self) {
        self.set(false);
    }

    fn toggle(&mut self) {
        let lit = self.is_lit();
        self.set(!lit);
    }

    /// Blink `count` times and leave the LED off
    fn flash<C: Clock>(&mut self, count: u8, clock: &mut C) {
        self.off();
        for i in 0..count {
            if i > 0 {
                clock.delay_ms(FLASH_OFF_MS);
            }
            self.on();
            clock.delay_ms(FLASH_ON_MS);
            self.off();
        }
    }
}
