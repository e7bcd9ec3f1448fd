//! Host stand-ins for the board, used by the unit tests

use crate::console::Screen;
use crate::i2c::{I2cBus, I2cError};
use crate::led::Led;
use crate::platform::{Clock, Radio};

/// Clock that only moves when something delays
#[derive(Default)]
pub struct FakeClock {
    now: u32,
    pub delays: usize,
    hook: Option<Box<dyn FnMut(u32)>>,
}

impl FakeClock {
    /// Run `hook` with the new time after every delay
    pub fn on_delay(&mut self, hook: impl FnMut(u32) + 'static) {
        self.hook = Some(Box::new(hook));
    }
}

impl Clock for FakeClock {
    fn now_ms(&self) -> u32 {
        self.now
    }

    fn delay_ms(&mut self, ms: u32) {
        self.now = self.now.wrapping_add(ms);
        self.delays += 1;
        if let Some(hook) = self.hook.as_mut() {
            hook(self.now);
        }
    }
}

#[derive(Default)]
pub struct FakeLed {
    pub lit: bool,
    pub switch_ons: usize,
}

impl Led for FakeLed {
    fn set(&mut self, lit: bool) {
        if lit && !self.lit {
            self.switch_ons += 1;
        }
        self.lit = lit;
    }

    fn is_lit(&self) -> bool {
        self.lit
    }
}

#[derive(Default)]
pub struct FakeRadio {
    pub enabled: bool,
}

impl Radio for FakeRadio {
    fn disable(&mut self) {
        self.enabled = false;
    }

    fn enable(&mut self) {
        self.enabled = true;
    }
}

#[derive(Debug)]
pub struct FlushFailed;

/// Character screen that remembers what was drawn since the last clear
pub struct FakeScreen {
    columns: usize,
    rows: usize,
    drawn: Vec<(usize, String)>,
    pub flushes: usize,
    pub fail_flush: bool,
    pub power_save: bool,
}

impl FakeScreen {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            drawn: Vec::new(),
            flushes: 0,
            fail_flush: false,
            power_save: false,
        }
    }

    pub fn text(&self, row: usize) -> String {
        self.drawn
            .iter()
            .filter(|(r, _)| *r == row)
            .map(|(_, text)| text.as_str())
            .collect()
    }
}

impl Screen for FakeScreen {
    type Error = FlushFailed;

    fn columns(&self) -> usize {
        self.columns
    }

    fn rows(&self) -> usize {
        self.rows
    }

    fn clear(&mut self) {
        self.drawn.clear();
    }

    fn draw_text(&mut self, _column: usize, row: usize, text: &str) {
        self.drawn.push((row, text.to_string()));
    }

    fn flush(&mut self) -> Result<(), FlushFailed> {
        if self.fail_flush {
            return Err(FlushFailed);
        }
        self.flushes += 1;
        Ok(())
    }

    fn set_power_save(&mut self, enabled: bool) -> Result<(), FlushFailed> {
        self.power_save = enabled;
        Ok(())
    }
}

/// Bus with a fixed set of devices that acknowledge everything
#[derive(Default)]
pub struct FakeBus {
    devices: Vec<u8>,
    pub writes: Vec<(u8, Option<u8>, Vec<u8>)>,
    pub probes: usize,
}

impl FakeBus {
    pub fn with_devices(devices: &[u8]) -> Self {
        Self {
            devices: devices.to_vec(),
            ..Self::default()
        }
    }

    fn ack(&self, addr: u8) -> Result<(), I2cError> {
        if self.devices.contains(&addr) {
            Ok(())
        } else {
            Err(I2cError::AddressNack { addr })
        }
    }
}

impl I2cBus for FakeBus {
    fn write(&mut self, addr: u8, data: &[u8]) -> Result<(), I2cError> {
        self.ack(addr)?;
        self.writes.push((addr, None, data.to_vec()));
        Ok(())
    }

    fn write_reg(&mut self, addr: u8, reg: u8, data: &[u8]) -> Result<(), I2cError> {
        self.ack(addr)?;
        self.writes.push((addr, Some(reg), data.to_vec()));
        Ok(())
    }

    fn probe(&mut self, addr: u8) -> bool {
        self.probes += 1;
        self.ack(addr).is_ok()
    }
}
