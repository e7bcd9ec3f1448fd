//! ESP32-C3 Bit-Banged I2C Driver
//! Software implementation of I2C master using GPIO pins, plus the bus scan

use core::fmt;

use crate::gpio::{self, GpioError};

/// First address probed by [`scan`]; 0x00-0x07 are reserved
pub const SCAN_FIRST_ADDR: u8 = 0x08;
/// One past the last address probed by [`scan`]; 0x78-0x7F are reserved
pub const SCAN_END_ADDR: u8 = 0x78;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum I2cError {
    /// Nobody acknowledged the address byte
    AddressNack { addr: u8 },
    /// The device stopped acknowledging at payload byte `index`
    DataNack { addr: u8, index: usize },
}

impl fmt::Display for I2cError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            I2cError::AddressNack { addr } => write!(f, "no ACK from {addr:#04x}"),
            I2cError::DataNack { addr, index } => {
                write!(f, "{addr:#04x} NACKed data byte {index}")
            }
        }
    }
}

impl core::error::Error for I2cError {}

/// Master-side write access to an I2C bus
pub trait I2cBus {
    /// Write `data` to the 7-bit address `addr`
    fn write(&mut self, addr: u8, data: &[u8]) -> Result<(), I2cError>;

    /// Write a register/control byte followed by `data` in one transaction
    fn write_reg(&mut self, addr: u8, reg: u8, data: &[u8]) -> Result<(), I2cError>;

    /// Address-only transaction; true if a device acknowledged
    fn probe(&mut self, addr: u8) -> bool {
        self.write(addr, &[]).is_ok()
    }
}

/// Probe every non-reserved address and yield the ones that answer
pub fn scan<B: I2cBus>(bus: &mut B) -> impl Iterator<Item = u8> + '_ {
    (SCAN_FIRST_ADDR..SCAN_END_ADDR).filter(move |&addr| bus.probe(addr))
}

/// I2C configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct I2cConfig {
    pub scl_pin: u8,
    pub sda_pin: u8,
    pub freq_hz: u32,
}

/// Bit-banged master on two open-drain GPIOs
pub struct BitBangI2c {
    scl: u8,
    sda: u8,
    delay_cycles: u32,
}

impl BitBangI2c {
    /// Configure both pins and release the bus
    pub fn new(config: &I2cConfig) -> Result<Self, GpioError> {
        gpio::configure(config.scl_pin, gpio::Mode::OpenDrain)?;
        gpio::configure(config.sda_pin, gpio::Mode::OpenDrain)?;

        // ESP32-C3 runs at 160MHz, four half-phases per bit
        let delay_cycles = (160_000_000 / config.freq_hz.max(1)) / 4;

        let mut bus = Self {
            scl: config.scl_pin,
            sda: config.sda_pin,
            delay_cycles,
        };
        bus.sda_high();
        bus.scl_high();
        Ok(bus)
    }

    fn delay(&self) {
        for _ in 0..self.delay_cycles {
            core::hint::spin_loop();
        }
    }

    // Release SCL, pulled up by resistor
    fn scl_high(&mut self) {
        gpio::write_level(self.scl, true);
        self.delay();
    }

    fn scl_low(&mut self) {
        gpio::write_level(self.scl, false);
        self.delay();
    }

    // Release SDA
    fn sda_high(&mut self) {
        gpio::write_level(self.sda, true);
        self.delay();
    }

    fn sda_low(&mut self) {
        gpio::write_level(self.sda, false);
        self.delay();
    }

    fn sda_read(&self) -> bool {
        gpio::input_level(self.sda)
    }

    /// SDA goes low while SCL is high
    fn start(&mut self) {
        self.sda_high();
        self.scl_high();
        self.sda_low();
        self.scl_low();
    }

    /// SDA goes high while SCL is high
    fn stop(&mut self) {
        self.sda_low();
        self.scl_high();
        self.sda_high();
    }

    /// Clock out one byte, returns true on ACK
    fn write_byte(&mut self, data: u8) -> bool {
        for i in (0..8).rev() {
            if data & (1 << i) != 0 {
                self.sda_high();
            } else {
                self.sda_low();
            }
            self.scl_high();
            self.scl_low();
        }

        self.sda_high();
        self.scl_high();
        let ack = !self.sda_read(); // ACK is active low
        self.scl_low();

        ack
    }

    fn transaction(&mut self, addr: u8, reg: Option<u8>, data: &[u8]) -> Result<(), I2cError> {
        self.start();
        let result = self.send(addr, reg, data);
        self.stop();
        result
    }

    fn send(&mut self, addr: u8, reg: Option<u8>, data: &[u8]) -> Result<(), I2cError> {
        if !self.write_byte(addr << 1) {
            return Err(I2cError::AddressNack { addr });
        }
        let payload = reg.iter().chain(data.iter());
        for (index, &byte) in payload.enumerate() {
            if !self.write_byte(byte) {
                return Err(I2cError::DataNack { addr, index });
            }
        }
        Ok(())
    }
}

impl I2cBus for BitBangI2c {
    fn write(&mut self, addr: u8, data: &[u8]) -> Result<(), I2cError> {
        self.transaction(addr, None, data)
    }

    fn write_reg(&mut self, addr: u8, reg: u8, data: &[u8]) -> Result<(), I2cError> {
        self.transaction(addr, Some(reg), data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBus;

    #[test]
    fn scan_reports_acknowledging_addresses() {
        let mut bus = FakeBus::with_devices(&[0x3C, 0x68, 0x76]);
        let found: Vec<u8> = scan(&mut bus).collect();
        assert_eq!(found, [0x3C, 0x68, 0x76]);
    }

    #[test]
    fn scan_skips_reserved_addresses() {
        let mut bus = FakeBus::with_devices(&[0x00, 0x07, 0x08, 0x77, 0x78, 0x7F]);
        let found: Vec<u8> = scan(&mut bus).collect();
        assert_eq!(found, [0x08, 0x77]);
        assert_eq!(bus.probes, usize::from(SCAN_END_ADDR - SCAN_FIRST_ADDR));
    }

    #[test]
    fn empty_bus_finds_nothing() {
        let mut bus = FakeBus::default();
        assert_eq!(scan(&mut bus).count(), 0);
    }
}
