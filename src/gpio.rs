//! ESP32-C3 GPIO Driver
//! Direct register access for the LED outputs and the bit-banged I2C lines

use core::fmt;
use core::ptr::{read_volatile, write_volatile};

use crate::led::{ActiveLevel, Led};

// GPIO register base addresses
const GPIO_BASE: u32 = 0x60004000;
const IO_MUX_BASE: u32 = 0x60009000;

// GPIO registers
const GPIO_OUT_REG: u32 = GPIO_BASE + 0x0004;
const GPIO_OUT_W1TS_REG: u32 = GPIO_BASE + 0x0008;  // Write 1 to set
const GPIO_OUT_W1TC_REG: u32 = GPIO_BASE + 0x000C;  // Write 1 to clear
const GPIO_ENABLE_W1TS_REG: u32 = GPIO_BASE + 0x0024;
const GPIO_IN_REG: u32 = GPIO_BASE + 0x003C;

// IO MUX registers (one per GPIO)
#[inline(always)]
fn gpio_pin_mux_reg(n: u32) -> u32 {
    IO_MUX_BASE + 0x0004 + (n * 4)
}

// IO MUX configuration bits
const FUN_WPU: u32 = 1 << 7;          // Weak pull-up
const FUN_WPD: u32 = 1 << 8;          // Weak pull-down
const FUN_IE: u32 = 1 << 9;           // Input enable
const FUN_DRV_SHIFT: u32 = 10;        // Drive strength
const MCU_SEL_SHIFT: u32 = 12;        // Function select

/// ESP32-C3 has GPIO 0-21
pub const MAX_GPIO: u8 = 21;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioError {
    InvalidPin(u8),
}

impl fmt::Display for GpioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpioError::InvalidPin(pin) => {
                write!(f, "GPIO{pin} does not exist (max GPIO{MAX_GPIO})")
            }
        }
    }
}

impl core::error::Error for GpioError {}

// Register access functions
#[inline(always)]
fn reg_write(addr: u32, val: u32) {
    unsafe { write_volatile(addr as *mut u32, val) }
}

#[inline(always)]
fn reg_read(addr: u32) -> u32 {
    unsafe { read_volatile(addr as *const u32) }
}

/// Pin drive mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Plain push-pull output
    Output,
    /// Output with input enabled and the weak pull-up on, for open-drain style buses
    OpenDrain,
}

pub fn check_pin(pin: u8) -> Result<u8, GpioError> {
    if pin > MAX_GPIO {
        Err(GpioError::InvalidPin(pin))
    } else {
        Ok(pin)
    }
}

/// Route a pin to the GPIO matrix and enable its output driver
pub fn configure(pin: u8, mode: Mode) -> Result<(), GpioError> {
    let pin = check_pin(pin)? as u32;

    let mux_reg = gpio_pin_mux_reg(pin);
    let mut mux_val = reg_read(mux_reg);

    // Set function to GPIO (function 1)
    mux_val &= !(0x7 << MCU_SEL_SHIFT);
    mux_val |= 1 << MCU_SEL_SHIFT;

    // Set drive strength to medium (2)
    mux_val &= !(0x3 << FUN_DRV_SHIFT);
    mux_val |= 2 << FUN_DRV_SHIFT;

    if mode == Mode::OpenDrain {
        mux_val |= FUN_IE | FUN_WPU;
        mux_val &= !FUN_WPD;
    }

    reg_write(mux_reg, mux_val);
    reg_write(GPIO_ENABLE_W1TS_REG, 1 << pin);
    Ok(())
}

// Callers have validated `pin` with `check_pin`
#[inline(always)]
pub(crate) fn write_level(pin: u8, high: bool) {
    let reg = if high { GPIO_OUT_W1TS_REG } else { GPIO_OUT_W1TC_REG };
    reg_write(reg, 1 << pin);
}

#[inline(always)]
pub(crate) fn output_level(pin: u8) -> bool {
    reg_read(GPIO_OUT_REG) & (1 << pin) != 0
}

#[inline(always)]
pub(crate) fn input_level(pin: u8) -> bool {
    reg_read(GPIO_IN_REG) & (1 << pin) != 0
}

/// An LED on a GPIO output
pub struct GpioLed {
    pin: u8,
    active: ActiveLevel,
}

impl GpioLed {
    /// Configure `pin` as an output and switch the LED off
    pub fn new(pin: u8, active: ActiveLevel) -> Result<Self, GpioError> {
        configure(pin, Mode::Output)?;
        let mut led = Self { pin, active };
        led.off();
        Ok(led)
    }
}

impl Led for GpioLed {
    fn set(&mut self, lit: bool) {
        write_level(self.pin, self.active.level_for(lit));
    }

    fn is_lit(&self) -> bool {
        output_level(self.pin) == self.active.level_for(true)
    }
}
