//! SSD1306 OLED Display Driver
//! ============================
//!
//! Driver for 128x64 monochrome OLED displays using the SSD1306 controller.
//! Communicates via I²C interface.
//!
//! Features:
//! - Any [`I2cBus`] (the sketches use the bit-banged one)
//! - Full display buffer in RAM (1024 bytes)
//! - Text rendering with 5x7 font on a 21x8 character grid
//! - Panel on/off for power save

use core::fmt;

use crate::console::Screen;
use crate::font5x7::FONT5X7;
use crate::i2c::{I2cBus, I2cError};

// Display dimensions
pub const SSD1306_WIDTH: usize = 128;
pub const SSD1306_HEIGHT: usize = 64;

// Character cell: 5 pixel glyph + 1 pixel gap, 8 pixel rows
pub const CHAR_WIDTH: usize = 6;
pub const CHAR_HEIGHT: usize = 8;
pub const TEXT_COLUMNS: usize = SSD1306_WIDTH / CHAR_WIDTH;
pub const TEXT_ROWS: usize = SSD1306_HEIGHT / CHAR_HEIGHT;

// I2C address with SA0 low
pub const SSD1306_I2C_ADDR_DEFAULT: u8 = 0x3C;

const BUFFER_SIZE: usize = SSD1306_WIDTH * SSD1306_HEIGHT / 8;

// SSD1306 Commands
const SSD1306_CMD_SET_CONTRAST: u8 = 0x81;
const SSD1306_CMD_DISPLAY_ALL_ON_RESUME: u8 = 0xA4;
const SSD1306_CMD_NORMAL_DISPLAY: u8 = 0xA6;
const SSD1306_CMD_DISPLAY_OFF: u8 = 0xAE;
const SSD1306_CMD_DISPLAY_ON: u8 = 0xAF;
const SSD1306_CMD_SET_DISPLAY_OFFSET: u8 = 0xD3;
const SSD1306_CMD_SET_START_LINE: u8 = 0x40;
const SSD1306_CMD_MEMORY_MODE: u8 = 0x20;
const SSD1306_CMD_COLUMN_ADDR: u8 = 0x21;
const SSD1306_CMD_PAGE_ADDR: u8 = 0x22;
const SSD1306_CMD_SET_COM_PINS: u8 = 0xDA;
const SSD1306_CMD_SET_DISPLAY_CLK_DIV: u8 = 0xD5;
const SSD1306_CMD_SET_PRECHARGE: u8 = 0xD9;
const SSD1306_CMD_SET_VCOM_DETECT: u8 = 0xDB;
const SSD1306_CMD_SET_MULTIPLEX: u8 = 0xA8;
const SSD1306_CMD_SEG_REMAP: u8 = 0xA0;
const SSD1306_CMD_COM_SCAN_DEC: u8 = 0xC8;
const SSD1306_CMD_CHARGE_PUMP: u8 = 0x8D;

// I²C Control Bytes
const SSD1306_CONTROL_CMD_STREAM: u8 = 0x00;
const SSD1306_CONTROL_DATA_STREAM: u8 = 0x40;

// Power-up sequence, sent as one command stream
#[rustfmt::skip]
const INIT_SEQUENCE: [u8; 25] = [
    SSD1306_CMD_DISPLAY_OFF,
    SSD1306_CMD_SET_DISPLAY_CLK_DIV, 0x80,
    SSD1306_CMD_SET_MULTIPLEX, (SSD1306_HEIGHT - 1) as u8,
    SSD1306_CMD_SET_DISPLAY_OFFSET, 0x00,
    SSD1306_CMD_SET_START_LINE,
    SSD1306_CMD_CHARGE_PUMP, 0x14,
    SSD1306_CMD_MEMORY_MODE, 0x00,
    SSD1306_CMD_SEG_REMAP | 0x01,
    SSD1306_CMD_COM_SCAN_DEC,
    SSD1306_CMD_SET_COM_PINS, 0x12,
    SSD1306_CMD_SET_CONTRAST, 0xCF,
    SSD1306_CMD_SET_PRECHARGE, 0xF1,
    SSD1306_CMD_SET_VCOM_DETECT, 0x40,
    SSD1306_CMD_DISPLAY_ALL_ON_RESUME,
    SSD1306_CMD_NORMAL_DISPLAY,
    SSD1306_CMD_DISPLAY_ON,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayError {
    Bus(I2cError),
}

impl From<I2cError> for DisplayError {
    fn from(err: I2cError) -> Self {
        DisplayError::Bus(err)
    }
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayError::Bus(err) => write!(f, "display bus error: {err}"),
        }
    }
}

impl core::error::Error for DisplayError {}

/// SSD1306 configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ssd1306Config {
    pub i2c_addr: u8,
}

impl Default for Ssd1306Config {
    fn default() -> Self {
        Self { i2c_addr: SSD1306_I2C_ADDR_DEFAULT }
    }
}

pub struct Ssd1306<B> {
    bus: B,
    addr: u8,
    buffer: [u8; BUFFER_SIZE],
}

impl<B: I2cBus> Ssd1306<B> {
    /// Run the power-up sequence and blank the screen
    pub fn new(bus: B, config: &Ssd1306Config) -> Result<Self, DisplayError> {
        let mut display = Self {
            bus,
            addr: config.i2c_addr,
            buffer: [0; BUFFER_SIZE],
        };
        display.send_commands(&INIT_SEQUENCE)?;
        display.display()?;
        Ok(display)
    }

    pub fn release(self) -> B {
        self.bus
    }

    fn send_commands(&mut self, cmds: &[u8]) -> Result<(), DisplayError> {
        self.bus.write_reg(self.addr, SSD1306_CONTROL_CMD_STREAM, cmds)?;
        Ok(())
    }

    /// Clear the display buffer (set all pixels to black)
    pub fn clear(&mut self) {
        self.buffer.fill(0);
    }

    /// Update the physical display with the current buffer contents
    #[rustfmt::skip]
    pub fn display(&mut self) -> Result<(), DisplayError> {
        self.send_commands(&[
            SSD1306_CMD_COLUMN_ADDR, 0, (SSD1306_WIDTH - 1) as u8,
            SSD1306_CMD_PAGE_ADDR, 0, (SSD1306_HEIGHT / 8 - 1) as u8,
        ])?;
        self.bus.write_reg(self.addr, SSD1306_CONTROL_DATA_STREAM, &self.buffer)?;
        Ok(())
    }

    /// Set a single pixel in the display buffer
    pub fn set_pixel(&mut self, x: i32, y: i32, on: bool) {
        if x < 0 || x >= SSD1306_WIDTH as i32 || y < 0 || y >= SSD1306_HEIGHT as i32 {
            return;
        }

        let (x, y) = (x as usize, y as usize);
        let byte = &mut self.buffer[x + (y / 8) * SSD1306_WIDTH];
        if on {
            *byte |= 1 << (y & 7);
        } else {
            *byte &= !(1 << (y & 7));
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        x < SSD1306_WIDTH
            && y < SSD1306_HEIGHT
            && self.buffer[x + (y / 8) * SSD1306_WIDTH] & (1 << (y & 7)) != 0
    }

    /// Draw a single character using the 5x7 font
    pub fn draw_char(&mut self, x: i32, y: i32, c: char) {
        let c = if (' '..='~').contains(&c) { c } else { ' ' };
        let glyph = &FONT5X7[c as usize - ' ' as usize];

        for (i, &line) in glyph.iter().enumerate() {
            for j in 0..7 {
                if line & (1 << j) != 0 {
                    self.set_pixel(x + i as i32, y + j, true);
                }
            }
        }
    }

    /// Draw a text string, wrapping at the right edge
    pub fn draw_string(&mut self, x: i32, y: i32, s: &str) {
        let mut cursor_x = x;
        let mut cursor_y = y;

        for c in s.chars() {
            if c == '\n' {
                cursor_x = x;
                cursor_y += CHAR_HEIGHT as i32;
                continue;
            }
            self.draw_char(cursor_x, cursor_y, c);
            cursor_x += CHAR_WIDTH as i32;

            if cursor_x + CHAR_WIDTH as i32 > SSD1306_WIDTH as i32 {
                cursor_x = x;
                cursor_y += CHAR_HEIGHT as i32;
            }
        }
    }

    /// Turn the panel on or off; RAM contents are kept
    pub fn display_on(&mut self, on: bool) -> Result<(), DisplayError> {
        self.send_commands(&[if on { SSD1306_CMD_DISPLAY_ON } else { SSD1306_CMD_DISPLAY_OFF }])
    }
}

impl<B: I2cBus> Screen for Ssd1306<B> {
    type Error = DisplayError;

    fn columns(&self) -> usize {
        TEXT_COLUMNS
    }

    fn rows(&self) -> usize {
        TEXT_ROWS
    }

    fn clear(&mut self) {
        Ssd1306::clear(self);
    }

    fn draw_text(&mut self, column: usize, row: usize, text: &str) {
        self.draw_string((column * CHAR_WIDTH) as i32, (row * CHAR_HEIGHT) as i32, text);
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        self.display()
    }

    fn set_power_save(&mut self, enabled: bool) -> Result<(), DisplayError> {
        self.display_on(!enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBus;

    fn display() -> Ssd1306<FakeBus> {
        let bus = FakeBus::with_devices(&[SSD1306_I2C_ADDR_DEFAULT]);
        Ssd1306::new(bus, &Ssd1306Config::default()).unwrap()
    }

    #[test]
    fn init_sends_power_up_sequence_then_blank_frame() {
        let bus = display().release();
        let (addr, control, payload) = &bus.writes[0];
        assert_eq!(*addr, SSD1306_I2C_ADDR_DEFAULT);
        assert_eq!(*control, Some(SSD1306_CONTROL_CMD_STREAM));
        assert_eq!(payload.first(), Some(&SSD1306_CMD_DISPLAY_OFF));
        assert_eq!(payload.last(), Some(&SSD1306_CMD_DISPLAY_ON));

        let (_, control, frame) = bus.writes.last().unwrap();
        assert_eq!(*control, Some(SSD1306_CONTROL_DATA_STREAM));
        assert_eq!(frame.len(), BUFFER_SIZE);
        assert!(frame.iter().all(|&b| b == 0));
    }

    #[test]
    fn missing_display_is_an_error() {
        let result = Ssd1306::new(FakeBus::default(), &Ssd1306Config::default());
        assert!(matches!(
            result,
            Err(DisplayError::Bus(I2cError::AddressNack { addr: SSD1306_I2C_ADDR_DEFAULT }))
        ));
    }

    #[test]
    fn draw_char_sets_glyph_pixels() {
        let mut oled = display();
        // 'I' is a vertical bar in its middle column
        oled.draw_char(0, 0, 'I');
        assert!(oled.pixel(2, 3));
        assert!(!oled.pixel(5, 3));
    }

    #[test]
    fn pixels_outside_the_panel_are_ignored() {
        let mut oled = display();
        oled.set_pixel(-1, 0, true);
        oled.set_pixel(0, SSD1306_HEIGHT as i32, true);
        oled.set_pixel(SSD1306_WIDTH as i32, 0, true);
        assert!(oled.buffer.iter().all(|&b| b == 0));
    }

    #[test]
    fn power_save_turns_panel_off() {
        let mut oled = display();
        oled.set_power_save(true).unwrap();
        let bus = oled.release();
        let (_, _, payload) = bus.writes.last().unwrap();
        assert_eq!(payload.as_slice(), &[SSD1306_CMD_DISPLAY_OFF]);
    }

    #[test]
    fn leaving_power_save_keeps_the_frame() {
        let mut oled = display();
        oled.draw_char(0, 0, 'I');
        oled.set_power_save(true).unwrap();
        oled.set_power_save(false).unwrap();

        assert!(oled.pixel(2, 3));
        let bus = oled.release();
        let (_, control, payload) = bus.writes.last().unwrap();
        assert_eq!(*control, Some(SSD1306_CONTROL_CMD_STREAM));
        assert_eq!(payload.as_slice(), &[SSD1306_CMD_DISPLAY_ON]);
    }
}
