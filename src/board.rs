//! ESP32-C3 board glue
//! ===================
//!
//! Binds the library's platform traits to esp-hal:
//! - [`EspClock`]: `esp_hal::time` + busy-wait `Delay`
//! - [`RtcDeepSleep`]: RTC timer wakeup + `Rtc::sleep_deep`
//! - [`DormantRadio`]: the modem, which these sketches never power
//! - [`buttons`]: falling-edge GPIO interrupt feeding a [`ButtonPair`]
//!
//! Logging goes through `esp-println` on the USB Serial/JTAG port.

use core::cell::RefCell;
use core::fmt;

use critical_section::Mutex;
use esp_hal::delay::Delay;
use esp_hal::gpio::{Event, GpioPin, Input, Io, Pull};
use esp_hal::macros::handler;
use esp_hal::peripherals::{Peripherals, IO_MUX, LPWR};
use esp_hal::rtc_cntl::sleep::TimerWakeupSource;
use esp_hal::rtc_cntl::{reset_reason, Rtc};
use esp_hal::Cpu;

use crate::config;
use crate::debounce::ButtonPair;
use crate::gpio::{GpioError, GpioLed};
use crate::i2c::{BitBangI2c, I2cConfig};
use crate::led::ActiveLevel;
use crate::platform::{Clock, DeepSleep, Radio, SleepRequest};
use crate::reset::{BootReport, ResetCause};
use crate::ssd1306::{DisplayError, Ssd1306, Ssd1306Config};

pub type Oled = Ssd1306<BitBangI2c>;

#[derive(Debug)]
pub enum BoardError {
    Gpio(GpioError),
    Display(DisplayError),
}

impl From<GpioError> for BoardError {
    fn from(err: GpioError) -> Self {
        BoardError::Gpio(err)
    }
}

impl From<DisplayError> for BoardError {
    fn from(err: DisplayError) -> Self {
        BoardError::Display(err)
    }
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::Gpio(err) => write!(f, "{err}"),
            BoardError::Display(err) => write!(f, "{err}"),
        }
    }
}

/// Start the logger and bring up the chip
pub fn init() -> Peripherals {
    esp_println::logger::init_logger(log::LevelFilter::Info);
    esp_hal::init(esp_hal::Config::default())
}

/// Milliseconds since boot, truncated to the debounce counter width
pub fn now_ms() -> u32 {
    esp_hal::time::now().duration_since_epoch().to_millis() as u32
}

pub struct EspClock {
    delay: Delay,
}

impl EspClock {
    pub fn new() -> Self {
        Self { delay: Delay::new() }
    }
}

impl Default for EspClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for EspClock {
    fn now_ms(&self) -> u32 {
        now_ms()
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_millis(ms);
    }
}

/// Classify the reset that started this boot
pub fn boot_report() -> BootReport {
    match reset_reason(Cpu::ProCpu) {
        Some(reason) => BootReport::new(ResetCause::from_soc_code(reason as u32)),
        // esp-hal has no variant for the raw code
        None => BootReport::unreported(),
    }
}

/// An active-low board LED, switched off
pub fn led(pin: u8) -> GpioLed {
    GpioLed::new(pin, ActiveLevel::Low).unwrap_or_else(|err| panic!("LED: {err}"))
}

pub fn i2c_bus() -> Result<BitBangI2c, GpioError> {
    BitBangI2c::new(&I2cConfig {
        scl_pin: config::I2C_SCL_PIN,
        sda_pin: config::I2C_SDA_PIN,
        freq_hz: config::I2C_FREQ_HZ,
    })
}

/// Bring up the OLED on an existing bus
pub fn open_display_on(bus: BitBangI2c) -> Result<Oled, DisplayError> {
    Ssd1306::new(bus, &Ssd1306Config::default())
}

/// Bring up the I2C bus and the OLED on it
pub fn open_display() -> Result<Oled, BoardError> {
    let bus = i2c_bus()?;
    Ok(open_display_on(bus)?)
}

/// Like [`open_display`], logging the failure and carrying on without a screen
pub fn open_display_or_log() -> Option<Oled> {
    match open_display() {
        Ok(oled) => {
            log::info!("OLED initialized");
            Some(oled)
        }
        Err(err) => {
            log::warn!("OLED initialization failed: {}", err);
            None
        }
    }
}

pub struct RtcDeepSleep<'d> {
    rtc: Rtc<'d>,
}

impl RtcDeepSleep<'_> {
    pub fn new(lpwr: LPWR) -> Self {
        Self { rtc: Rtc::new(lpwr) }
    }
}

impl DeepSleep for RtcDeepSleep<'_> {
    fn deep_sleep(&mut self, request: SleepRequest) -> ! {
        // No WiFi stack is linked, so the modem wakes unpowered whatever the mode
        log::debug!("requested radio wake mode {:?}", request.wake_mode);
        let timer = TimerWakeupSource::new(request.duration);
        self.rtc.sleep_deep(&[&timer])
    }
}

/// The modem of the ESP32-C3. These sketches never start the WiFi/BLE stack,
/// so it is already powered down and there is nothing to switch.
pub struct DormantRadio;

impl Radio for DormantRadio {
    fn disable(&mut self) {
        log::debug!("modem is not powered");
    }

    fn enable(&mut self) {
        log::warn!("no radio stack linked, modem stays off");
    }
}

/// Software restart; the next boot reports `SoftwareRestart`
#[allow(unreachable_code)]
pub fn restart() -> ! {
    log::info!("Doing a restart");
    esp_hal::reset::software_reset();
    loop {
        core::hint::spin_loop();
    }
}

struct ButtonLines {
    flash: Input<'static>,
    external: Input<'static>,
    state: &'static ButtonPair,
}

// Input drivers are needed in the handler to acknowledge the interrupt
static BUTTON_LINES: Mutex<RefCell<Option<ButtonLines>>> = Mutex::new(RefCell::new(None));

/// Arm falling-edge interrupts on both buttons, feeding `state`.
///
/// The pin types follow `config::FLASH_BUTTON_PIN` and
/// `config::EXTERNAL_BUTTON_PIN`, so changing either there changes which
/// peripheral the sketches have to pass in.
pub fn buttons(
    io_mux: IO_MUX,
    flash: GpioPin<{ config::FLASH_BUTTON_PIN }>,
    external: GpioPin<{ config::EXTERNAL_BUTTON_PIN }>,
    state: &'static ButtonPair,
) {
    let mut io = Io::new(io_mux);
    io.set_interrupt_handler(on_button_edge);

    // The BOOT button has its pull-up on the board
    let mut flash = Input::new(flash, Pull::None);
    let mut external = Input::new(external, Pull::Up);

    critical_section::with(|cs| {
        flash.listen(Event::FallingEdge);
        external.listen(Event::FallingEdge);
        BUTTON_LINES
            .borrow_ref_mut(cs)
            .replace(ButtonLines { flash, external, state });
    });
}

#[handler]
fn on_button_edge() {
    let now = now_ms();
    critical_section::with(|cs| {
        if let Some(lines) = BUTTON_LINES.borrow_ref_mut(cs).as_mut() {
            if lines.flash.is_interrupt_set() {
                lines.state.flash.on_edge(now);
                lines.flash.clear_interrupt();
            }
            if lines.external.is_interrupt_set() {
                lines.state.external.on_edge(now);
                lines.external.clear_interrupt();
            }
        }
    });
}
