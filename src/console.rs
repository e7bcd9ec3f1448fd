//! Display Console
//! ===============
//!
//! A scrolling text log on a character screen, fed through `core::fmt::Write`
//! so the sketches can `writeln!` to it.
//!
//! - `'\n'` ends the line and redraws the screen
//! - `'\f'` (form feed) clears the log and redraws
//! - lines longer than the screen wrap onto the next line
//! - once the bottom line is used, the next line scrolls everything up by one
//!
//! Characters outside printable ASCII are stored as `'?'`.

use core::fmt;

// Largest screen the console buffers for (21x8 on the 128x64 OLED)
pub const MAX_COLUMNS: usize = 21;
pub const MAX_ROWS: usize = 8;

/// A character-cell screen the console can draw on
pub trait Screen {
    type Error: fmt::Debug;

    fn columns(&self) -> usize;

    fn rows(&self) -> usize;

    /// Blank the frame buffer
    fn clear(&mut self);

    /// Draw `text` into the frame buffer at a character position
    fn draw_text(&mut self, column: usize, row: usize, text: &str);

    /// Push the frame buffer to the panel
    fn flush(&mut self) -> Result<(), Self::Error>;

    fn set_power_save(&mut self, enabled: bool) -> Result<(), Self::Error>;
}

/// No screen attached: lines are still buffered, nothing is drawn
impl<S: Screen> Screen for Option<S> {
    type Error = S::Error;

    fn columns(&self) -> usize {
        self.as_ref().map_or(MAX_COLUMNS, |screen| screen.columns())
    }

    fn rows(&self) -> usize {
        self.as_ref().map_or(MAX_ROWS, |screen| screen.rows())
    }

    fn clear(&mut self) {
        if let Some(screen) = self {
            screen.clear();
        }
    }

    fn draw_text(&mut self, column: usize, row: usize, text: &str) {
        if let Some(screen) = self {
            screen.draw_text(column, row, text);
        }
    }

    fn flush(&mut self) -> Result<(), S::Error> {
        match self {
            Some(screen) => screen.flush(),
            None => Ok(()),
        }
    }

    fn set_power_save(&mut self, enabled: bool) -> Result<(), S::Error> {
        match self {
            Some(screen) => screen.set_power_save(enabled),
            None => Ok(()),
        }
    }
}

pub struct Console<S: Screen> {
    screen: S,
    columns: usize,
    rows: usize,
    lines: [[u8; MAX_COLUMNS]; MAX_ROWS],
    lens: [usize; MAX_ROWS],
    // Line being written; == rows once a newline has gone past the bottom
    row: usize,
    error: Option<S::Error>,
}

impl<S: Screen> Console<S> {
    pub fn new(screen: S) -> Self {
        let columns = screen.columns().clamp(1, MAX_COLUMNS);
        let rows = screen.rows().clamp(1, MAX_ROWS);
        Self {
            screen,
            columns,
            rows,
            lines: [[0; MAX_COLUMNS]; MAX_ROWS],
            lens: [0; MAX_ROWS],
            row: 0,
            error: None,
        }
    }

    pub fn release(self) -> S {
        self.screen
    }

    /// Text of a visible line, top line is 0
    pub fn line(&self, row: usize) -> &str {
        if row >= self.rows {
            return "";
        }
        core::str::from_utf8(&self.lines[row][..self.lens[row]]).unwrap_or_default()
    }

    /// Forget all lines and redraw an empty screen
    pub fn clear(&mut self) -> Result<(), S::Error> {
        self.lens = [0; MAX_ROWS];
        self.row = 0;
        self.refresh()
    }

    /// Redraw every line
    pub fn refresh(&mut self) -> Result<(), S::Error> {
        self.screen.clear();
        for row in 0..self.rows {
            if self.lens[row] > 0 {
                let text = &self.lines[row][..self.lens[row]];
                let text = core::str::from_utf8(text).unwrap_or_default();
                self.screen.draw_text(0, row, text);
            }
        }
        self.screen.flush()
    }

    pub fn set_power_save(&mut self, enabled: bool) -> Result<(), S::Error> {
        self.screen.set_power_save(enabled)
    }

    /// The screen error behind the last `fmt::Error` returned by `write_str`
    pub fn take_error(&mut self) -> Option<S::Error> {
        self.error.take()
    }

    fn scroll_up(&mut self) {
        self.lines.copy_within(1..self.rows, 0);
        self.lens.copy_within(1..self.rows, 0);
        self.lens[self.rows - 1] = 0;
    }

    fn newline(&mut self) {
        if self.row < self.rows {
            self.row += 1;
        } else {
            self.scroll_up();
        }
    }

    fn put(&mut self, byte: u8) {
        if self.row < self.rows && self.lens[self.row] == self.columns {
            self.newline();
        }
        if self.row == self.rows {
            self.scroll_up();
            self.row = self.rows - 1;
        }
        let len = self.lens[self.row];
        self.lines[self.row][len] = byte;
        self.lens[self.row] = len + 1;
    }

    fn redraw(&mut self) -> fmt::Result {
        self.refresh().map_err(|err| {
            self.error = Some(err);
            fmt::Error
        })
    }
}

impl<S: Screen> fmt::Write for Console<S> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut result = Ok(());
        for c in s.chars() {
            match c {
                '\n' => {
                    self.newline();
                    result = result.and(self.redraw());
                }
                '\x0C' => {
                    self.lens = [0; MAX_ROWS];
                    self.row = 0;
                    result = result.and(self.redraw());
                }
                '\r' => {}
                ' '..='~' => self.put(c as u8),
                _ => self.put(b'?'),
            }
        }
        result
    }
}

/// Write a line to the display console, logging rather than failing if the
/// display is gone
pub fn show<S: Screen>(console: &mut Console<S>, args: fmt::Arguments<'_>) {
    if fmt::Write::write_fmt(&mut *console, args).is_err() {
        match console.take_error() {
            Some(err) => log::warn!("display update failed: {:?}", err),
            None => log::warn!("display update failed"),
        }
    }
}
