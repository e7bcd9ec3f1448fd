//! Debounced falling-edge buttons
//!
//! The GPIO interrupt handler calls [`DebouncedButton::on_edge`] with the
//! current millisecond timestamp; the main loop calls
//! [`DebouncedButton::take`] once per iteration. Each field has a single
//! writer: the handler sets `pending` and the timestamp, the loop only clears
//! `pending`. Plain atomic loads and stores are enough for that, so there is
//! no lock (and no compare-and-swap, which the ESP32-C3 core lacks).

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

pub struct DebouncedButton {
    interval_ms: u32,
    pending: AtomicBool,
    last_accepted_ms: AtomicU32,
    // Written by the handler only, so the first edge after boot always counts
    seen_edge: AtomicBool,
}

impl DebouncedButton {
    pub const fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            pending: AtomicBool::new(false),
            last_accepted_ms: AtomicU32::new(0),
            seen_edge: AtomicBool::new(false),
        }
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Record a falling edge seen at `now_ms`. Returns true if it counted as a
    /// press, false if it was bounce.
    pub fn on_edge(&self, now_ms: u32) -> bool {
        if self.seen_edge.load(Ordering::Relaxed) {
            let last = self.last_accepted_ms.load(Ordering::Relaxed);
            if now_ms.wrapping_sub(last) < self.interval_ms {
                return false;
            }
        }
        self.last_accepted_ms.store(now_ms, Ordering::Relaxed);
        self.seen_edge.store(true, Ordering::Relaxed);
        self.pending.store(true, Ordering::Release);
        true
    }

    /// Consume a pending press
    pub fn take(&self) -> bool {
        if self.pending.load(Ordering::Acquire) {
            self.pending.store(false, Ordering::Release);
            true
        } else {
            false
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Timestamp of the last accepted edge, if there has been one
    pub fn last_accepted_ms(&self) -> Option<u32> {
        if self.seen_edge.load(Ordering::Relaxed) {
            Some(self.last_accepted_ms.load(Ordering::Relaxed))
        } else {
            None
        }
    }
}

/// The two buttons every sketch wires up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonId {
    /// BOOT button (GPIO9)
    Flash,
    /// Button on the header (GPIO3)
    External,
}

pub struct ButtonPair {
    pub flash: DebouncedButton,
    pub external: DebouncedButton,
}

impl ButtonPair {
    pub const fn new(interval_ms: u32) -> Self {
        Self {
            flash: DebouncedButton::new(interval_ms),
            external: DebouncedButton::new(interval_ms),
        }
    }

    pub fn button(&self, id: ButtonId) -> &DebouncedButton {
        match id {
            ButtonId::Flash => &self.flash,
            ButtonId::External => &self.external,
        }
    }

    /// Drain pending presses in a fixed order (flash first)
    pub fn poll(&self, mut on_press: impl FnMut(ButtonId)) {
        for id in [ButtonId::Flash, ButtonId::External] {
            if self.button(id).take() {
                on_press(id);
            }
        }
    }
}

impl core::fmt::Debug for DebouncedButton {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DebouncedButton")
            .field("interval_ms", &self.interval_ms)
            .field("pending", &self.is_pending())
            .field("last_accepted_ms", &self.last_accepted_ms())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_edge_is_accepted() {
        let button = DebouncedButton::new(40);
        assert!(button.on_edge(0));
        assert!(button.is_pending());
        assert_eq!(button.last_accepted_ms(), Some(0));
    }

    #[test]
    fn bounce_inside_interval_is_discarded() {
        let button = DebouncedButton::new(40);
        button.on_edge(100);
        assert!(button.take());

        assert!(!button.on_edge(139));
        assert!(!button.is_pending());
        assert_eq!(button.last_accepted_ms(), Some(100));
    }

    #[test]
    fn edge_at_interval_is_accepted() {
        let button = DebouncedButton::new(40);
        button.on_edge(100);
        button.take();

        assert!(button.on_edge(140));
        assert!(button.is_pending());
        assert_eq!(button.last_accepted_ms(), Some(140));
    }

    #[test]
    fn bounce_measures_from_last_accepted_edge() {
        let button = DebouncedButton::new(40);
        button.on_edge(0);
        button.on_edge(30);
        // 30 was rejected, so 45 is 45 ms after the last accepted edge
        assert!(button.on_edge(45));
        assert_eq!(button.last_accepted_ms(), Some(45));
    }

    #[test]
    fn take_clears_exactly_once() {
        let button = DebouncedButton::new(40);
        button.on_edge(7);
        assert!(button.take());
        assert!(!button.take());
    }

    #[test]
    fn presses_coalesce_until_taken() {
        let button = DebouncedButton::new(40);
        button.on_edge(0);
        button.on_edge(100);
        button.on_edge(200);
        assert!(button.take());
        assert!(!button.take());
        assert_eq!(button.last_accepted_ms(), Some(200));
    }

    #[test]
    fn interval_survives_counter_wrap() {
        let button = DebouncedButton::new(100);
        button.on_edge(u32::MAX - 10);
        button.take();

        assert!(!button.on_edge(50));
        assert!(button.on_edge(90));
        assert_eq!(button.last_accepted_ms(), Some(90));
    }

    #[test]
    fn buttons_are_independent() {
        let pair = ButtonPair::new(40);
        pair.flash.on_edge(10);

        assert!(!pair.external.is_pending());
        assert_eq!(pair.external.last_accepted_ms(), None);
        // The flash press does not start a debounce window on the other button
        assert!(pair.external.on_edge(11));
    }

    #[test]
    fn poll_drains_both_in_order() {
        let pair = ButtonPair::new(40);
        pair.external.on_edge(5);
        pair.flash.on_edge(6);

        let mut seen = Vec::new();
        pair.poll(|id| seen.push(id));

        assert_eq!(seen, [ButtonId::Flash, ButtonId::External]);
        assert!(!pair.flash.is_pending());
        assert!(!pair.external.is_pending());
    }
}
