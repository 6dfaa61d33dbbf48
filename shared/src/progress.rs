//! Decorative progress shown while a generation request is in flight.
//!
//! The value is not tied to any transfer or server progress. It creeps towards
//! [`CEILING`] on a timer and jumps to 100 when the request settles.

pub const TICK_INTERVAL_MS: u32 = 1000;
pub const RESET_DELAY_MS: u32 = 1500;
pub const CEILING: u8 = 90;
pub const COMPLETE: u8 = 100;

/// Maps a uniform sample in `[0, 1)` to a step of 2, 3 or 4.
pub fn step_for(sample: f64) -> u8 {
    let bucket = (sample.clamp(0.0, 0.999_999) * 3.0).floor() as u8;
    2 + bucket
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CosmeticProgress {
    value: u8,
}

impl CosmeticProgress {
    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn start(&mut self) {
        self.value = 0;
    }

    pub fn advance(&mut self, sample: f64) -> u8 {
        self.value = self.value.saturating_add(step_for(sample)).min(CEILING);
        self.value
    }

    pub fn finish(&mut self) {
        self.value = COMPLETE;
    }

    pub fn reset(&mut self) {
        self.value = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_range() {
        assert_eq!(step_for(0.0), 2);
        assert_eq!(step_for(0.5), 3);
        assert_eq!(step_for(0.99), 4);
        assert_eq!(step_for(1.0), 4);
        assert_eq!(step_for(-3.0), 2);
    }

    #[test]
    fn test_clamps_until_finished() {
        let mut progress = CosmeticProgress::default();
        progress.start();
        let mut last = 0;
        for _ in 0..100 {
            let value = progress.advance(0.99);
            assert!(value >= last);
            last = value;
        }
        assert_eq!(progress.value(), CEILING);

        progress.finish();
        assert_eq!(progress.value(), COMPLETE);
        progress.reset();
        assert_eq!(progress.value(), 0);
    }
}
