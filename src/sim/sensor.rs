//! Accelerometer feed
//!
//! The sensor callback may run on its own thread, so the smoothed value is an
//! `AtomicU32` holding f32 bits, updated with a single read-modify-write.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::consts::TILT_SMOOTHING;

/// Exponentially smoothed horizontal tilt
#[derive(Debug)]
pub struct TiltSensor {
    bits: AtomicU32,
    raw_weight: f32,
}

impl Default for TiltSensor {
    fn default() -> Self {
        Self::new()
    }
}

impl TiltSensor {
    pub fn new() -> Self {
        Self::with_smoothing(TILT_SMOOTHING)
    }

    /// `raw_weight` is the share of each new reading in the smoothed value
    pub fn with_smoothing(raw_weight: f32) -> Self {
        Self {
            bits: AtomicU32::new(0.0f32.to_bits()),
            raw_weight: raw_weight.clamp(0.0, 1.0),
        }
    }

    /// Fold a raw reading in: `new = raw * w + old * (1 - w)`
    pub fn push_reading(&self, raw: f32) {
        if !raw.is_finite() {
            return;
        }
        let w = self.raw_weight;
        // Closure always returns Some, so this cannot fail
        let _ = self
            .bits
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |old| {
                let smoothed = raw * w + f32::from_bits(old) * (1.0 - w);
                Some(smoothed.to_bits())
            });
    }

    /// Current smoothed value; zero until the first reading
    pub fn value(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Acquire))
    }

    /// Forget all readings
    pub fn reset(&self) {
        self.bits.store(0.0f32.to_bits(), Ordering::Release);
    }
}
