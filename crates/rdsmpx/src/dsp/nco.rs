//! Numerically Controlled Oscillator.
//!
//! Generates the 57 kHz local oscillator used to mix the RDS subcarrier down
//! to baseband. Phase is kept in cycles `[0, 1)` and frequency in cycles per
//! sample, following liquid-dsp's `nco_crcf` conventions. The demodulator
//! runs it open-loop at a fixed frequency.

use std::f64::consts::PI;

use num_complex::Complex;

/// Fixed-frequency complex oscillator.
#[derive(Debug, Clone)]
pub struct Nco {
    /// Current phase in cycles [0, 1).
    phase: f64,
    /// Frequency in cycles per sample.
    frequency: f64,
}

impl Nco {
    /// Create an oscillator at `frequency_hz` for a stream sampled at
    /// `sample_rate` Hz.
    pub fn new(frequency_hz: f64, sample_rate: f64) -> Self {
        Nco {
            phase: 0.0,
            frequency: frequency_hz / sample_rate,
        }
    }

    /// Current phase in cycles [0, 1).
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Frequency in cycles per sample.
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Advance the phase by one sample, wrapping into [0, 1).
    pub fn step(&mut self) {
        self.phase += self.frequency;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        } else if self.phase < 0.0 {
            self.phase += 1.0;
        }
    }

    /// Mix a real input sample down by the oscillator frequency:
    /// `x · exp(−jθ)`.
    pub fn mix_down(&self, input: f32) -> Complex<f32> {
        let theta = 2.0 * PI * self.phase;
        Complex::new(
            input * theta.cos() as f32,
            -input * theta.sin() as f32,
        )
    }
}
