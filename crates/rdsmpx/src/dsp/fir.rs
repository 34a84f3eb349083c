//! FIR filter design and streaming execution.
//!
//! The demodulator uses two low-pass filters: a 512-tap anti-alias filter on
//! the complex baseband after the mixer, and a 64-tap shaping filter on the
//! phase-difference signal. Both are designed here with the windowed-sinc
//! method and run sample-by-sample over an internal delay window.

use std::f32::consts::PI;

use num_complex::Complex;

fn sinc(x: f32) -> f32 {
    if x == 0.0 {
        1.0
    } else {
        x.sin() / x
    }
}

/// Blackman window coefficient at position `i` of a window of order `m`.
fn blackman(i: f32, m: f32) -> f32 {
    0.42 - 0.5 * (2.0 * PI * i / m).cos() + 0.08 * (4.0 * PI * i / m).cos()
}

/// Design a windowed-sinc low-pass FIR.
///
/// `cutoff` is the normalised cut-off frequency in cycles per sample and
/// must lie in `[0, 0.5]`. The taps are scaled so they sum to exactly one,
/// giving unity DC gain.
///
/// # Panics
///
/// Panics if `cutoff` is outside `[0, 0.5]` or `len` is zero; both are
/// programming errors, not data-dependent conditions.
pub fn windowed_sinc(cutoff: f32, len: usize) -> Vec<f32> {
    assert!(
        (0.0..=0.5).contains(&cutoff),
        "cutoff must be within [0, 0.5] cycles/sample"
    );
    assert!(len > 0, "filter length must be greater than 0");

    let m = (len - 1) as f32;
    let mut taps: Vec<f32> = (0..len)
        .map(|i| {
            let x = 2.0 * PI * cutoff * (i as f32 - m / 2.0);
            sinc(x) * blackman(i as f32, m)
        })
        .collect();

    let sum: f32 = taps.iter().sum();
    for tap in taps.iter_mut() {
        *tap /= sum;
    }
    taps
}

/// Streaming FIR filter over complex samples.
///
/// Holds the last `len` input samples in a ring; [`FirFilter::execute`]
/// computes the convolution with the design taps at the current position.
///
/// # Example
///
/// ```
/// use num_complex::Complex;
/// use rdsmpx::dsp::fir::{windowed_sinc, FirFilter};
///
/// let mut filter = FirFilter::new(windowed_sinc(0.1, 64));
/// filter.push(Complex::new(1.0, 0.0));
/// let out = filter.execute();
/// assert!(out.norm() <= 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct FirFilter {
    taps: Vec<f32>,
    window: Vec<Complex<f32>>,
    /// Next write position; the newest sample lives just behind it.
    pos: usize,
}

impl FirFilter {
    pub fn new(taps: Vec<f32>) -> Self {
        assert!(!taps.is_empty(), "filter must have at least one tap");
        let len = taps.len();
        FirFilter {
            taps,
            window: vec![Complex::new(0.0, 0.0); len],
            pos: 0,
        }
    }

    /// Shift one sample into the delay window.
    pub fn push(&mut self, sample: Complex<f32>) {
        self.window[self.pos] = sample;
        self.pos = (self.pos + 1) % self.window.len();
    }

    /// Convolve the delay window with the taps: `y = Σ h[k] · x[n−k]`.
    pub fn execute(&self) -> Complex<f32> {
        let len = self.taps.len();
        let mut acc = Complex::new(0.0, 0.0);
        for (k, &tap) in self.taps.iter().enumerate() {
            let idx = (self.pos + len - 1 - k) % len;
            acc += self.window[idx] * tap;
        }
        acc
    }

    pub fn len(&self) -> usize {
        self.taps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }
}
