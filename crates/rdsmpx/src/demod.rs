//! DPSK demodulation of the 57 kHz RDS subcarrier.
//!
//! The input is the FM multiplex baseband as signed 16-bit little-endian PCM
//! at 228 kHz. Per sample, the subcarrier is mixed down to complex baseband,
//! anti-alias filtered and amplitude normalised. Every 12th sample
//! (19 kHz) the differential phase against a 17-sample delay is shaped by a
//! second low-pass filter and sliced to a tentative symbol; every 16th such
//! decision (1187.5 Hz nominal) one bit enters the output buffer.
//!
//! Bit timing is a fixed 1:16 decimation of the 19 kHz clock with no drift
//! tracking, so very long captures can slip symbols relative to the
//! transmitter clock.

use std::f32::consts::{FRAC_PI_2, PI};
use std::io::{ErrorKind, Read};

use num_complex::Complex;
use tracing::debug;

use crate::bits::{BitBuffer, BitSource};
use crate::dsp::agc::Agc;
use crate::dsp::delay::DelayLine;
use crate::dsp::fir::{windowed_sinc, FirFilter};
use crate::dsp::nco::Nco;
use crate::error::Result;

/// Input sample rate in Hz.
pub const SAMPLE_RATE: f64 = 228_000.0;
/// RDS subcarrier centre frequency in Hz.
pub const SUBCARRIER_FREQ: f64 = 57_000.0;

/// Samples read from the input per refill.
const INPUT_CHUNK: usize = 4096;
/// Capacity of the decoded bit buffer.
const BIT_BUFFER_LEN: usize = 1024;
/// Input decimation: the phase detector runs at 228 kHz / 12 = 19 kHz.
const DECIMATION: u64 = 12;
/// Symbol clock: one bit per 16 phase-detector ticks (1187.5 Hz).
const CLOCK_RATIO: u64 = 16;
/// Differential phase reference delay, in decimated samples.
const PHASE_DELAY: usize = 17;

const ANTIALIAS_TAPS: usize = 512;
const ANTIALIAS_CUTOFF_HZ: f32 = 1500.0;
const PHASE_TAPS: usize = 64;
const AGC_BANDWIDTH: f32 = 1e-3;

/// DPSK receiver turning MPX samples into raw RDS bits.
pub struct DpskDemodulator<R> {
    reader: R,
    nco: Nco,
    antialias_fir: FirFilter,
    phase_fir: FirFilter,
    agc: Agc,
    phase_delay: DelayLine,
    bit_buffer: BitBuffer,
    num_samples: u64,
    clock_phase: u64,
    is_eof: bool,
}

impl<R: Read> DpskDemodulator<R> {
    pub fn new(reader: R) -> Self {
        let fs = SAMPLE_RATE as f32;
        DpskDemodulator {
            reader,
            nco: Nco::new(SUBCARRIER_FREQ, SAMPLE_RATE),
            antialias_fir: FirFilter::new(windowed_sinc(ANTIALIAS_CUTOFF_HZ / fs, ANTIALIAS_TAPS)),
            // The phase filter runs at the decimated rate, hence the
            // decimation factor in its normalised cutoff.
            phase_fir: FirFilter::new(windowed_sinc(
                1200.0 * DECIMATION as f32 / fs,
                PHASE_TAPS,
            )),
            agc: Agc::new(AGC_BANDWIDTH),
            phase_delay: DelayLine::new(PHASE_DELAY),
            bit_buffer: BitBuffer::new(BIT_BUFFER_LEN),
            num_samples: 0,
            clock_phase: 0,
            is_eof: false,
        }
    }

    /// Read one chunk of samples and run them through the signal chain. A
    /// short read marks end of input and the partial chunk is discarded.
    fn demodulate_more_bits(&mut self) -> Result<()> {
        let mut buf = [0u8; INPUT_CHUNK * 2];
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.is_eof = true;
                    return Err(e.into());
                }
            }
        }
        if filled < buf.len() {
            self.is_eof = true;
            debug!(samples = self.num_samples, "sample stream ended");
            return Ok(());
        }

        for bytes in buf.chunks_exact(2) {
            let sample = i16::from_le_bytes([bytes[0], bytes[1]]);
            self.process_sample(sample);
        }
        Ok(())
    }

    fn process_sample(&mut self, sample: i16) {
        let down = self.nco.mix_down(f32::from(sample));
        self.antialias_fir.push(down);
        let shaped = self.agc.execute(self.antialias_fir.execute());

        if self.num_samples % DECIMATION == 0 {
            let ph1 = shaped.arg();
            let ph0 = self.phase_delay.push_read(ph1);

            let mut dph = ph1 - ph0;
            if dph > PI {
                dph -= 2.0 * PI;
            }
            if dph < -PI {
                dph += 2.0 * PI;
            }
            // A symbol transition lands near |dph| = pi, steady carrier near
            // zero; recentre so the slicer decides at the midpoint.
            let metric = dph.abs() - FRAC_PI_2;

            self.phase_fir.push(Complex::new(metric, 0.0));
            let decision = self.phase_fir.execute().re >= 0.0;

            if self.clock_phase % CLOCK_RATIO == 0 {
                self.bit_buffer.append(decision);
            }
            self.clock_phase += 1;
        }

        self.nco.step();
        self.num_samples += 1;
    }
}

impl<R: Read> BitSource for DpskDemodulator<R> {
    fn next_bit(&mut self) -> Result<bool> {
        while self.bit_buffer.fill_count() < 1 && !self.is_eof {
            self.demodulate_more_bits()?;
        }
        if self.bit_buffer.fill_count() > 0 {
            Ok(self.bit_buffer.next())
        } else {
            Ok(false)
        }
    }

    fn is_eof(&self) -> bool {
        self.is_eof
    }
}
