//! RDS decoding from FM multiplex baseband.
//!
//! rdsmpx turns the composite FM multiplex signal into structured records
//! about the broadcasting station: programme identification, programme
//! service name, radiotext, clock time, alternative frequencies, open-data
//! applications and traffic-message-channel envelopes.
//!
//! The pipeline has three stages, each pulling from the one before it:
//!
//! ```text
//! PCM samples ──► DpskDemodulator ──► GroupFramer ──► RdsDecoder ──► Record
//!                 (57 kHz DPSK)       (block sync)    (per-station)
//! ```
//!
//! [`RdsReceiver`] wires the stages together behind a single
//! `next_record()` pull. The demodulator can be replaced by an
//! [`AsciiBitSource`] when the bit stream is produced elsewhere.

pub mod bits;
pub mod demod;
pub mod dsp;
pub mod error;
pub mod framer;
pub mod groups;
pub mod rdstext;
pub mod receiver;
pub mod record;
pub mod station;
pub mod tables;

pub use bits::{AsciiBitSource, BitSource};
pub use demod::DpskDemodulator;
pub use error::{Error, Result};
pub use framer::GroupFramer;
pub use groups::{Group, GroupType};
pub use receiver::RdsReceiver;
pub use record::Record;
pub use station::{RdsDecoder, Station};
