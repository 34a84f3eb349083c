//! The full decode pipeline behind a single pull interface.

use crate::bits::BitSource;
use crate::error::Result;
use crate::framer::GroupFramer;
use crate::record::Record;
use crate::station::RdsDecoder;

/// Pull-driven RDS receiver: bits from `source`, groups from the framer,
/// semantics from the station decoder. One record per received group.
///
/// # Example
///
/// ```no_run
/// use std::io;
/// use rdsmpx::{DpskDemodulator, RdsReceiver};
///
/// let mut receiver = RdsReceiver::new(DpskDemodulator::new(io::stdin().lock()));
/// while let Some(record) = receiver.next_record().unwrap() {
///     println!("{}", record);
/// }
/// ```
pub struct RdsReceiver<S> {
    source: S,
    framer: GroupFramer,
    decoder: RdsDecoder,
}

impl<S: BitSource> RdsReceiver<S> {
    pub fn new(source: S) -> Self {
        RdsReceiver {
            source,
            framer: GroupFramer::new(),
            decoder: RdsDecoder::new(),
        }
    }

    /// Decode until the next group completes. Returns `Ok(None)` once the
    /// input is exhausted.
    pub fn next_record(&mut self) -> Result<Option<Record>> {
        match self.framer.next_group(&mut self.source)? {
            Some(group) => Ok(Some(self.decoder.update(&group))),
            None => Ok(None),
        }
    }

    /// Access the accumulated per-station state.
    pub fn decoder(&self) -> &RdsDecoder {
        &self.decoder
    }
}
