//! Error types for rdsmpx operations.

use thiserror::Error;

/// Result type for rdsmpx operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the decode pipeline.
///
/// End of input is not an error: the pull chain reports it by returning
/// `Ok(None)` from [`crate::receiver::RdsReceiver::next_record`]. Only
/// genuine I/O failures surface here.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading the sample or bit stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
