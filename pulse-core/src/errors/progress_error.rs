/// Progress subsystem errors (ledger, streaks, achievements).
///
/// These only fire when rows the system itself wrote come back
/// unparseable — they indicate corruption, not bad caller input.
#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    #[error("invalid calendar day in ledger: {0}")]
    InvalidDay(String),

    #[error("invalid timestamp in ledger: {0}")]
    InvalidTimestamp(String),

    #[error("unknown content tag in ledger: {0}")]
    UnknownContentTag(String),

    #[error("invalid metrics payload: {0}")]
    InvalidMetrics(String),
}
