/// Failure taxonomy for a single aggregation run.
///
/// A worker localizes its own failure into the one `PartialResult` it
/// reports; the merger surfaces the first failure it sees and discards all
/// partial output.
#[derive(thiserror::Error, Debug)]
pub enum AggregationError {
    #[error("Invalid worker configuration: {0}")]
    Configuration(String),
    #[error("I/O error")]
    Io(#[from] std::io::Error),
    #[error("Couldn't parse record '{record}': {reason}")]
    Parse { record: String, reason: String },
    #[error("Missing entry for station '{0}' (expected this to exist as we've seen this key before)")]
    Consistency(String),
    #[error("Worker task failed")]
    Join(#[from] tokio::task::JoinError),
}

impl AggregationError {
    pub(crate) fn parse(record: &[u8], reason: impl ToString) -> Self {
        Self::Parse {
            record: String::from_utf8_lossy(record).into_owned(),
            reason: reason.to_string(),
        }
    }
}
