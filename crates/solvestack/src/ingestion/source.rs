use super::candidate::CandidateRecord;

/// One platform client. Implementations keep their native response shapes private and
/// hand back normalized candidates only.
pub trait SourceAdapter {
    /// Stable label used for per-source tallies and log fields.
    fn name(&self) -> &str;

    /// Fetch up to `limit` candidates. Returns an empty list when nothing is found; errors are
    /// reserved for transport or authentication failures.
    fn fetch(&mut self, limit: usize) -> Result<Vec<CandidateRecord>, AdapterError>;
}

impl<S: SourceAdapter + ?Sized> SourceAdapter for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch(&mut self, limit: usize) -> Result<Vec<CandidateRecord>, AdapterError> {
        (**self).fetch(limit)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("authentication rejected: {0}")]
    Auth(String),
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },
    #[error("adapter panicked: {0}")]
    Panicked(String),
}
