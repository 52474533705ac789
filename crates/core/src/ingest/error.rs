use std::fmt;

/// Non-2xx answer from the data source.
#[derive(Debug, Clone)]
pub struct UpstreamError {
    pub endpoint: &'static str,
    pub status: u16,
    pub body: String,
}

impl UpstreamError {
    /// 401/403: the api key was missing or rejected.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status, 401 | 403)
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status == 429
    }
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "data source error (endpoint={}, status={}): {}",
            self.endpoint, self.status, self.body
        )
    }
}

impl std::error::Error for UpstreamError {}
