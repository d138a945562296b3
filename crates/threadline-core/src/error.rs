//! Error type for requests against an upstream API

/// Failure while talking to an upstream endpoint.
///
/// `Fetch` covers the transport itself (connect/read failures, non-2xx
/// status). `Schema` means the response arrived but did not have the shape
/// the pipeline expects. Neither is retried: both abort the stage.
#[derive(Debug)]
pub enum SourceError {
    Fetch {
        /// URL, page or author the request was for
        target: String,
        status: Option<u16>,
        message: String,
    },
    Schema {
        target: String,
        message: String,
    },
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fetch {
                target,
                status: Some(s),
                message,
            } => write!(f, "fetch failed for {target}: HTTP {s}: {message}"),
            Self::Fetch {
                target,
                status: None,
                message,
            } => write!(f, "fetch failed for {target}: {message}"),
            Self::Schema { target, message } => {
                write!(f, "unexpected response for {target}: {message}")
            }
        }
    }
}

impl std::error::Error for SourceError {}

impl SourceError {
    /// Build a fetch error from a reqwest failure.
    ///
    /// The URL is stripped from the reqwest message since `target` already
    /// carries it.
    pub fn from_reqwest(target: &str, e: reqwest::Error) -> Self {
        Self::Fetch {
            target: target.to_string(),
            status: e.status().map(|s| s.as_u16()),
            message: e.without_url().to_string(),
        }
    }

    pub fn schema(target: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Schema {
            target: target.into(),
            message: message.to_string(),
        }
    }

    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }

    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema { .. })
    }

    /// HTTP status, when the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Fetch { status, .. } => *status,
            Self::Schema { .. } => None,
        }
    }
}
