//! Feed error taxonomy.
//!
//! Both variants are terminal for a load: no partial mapping is ever
//! returned. Per-field coercion problems (bad priority, blank URL) are
//! defaulted during mapping and never reach this type.

pub type FeedResult<T> = Result<T, FeedError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    /// The feed could not be retrieved: connectivity failure, timeout,
    /// or a non-success HTTP status.
    #[error("network error fetching {url}: {reason}")]
    Network {
        url: String,
        status: Option<u16>,
        reason: String,
    },

    /// The feed text is not structurally valid CSV.
    #[error("parse error{}: {message}", line_suffix(.line))]
    Parse { line: Option<u64>, message: String },
}

impl FeedError {
    pub fn network(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Network {
            url: url.into(),
            status: None,
            reason: reason.into(),
        }
    }

    pub fn status(url: impl Into<String>, status: u16) -> Self {
        Self::Network {
            url: url.into(),
            status: Some(status),
            reason: format!("HTTP status {status}"),
        }
    }

    pub fn parse(line: Option<u64>, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    pub const fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    /// HTTP status carried by a network failure, if the server answered.
    pub const fn http_status(&self) -> Option<u16> {
        match self {
            Self::Network { status, .. } => *status,
            Self::Parse { .. } => None,
        }
    }
}

fn line_suffix(line: &Option<u64>) -> String {
    line.map(|l| format!(" at line {l}")).unwrap_or_default()
}

impl From<csv::Error> for FeedError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(csv::Position::line);
        Self::parse(line, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            FeedError::network("https://x", "refused")
                .to_string()
                .starts_with("network error fetching https://x")
        );
        assert_eq!(
            FeedError::parse(Some(4), "bad row").to_string(),
            "parse error at line 4: bad row"
        );
        assert_eq!(
            FeedError::parse(None, "bad row").to_string(),
            "parse error: bad row"
        );
    }

    #[test]
    fn status_errors_are_network_errors() {
        let err = FeedError::status("https://x", 404);
        assert!(err.is_network());
        assert!(!err.is_parse());
        assert_eq!(err.http_status(), Some(404));
    }
}
