use async_graphql::ErrorExtensions;
use thiserror::Error;

/// Failure of a single upstream request.
///
/// Errors carry rendered messages rather than the underlying client errors so
/// that one failure can be handed to every caller waiting on the same URL.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UpstreamError {
    #[error("upstream request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("upstream timeout for {0}")]
    Timeout(String),

    #[error("upstream resource not found: {0}")]
    NotFound(String),

    #[error("upstream returned status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("could not decode upstream response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("invalid upstream URL: {0}")]
    InvalidUrl(String),
}

impl UpstreamError {
    /// Short label used to tag metrics and log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::Transport { .. } => "transport",
            UpstreamError::Timeout(_) => "timeout",
            UpstreamError::NotFound(_) => "not_found",
            UpstreamError::Status { .. } => "status",
            UpstreamError::Decode { .. } => "decode",
            UpstreamError::InvalidUrl(_) => "invalid_url",
        }
    }
}

/// Errors surfaced to query callers
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollectionError {
    /// The object ID listing could not be fetched; there is no partial result.
    #[error("could not fetch object listing: {0}")]
    Listing(#[source] UpstreamError),

    #[error("could not fetch object {id}: {source}")]
    Object {
        id: String,
        #[source]
        source: UpstreamError,
    },
}

impl CollectionError {
    fn code(&self) -> &'static str {
        let source = match self {
            CollectionError::Listing(source) => source,
            CollectionError::Object { source, .. } => source,
        };

        match source {
            UpstreamError::NotFound(_) => "UPSTREAM_NOT_FOUND",
            UpstreamError::Timeout(_) => "UPSTREAM_TIMEOUT",
            _ => "UPSTREAM_ERROR",
        }
    }
}

impl ErrorExtensions for CollectionError {
    fn extend(&self) -> async_graphql::Error {
        let code = self.code();
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| e.set("code", code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn graphql_error_carries_code() {
        let error = CollectionError::Object {
            id: "999999".into(),
            source: UpstreamError::NotFound("objects/999999".into()),
        }
        .extend();

        assert_eq!(
            error.message,
            "could not fetch object 999999: upstream resource not found: objects/999999"
        );
        assert_eq!(
            serde_json::to_value(&error.extensions).unwrap(),
            json!({ "code": "UPSTREAM_NOT_FOUND" })
        );
    }

    #[test]
    fn listing_timeout_code() {
        let error = CollectionError::Listing(UpstreamError::Timeout("objects".into()));
        assert_eq!(error.code(), "UPSTREAM_TIMEOUT");
    }
}
