//! Shared vocabulary for the upstream metadata sources

use serde_json::Value;
use thiserror::Error;

/// The four upstream lookups a search can fan out to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// ISWC registry, queried by song title
    IswcNet,
    /// IFPI ISRC registry, queried by ISRC code
    Ifpi,
    /// MusicBrainz recording search by song title
    MusicBrainzSong,
    /// MusicBrainz recording search by ISRC code
    MusicBrainzIsrc,
}

impl Source {
    /// Short name used in log lines
    pub fn name(&self) -> &'static str {
        match self {
            Source::IswcNet => "iswcnet",
            Source::Ifpi => "ifpi",
            Source::MusicBrainzSong => "musicbrainz-song",
            Source::MusicBrainzIsrc => "musicbrainz-isrc",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Failures a single source lookup can produce
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Outcome of one lookup: a JSON payload, no match, or a failure.
///
/// Callers that assemble the aggregate response collapse the error case to
/// "no data"; the distinction exists so the failure can be logged with its
/// cause first.
pub type LookupResult = Result<Option<Value>, SourceError>;

/// Treat a JSON `null` body as "no data" rather than a payload.
pub(crate) fn non_null(value: Value) -> Option<Value> {
    if value.is_null() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_source_names() {
        assert_eq!(Source::IswcNet.name(), "iswcnet");
        assert_eq!(Source::Ifpi.name(), "ifpi");
        assert_eq!(Source::MusicBrainzSong.name(), "musicbrainz-song");
        assert_eq!(Source::MusicBrainzIsrc.name(), "musicbrainz-isrc");
    }

    #[test]
    fn test_non_null_passes_data_through() {
        let value = json!({ "title": "Yesterday" });
        assert_eq!(non_null(value.clone()), Some(value));
    }

    #[test]
    fn test_non_null_collapses_null() {
        assert_eq!(non_null(Value::Null), None);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            SourceError::Network("connection refused".to_string()).to_string(),
            "Network error: connection refused"
        );
        assert_eq!(
            SourceError::Api(503, "unavailable".to_string()).to_string(),
            "API error 503: unavailable"
        );
    }
}
