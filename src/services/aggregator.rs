//! Parallel fan-out across the metadata sources
//!
//! Runs every lookup that applies to the supplied identifiers concurrently,
//! then collapses each outcome to data-or-nothing. A source that fails, has
//! no match, or is disabled contributes `null` to its named slot; it never
//! fails the aggregate search. Each slot is bound to its source by name, so
//! adding or skipping a lookup cannot shift another source's result.

use serde::Serialize;
use serde_json::Value;

use crate::config::Config;
use crate::services::ifpi::IfpiClient;
use crate::services::iswcnet::IswcNetClient;
use crate::services::musicbrainz::MusicBrainzClient;
use crate::services::source::{LookupResult, Source, SourceError};
use crate::services::USER_AGENT;

/// One result slot per metadata source; `None` serializes as JSON `null`
#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    pub iswc: Option<Value>,

    #[serde(rename = "musicbrainzSong")]
    pub musicbrainz_song: Option<Value>,

    pub isrc: Option<Value>,

    #[serde(rename = "musicbrainzISRC")]
    pub musicbrainz_isrc: Option<Value>,
}

/// Fans a search out to the configured metadata sources
pub struct SearchAggregator {
    iswcnet: IswcNetClient,
    ifpi: IfpiClient,
    musicbrainz: MusicBrainzClient,
}

impl SearchAggregator {
    /// Build the aggregator and its shared HTTP client from configuration.
    ///
    /// The per-request timeout applies independently to every outbound
    /// lookup, so one slow source cannot hold the others hostage.
    pub fn new(config: &Config) -> Result<Self, SourceError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| SourceError::Network(e.to_string()))?;

        Ok(Self {
            iswcnet: IswcNetClient::new(http_client.clone(), config.iswcnet.clone()),
            ifpi: IfpiClient::new(http_client.clone(), config.ifpi.clone()),
            musicbrainz: MusicBrainzClient::new(http_client),
        })
    }

    /// Assemble from pre-built clients (tests point these at mock servers).
    pub fn with_clients(
        iswcnet: IswcNetClient,
        ifpi: IfpiClient,
        musicbrainz: MusicBrainzClient,
    ) -> Self {
        Self {
            iswcnet,
            ifpi,
            musicbrainz,
        }
    }

    /// Run every lookup that applies to the provided identifiers.
    ///
    /// `song_name` drives the ISWC registry and the MusicBrainz title
    /// search; `isrc` drives the IFPI registry and the MusicBrainz ISRC
    /// search. A source whose identifier is absent is not contacted and its
    /// slot stays empty.
    pub async fn search(&self, song_name: Option<&str>, isrc: Option<&str>) -> SearchResults {
        let iswc_lookup = async {
            match song_name {
                Some(name) => collapse(Source::IswcNet, self.iswcnet.lookup(name).await),
                None => None,
            }
        };

        let musicbrainz_song_lookup = async {
            match song_name {
                Some(name) => collapse(
                    Source::MusicBrainzSong,
                    self.musicbrainz.search_by_song_name(name).await,
                ),
                None => None,
            }
        };

        let isrc_lookup = async {
            match isrc {
                Some(code) => collapse(Source::Ifpi, self.ifpi.lookup(code).await),
                None => None,
            }
        };

        let musicbrainz_isrc_lookup = async {
            match isrc {
                Some(code) => collapse(
                    Source::MusicBrainzIsrc,
                    self.musicbrainz.search_by_isrc(code).await,
                ),
                None => None,
            }
        };

        let (iswc, musicbrainz_song, isrc_result, musicbrainz_isrc) = tokio::join!(
            iswc_lookup,
            musicbrainz_song_lookup,
            isrc_lookup,
            musicbrainz_isrc_lookup
        );

        SearchResults {
            iswc,
            musicbrainz_song,
            isrc: isrc_result,
            musicbrainz_isrc,
        }
    }
}

/// Collapse a lookup outcome to data-or-nothing, logging the failure first.
fn collapse(source: Source, result: LookupResult) -> Option<Value> {
    match result {
        Ok(Some(data)) => Some(data),
        Ok(None) => {
            tracing::debug!(source = %source, "No data from source");
            None
        }
        Err(e) => {
            tracing::warn!(source = %source, error = %e, "Source lookup failed");
            None
        }
    }
}
