//! Metadata source clients and the fan-out aggregator

pub mod aggregator;
pub mod ifpi;
pub mod iswcnet;
pub mod musicbrainz;
pub mod source;

pub use aggregator::{SearchAggregator, SearchResults};
pub use ifpi::IfpiClient;
pub use iswcnet::IswcNetClient;
pub use musicbrainz::MusicBrainzClient;
pub use source::{LookupResult, Source, SourceError};

/// User-Agent sent with every outbound request. MusicBrainz rejects
/// anonymous clients, so keep this descriptive.
pub const USER_AGENT: &str = "tunelens/0.1.0 (https://github.com/tunelens/tunelens)";
