//! ani.zip episode mapping client.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use kagami_core::types::{EnrichmentBundle, EpisodeRecord, MediaId};
use serde::Deserialize;
use tracing::debug;

use super::http_client;
use crate::client::EnrichmentClient;
use crate::error::ClientError;

pub const ANIZIP_BASE_URL: &str = "https://api.ani.zip";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MappingsResponse {
    #[serde(default)]
    episodes: HashMap<String, AniZipEpisode>,
    episode_count: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AniZipEpisode {
    #[serde(default)]
    title: HashMap<String, Option<String>>,
    air_date: Option<String>,
    #[serde(rename = "airdate")]
    air_date_short: Option<String>,
    image: Option<String>,
    overview: Option<String>,
    summary: Option<String>,
    length: Option<u32>,
    runtime: Option<u32>,
    absolute_episode_number: Option<u32>,
}

impl AniZipEpisode {
    /// English title, then romaji, then Japanese.
    fn title(&self) -> Option<String> {
        ["en", "x-jat", "ja"]
            .iter()
            .find_map(|lang| self.title.get(*lang).cloned().flatten())
            .filter(|t| !t.trim().is_empty())
    }

    fn into_record(self, episode: u32) -> EpisodeRecord {
        EpisodeRecord {
            episode,
            title: self.title(),
            air_date: self
                .air_date_short
                .or(self.air_date)
                .filter(|d| !d.is_empty()),
            image: self.image,
            overview: self.overview.or(self.summary),
            length_minutes: self.length.or(self.runtime),
            absolute_number: self.absolute_episode_number,
        }
    }
}

enum EpisodeKey {
    Main(u32),
    Special(u32),
}

/// `"5"` is episode 5, `"S2"` is special 2; anything else is skipped.
fn episode_key(key: &str) -> Option<EpisodeKey> {
    if let Some(n) = key.strip_prefix('S') {
        return n.parse().ok().map(EpisodeKey::Special);
    }
    key.parse().ok().map(EpisodeKey::Main)
}

/// Enrichment client backed by ani.zip's AniList mappings.
#[derive(Debug, Clone)]
pub struct AniZipClient {
    http: reqwest::Client,
    base_url: String,
}

impl AniZipClient {
    pub fn new() -> Result<Self, ClientError> {
        Self::with_base_url(ANIZIP_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let base_url: String = base_url.into();
        Ok(Self {
            http: http_client(Duration::from_secs(30))?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl EnrichmentClient for AniZipClient {
    async fn fetch_enrichment(&self, id: MediaId) -> Result<EnrichmentBundle, ClientError> {
        let url = format!("{}/mappings", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("anilist_id", id.0)])
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(id));
        }
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let mappings: MappingsResponse = serde_json::from_str(&response.text().await?)?;

        let mut bundle = EnrichmentBundle::new(id);
        bundle.episode_count = mappings.episode_count;
        for (key, episode) in mappings.episodes {
            match episode_key(&key) {
                Some(EpisodeKey::Main(n)) => {
                    bundle.episodes.insert(n, episode.into_record(n));
                }
                Some(EpisodeKey::Special(n)) => {
                    bundle.specials.insert(n, episode.into_record(n));
                }
                None => debug!(%id, key = %key, "skipping unknown episode key"),
            }
        }

        debug!(
            %id,
            episodes = bundle.episodes.len(),
            specials = bundle.specials.len(),
            "fetched enrichment"
        );
        Ok(bundle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn mappings_fill_episodes_and_specials() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/mappings"))
            .and(query_param("anilist_id", "21"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "titles": { "en": "Show Name" },
                "episodeCount": 12,
                "episodes": {
                    "1": {
                        "title": { "en": "Beginnings", "x-jat": "Hajimari" },
                        "airdate": "2020-01-05",
                        "image": "https://img.example/1.jpg",
                        "overview": "It starts.",
                        "length": 24,
                        "absoluteEpisodeNumber": 1
                    },
                    "5": { "title": { "en": null, "x-jat": "Go" }, "runtime": 23 },
                    "S1": { "title": { "en": "Recap" } },
                    "C1": { "title": { "en": "Credits" } }
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = AniZipClient::with_base_url(format!("{}/", server.uri())).unwrap();
        let bundle = client.fetch_enrichment(MediaId(21)).await.unwrap();

        assert_eq!(bundle.media_id, MediaId(21));
        assert_eq!(bundle.episode_count, Some(12));
        assert_eq!(bundle.episodes.len(), 2);
        assert_eq!(bundle.specials.len(), 1);

        let first = &bundle.episodes[&1];
        assert_eq!(first.title.as_deref(), Some("Beginnings"));
        assert_eq!(first.air_date.as_deref(), Some("2020-01-05"));
        assert_eq!(first.length_minutes, Some(24));
        assert_eq!(first.absolute_number, Some(1));

        let fifth = &bundle.episodes[&5];
        assert_eq!(fifth.title.as_deref(), Some("Go"));
        assert_eq!(fifth.length_minutes, Some(23));

        assert_eq!(bundle.specials[&1].title.as_deref(), Some("Recap"));
    }

    #[tokio::test]
    async fn missing_mapping_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = AniZipClient::with_base_url(server.uri()).unwrap();
        let err = client.fetch_enrichment(MediaId(3)).await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound(MediaId(3))));
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = AniZipClient::with_base_url(server.uri()).unwrap();
        let err = client.fetch_enrichment(MediaId(3)).await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[test]
    fn episode_keys() {
        assert!(matches!(episode_key("12"), Some(EpisodeKey::Main(12))));
        assert!(matches!(episode_key("S3"), Some(EpisodeKey::Special(3))));
        assert!(episode_key("C1").is_none());
        assert!(episode_key("").is_none());
    }
}
