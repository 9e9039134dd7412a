//! AniList GraphQL client.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use kagami_core::types::{CatalogEntry, MediaFormat, MediaId};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::http_client;
use crate::client::CatalogClient;
use crate::error::ClientError;

pub const ANILIST_ENDPOINT: &str = "https://graphql.anilist.co";

const MEDIA_FIELDS: &str = r#"
fragment mediaFields on Media {
  id
  format
  episodes
  seasonYear
  title { romaji english native }
  synonyms
  relations { edges { relationType node { id type } } }
}
"#;

const COLLECTION_QUERY: &str = r#"
query ($userName: String) {
  MediaListCollection(userName: $userName, type: ANIME) {
    lists { entries { media { ...mediaFields } } }
  }
}
"#;

const MEDIA_QUERY: &str = r#"
query ($id: Int) {
  Media(id: $id, type: ANIME) { ...mediaFields }
}
"#;

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
    status: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct CollectionData {
    #[serde(rename = "MediaListCollection")]
    collection: Option<Collection>,
}

#[derive(Debug, Deserialize)]
struct Collection {
    #[serde(default)]
    lists: Vec<ListGroup>,
}

#[derive(Debug, Deserialize)]
struct ListGroup {
    #[serde(default)]
    entries: Vec<ListEntry>,
}

#[derive(Debug, Deserialize)]
struct ListEntry {
    media: Option<Media>,
}

#[derive(Debug, Deserialize)]
struct MediaData {
    #[serde(rename = "Media")]
    media: Option<Media>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Media {
    id: u64,
    format: Option<String>,
    episodes: Option<u32>,
    season_year: Option<u16>,
    #[serde(default)]
    title: MediaTitle,
    #[serde(default)]
    synonyms: Vec<String>,
    relations: Option<Relations>,
}

#[derive(Debug, Default, Deserialize)]
struct MediaTitle {
    romaji: Option<String>,
    english: Option<String>,
    native: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Relations {
    #[serde(default)]
    edges: Vec<RelationEdge>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RelationEdge {
    relation_type: Option<String>,
    node: Option<RelationNode>,
}

#[derive(Debug, Deserialize)]
struct RelationNode {
    id: u64,
    #[serde(rename = "type")]
    kind: Option<String>,
}

impl Media {
    fn relation(&self, relation: &str) -> Option<MediaId> {
        self.relations
            .as_ref()?
            .edges
            .iter()
            .filter(|edge| edge.relation_type.as_deref() == Some(relation))
            .filter_map(|edge| edge.node.as_ref())
            .find(|node| node.kind.as_deref().is_none_or(|kind| kind == "ANIME"))
            .map(|node| MediaId(node.id))
    }

    fn into_entry(self) -> CatalogEntry {
        let sequel = self.relation("SEQUEL");
        let prequel = self.relation("PREQUEL");

        let mut titles = [self.title.romaji, self.title.english, self.title.native]
            .into_iter()
            .flatten()
            .chain(self.synonyms)
            .filter(|t| !t.trim().is_empty());
        let primary = titles.next().unwrap_or_default();

        let mut entry = CatalogEntry::new(self.id, primary);
        entry.synonyms = titles.filter(|t| *t != entry.title).collect();
        entry.episode_count = self.episodes;
        entry.format = self
            .format
            .as_deref()
            .map_or(MediaFormat::Unknown, MediaFormat::from_anilist);
        entry.year = self.season_year;
        entry.sequel = sequel;
        entry.prequel = prequel;
        entry
    }
}

/// Catalog client backed by the AniList GraphQL API.
///
/// The tracked catalog is the named user's anime list collection.
#[derive(Debug, Clone)]
pub struct AniListClient {
    http: reqwest::Client,
    endpoint: String,
    user: String,
}

impl AniListClient {
    /// Creates a client for `user` against the public endpoint.
    pub fn new(user: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_endpoint(ANILIST_ENDPOINT, user)
    }

    pub fn with_endpoint(
        endpoint: impl Into<String>,
        user: impl Into<String>,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            http: http_client(Duration::from_secs(30))?,
            endpoint: endpoint.into(),
            user: user.into(),
        })
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, ClientError> {
        let body = json!({
            "query": format!("{query}{MEDIA_FIELDS}"),
            "variables": variables,
        });
        let response = self.http.post(&self.endpoint).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                url: self.endpoint.clone(),
            });
        }

        let text = response.text().await?;
        let parsed: GraphQlResponse<T> = serde_json::from_str(&text)?;
        if let Some(error) = parsed.errors.into_iter().next() {
            return Err(match error.status {
                Some(status) => ClientError::Status {
                    status,
                    url: self.endpoint.clone(),
                },
                None => ClientError::Api(error.message),
            });
        }
        parsed
            .data
            .ok_or_else(|| ClientError::Api("response carried no data".into()))
    }
}

#[async_trait]
impl CatalogClient for AniListClient {
    async fn fetch_tracked_catalog(&self) -> Result<Vec<CatalogEntry>, ClientError> {
        let data: CollectionData = self
            .query(COLLECTION_QUERY, json!({ "userName": self.user }))
            .await?;

        // The same media can sit in several lists (e.g. custom lists).
        let mut entries = BTreeMap::new();
        for media in data
            .collection
            .into_iter()
            .flat_map(|c| c.lists)
            .flat_map(|l| l.entries)
            .filter_map(|e| e.media)
        {
            entries.entry(media.id).or_insert_with(|| media.into_entry());
        }

        debug!(user = %self.user, entries = entries.len(), "fetched tracked catalog");
        Ok(entries.into_values().collect())
    }

    async fn fetch_catalog_entry(&self, id: MediaId) -> Result<CatalogEntry, ClientError> {
        let data: MediaData = self
            .query(MEDIA_QUERY, json!({ "id": id.0 }))
            .await
            .map_err(|err| match err {
                ClientError::Status { status: 404, .. } => ClientError::NotFound(id),
                other => other,
            })?;
        data.media
            .map(Media::into_entry)
            .ok_or(ClientError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn media_json(id: u64, romaji: &str, english: Option<&str>) -> serde_json::Value {
        json!({
            "id": id,
            "format": "TV",
            "episodes": 12,
            "seasonYear": 2020,
            "title": { "romaji": romaji, "english": english, "native": null },
            "synonyms": ["Alt Name"],
            "relations": { "edges": [
                { "relationType": "SEQUEL", "node": { "id": id + 1, "type": "ANIME" } },
                { "relationType": "SEQUEL", "node": { "id": 999, "type": "MANGA" } },
                { "relationType": "PREQUEL", "node": { "id": 500, "type": "ANIME" } }
            ]}
        })
    }

    #[tokio::test]
    async fn tracked_catalog_is_flattened_and_deduplicated() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .and(body_string_contains("MediaListCollection"))
            .and(body_string_contains("someone"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "MediaListCollection": { "lists": [
                    { "entries": [
                        { "media": media_json(1, "Shingeki no Kyojin", Some("Attack on Titan")) },
                        { "media": media_json(5, "Show Name", None) }
                    ]},
                    { "entries": [ { "media": media_json(1, "Shingeki no Kyojin", None) } ] }
                ]}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = AniListClient::with_endpoint(server.uri(), "someone").unwrap();
        let entries = client.fetch_tracked_catalog().await.unwrap();

        assert_eq!(entries.len(), 2);
        let first = &entries[0];
        assert_eq!(first.id, MediaId(1));
        assert_eq!(first.title, "Shingeki no Kyojin");
        assert!(first.synonyms.contains("Attack on Titan"));
        assert!(first.synonyms.contains("Alt Name"));
        assert_eq!(first.episode_count, Some(12));
        assert_eq!(first.format, MediaFormat::Tv);
        assert_eq!(first.year, Some(2020));
        assert_eq!(first.sequel, Some(MediaId(2)));
        assert_eq!(first.prequel, Some(MediaId(500)));
    }

    #[tokio::test]
    async fn single_entry_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "data": { "Media": null },
                "errors": [{ "message": "Not Found.", "status": 404 }]
            })))
            .mount(&server)
            .await;

        let client = AniListClient::with_endpoint(server.uri(), "someone").unwrap();
        let err = client.fetch_catalog_entry(MediaId(77)).await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound(MediaId(77))));
    }

    #[tokio::test]
    async fn single_entry_is_mapped() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("\"id\":2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "Media": media_json(2, "Show Name 2nd Season", None) }
            })))
            .mount(&server)
            .await;

        let client = AniListClient::with_endpoint(server.uri(), "someone").unwrap();
        let entry = client.fetch_catalog_entry(MediaId(2)).await.unwrap();
        assert_eq!(entry.title, "Show Name 2nd Season");
        assert_eq!(entry.sequel, Some(MediaId(3)));
    }

    #[tokio::test]
    async fn graphql_errors_are_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": null,
                "errors": [{ "message": "User not found" }]
            })))
            .mount(&server)
            .await;

        let client = AniListClient::with_endpoint(server.uri(), "nobody").unwrap();
        let err = client.fetch_tracked_catalog().await.unwrap_err();
        assert!(matches!(err, ClientError::Api(ref m) if m == "User not found"));
    }

    #[tokio::test]
    async fn server_errors_map_to_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = AniListClient::with_endpoint(server.uri(), "someone").unwrap();
        let err = client.fetch_tracked_catalog().await.unwrap_err();
        assert!(matches!(err, ClientError::Status { status: 500, .. }));
    }
}
