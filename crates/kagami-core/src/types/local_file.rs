use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::catalog::MediaId;
use super::enrichment::{EpisodeKind, EpisodeMetadata};
use super::tokens::ParsedTokens;

/// Match verdict for one local file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchedEntry {
    pub media_id: MediaId,
    /// Title similarity of the accepted entry, in `[0.0, 1.0]`.
    pub confidence: f64,
    /// Episode number relative to `media_id` after offset resolution.
    pub episode: Option<u32>,
    /// Episode list of `media_id` the number refers to.
    #[serde(default)]
    pub kind: EpisodeKind,
}

/// Where a file ended up in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Unmatched,
    Matched,
    Hydrated,
}

/// One video file discovered on disk, owned by the scan that created it.
///
/// `matched` and `metadata` are write-once: later writes are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalFile {
    path: PathBuf,
    name: String,
    parsed: ParsedTokens,
    matched: Option<MatchedEntry>,
    metadata: Option<EpisodeMetadata>,
}

impl LocalFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, parsed: ParsedTokens) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self {
            path,
            name,
            parsed,
            matched: None,
            metadata: None,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw file name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn parsed(&self) -> &ParsedTokens {
        &self.parsed
    }

    #[must_use]
    pub fn matched(&self) -> Option<&MatchedEntry> {
        self.matched.as_ref()
    }

    #[must_use]
    pub fn metadata(&self) -> Option<&EpisodeMetadata> {
        self.metadata.as_ref()
    }

    #[must_use]
    pub fn status(&self) -> FileStatus {
        match (&self.matched, &self.metadata) {
            (None, _) => FileStatus::Unmatched,
            (Some(_), None) => FileStatus::Matched,
            (Some(_), Some(_)) => FileStatus::Hydrated,
        }
    }

    /// Records a match verdict. The first verdict sticks; the one in
    /// effect is returned.
    pub fn assign_match(&mut self, entry: MatchedEntry) -> &MatchedEntry {
        self.matched.get_or_insert(entry)
    }

    /// Attaches episode metadata. Refused (returns `false`) when the file
    /// is unmatched, already hydrated, or the metadata belongs to another
    /// media id.
    pub fn attach_metadata(&mut self, metadata: EpisodeMetadata) -> bool {
        let Some(matched) = self.matched else {
            return false;
        };
        if self.metadata.is_some() || matched.media_id != metadata.media_id {
            return false;
        }
        self.metadata = Some(metadata);
        true
    }
}
