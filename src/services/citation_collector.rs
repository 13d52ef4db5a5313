//! Citation collection from grounding metadata.

use tracing::debug;

use crate::domain::models::{GroundingMetadata, SourceObject, PLACEHOLDER_SOURCE_TITLE};

/// Collect `{url, title}` citations in chunk order.
///
/// Chunks without a usable URI are skipped; a missing or blank title becomes
/// [`PLACEHOLDER_SOURCE_TITLE`]. Absent metadata yields an empty list.
pub fn collect_citations(metadata: Option<&GroundingMetadata>) -> Vec<SourceObject> {
    let Some(metadata) = metadata else {
        return Vec::new();
    };

    let chunks = metadata.chunks();
    let citations: Vec<SourceObject> = chunks
        .iter()
        .filter_map(|chunk| {
            let url = chunk.uri().map(str::trim).filter(|u| !u.is_empty())?;
            let title = chunk
                .title()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .unwrap_or(PLACEHOLDER_SOURCE_TITLE);
            Some(SourceObject::new(url, title))
        })
        .collect();

    if citations.len() < chunks.len() {
        debug!(
            chunks = chunks.len(),
            citations = citations.len(),
            "skipped grounding chunks without a web URI"
        );
    }

    citations
}
