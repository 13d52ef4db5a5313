//! Typed view over the grounding metadata a search-grounded model attaches
//! to its reply.
//!
//! The provider's JSON shape is not contractually stable: keys have been
//! camelCase in REST responses and snake_case in SDK dumps, and any level may
//! be missing. [`GroundingMetadata::from_value`] is total and turns whatever
//! arrived into explicit `Option`s, so every shape assumption lives here.

use serde_json::Value;

/// Grounding metadata for one model candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroundingMetadata {
    pub grounding_chunks: Option<Vec<GroundingChunk>>,
}

/// One evidence chunk. Only web chunks carry citations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroundingChunk {
    pub web: Option<WebSource>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebSource {
    pub uri: Option<String>,
    pub title: Option<String>,
}

impl GroundingMetadata {
    /// Build from raw provider JSON. Never fails; unknown shapes become `None`.
    pub fn from_value(value: &Value) -> Self {
        let grounding_chunks = field(value, "groundingChunks", "grounding_chunks")
            .and_then(Value::as_array)
            .map(|chunks| chunks.iter().map(GroundingChunk::from_value).collect());

        Self { grounding_chunks }
    }

    /// Chunks in provider order, empty when the list is absent.
    pub fn chunks(&self) -> &[GroundingChunk] {
        self.grounding_chunks.as_deref().unwrap_or_default()
    }
}

impl GroundingChunk {
    fn from_value(value: &Value) -> Self {
        let web = value
            .get("web")
            .filter(|w| w.is_object())
            .map(WebSource::from_value);
        Self { web }
    }

    /// Safe-navigation to the chunk's URI.
    pub fn uri(&self) -> Option<&str> {
        self.web.as_ref().and_then(|w| w.uri.as_deref())
    }

    /// Safe-navigation to the chunk's title.
    pub fn title(&self) -> Option<&str> {
        self.web.as_ref().and_then(|w| w.title.as_deref())
    }
}

impl WebSource {
    fn from_value(value: &Value) -> Self {
        Self {
            uri: value
                .get("uri")
                .and_then(Value::as_str)
                .map(str::to_string),
            title: value
                .get("title")
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }
}

fn field<'a>(value: &'a Value, camel: &str, snake: &str) -> Option<&'a Value> {
    value.get(camel).or_else(|| value.get(snake))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_camel_case_shape() {
        let raw = json!({
            "groundingChunks": [
                {"web": {"uri": "https://a.example", "title": "A"}},
                {"web": {"uri": "https://b.example"}}
            ],
            "webSearchQueries": ["claim check"]
        });
        let meta = GroundingMetadata::from_value(&raw);
        assert_eq!(meta.chunks().len(), 2);
        assert_eq!(meta.chunks()[0].uri(), Some("https://a.example"));
        assert_eq!(meta.chunks()[1].title(), None);
    }

    #[test]
    fn test_snake_case_shape() {
        let raw = json!({"grounding_chunks": [{"web": {"uri": "https://c.example", "title": "C"}}]});
        let meta = GroundingMetadata::from_value(&raw);
        assert_eq!(meta.chunks()[0].title(), Some("C"));
    }

    #[test]
    fn test_wrong_types_collapse_to_none() {
        let raw = json!({"groundingChunks": {"not": "a list"}});
        assert_eq!(GroundingMetadata::from_value(&raw).grounding_chunks, None);

        let raw = json!({"groundingChunks": [42, {"web": "string"}, {"web": {"uri": 7}}]});
        let meta = GroundingMetadata::from_value(&raw);
        assert_eq!(meta.chunks().len(), 3);
        assert!(meta.chunks().iter().all(|c| c.uri().is_none()));
    }

    #[test]
    fn test_non_object_root() {
        assert_eq!(
            GroundingMetadata::from_value(&Value::Null),
            GroundingMetadata::default()
        );
        assert!(GroundingMetadata::from_value(&json!([1, 2])).chunks().is_empty());
    }
}
