use serde::Deserialize;

/// Default page width (A4 portrait at 96 dpi)
pub const DEFAULT_PAGE_WIDTH: f64 = 794.0;

/// Default page height (A4 portrait at 96 dpi)
pub const DEFAULT_PAGE_HEIGHT: f64 = 1123.0;

/// Target document format version
pub const DOCUMENT_VERSION: &str = "2.0.0";

/// How fresh node, page and document ids are minted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// Random v4 UUIDs
    #[default]
    Uuid,
    /// `n1`, `n2`, ... for reproducible output
    Sequential,
}

/// Options controlling a migration run
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MigrationOptions {
    pub document_version: String,
    /// Font used when the layout declares none and embeds none
    pub fallback_font: String,
    pub id_strategy: IdStrategy,
    pub page_width: f64,
    pub page_height: f64,
}

impl Default for MigrationOptions {
    fn default() -> Self {
        Self {
            document_version: DOCUMENT_VERSION.to_string(),
            fallback_font: "Arial".to_string(),
            id_strategy: IdStrategy::Uuid,
            page_width: DEFAULT_PAGE_WIDTH,
            page_height: DEFAULT_PAGE_HEIGHT,
        }
    }
}

/// Id allocator for a single migration run
///
/// Ids are never reused within a run. UUID collisions are not checked.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    strategy: IdStrategy,
    counter: u64,
}

impl IdGenerator {
    pub fn new(strategy: IdStrategy) -> Self {
        Self {
            strategy,
            counter: 0,
        }
    }

    pub fn next_id(&mut self) -> String {
        self.counter += 1;
        match self.strategy {
            IdStrategy::Uuid => uuid::Uuid::new_v4().to_string(),
            IdStrategy::Sequential => format!("n{}", self.counter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sequential_ids() {
        let mut ids = IdGenerator::new(IdStrategy::Sequential);
        assert_eq!(ids.next_id(), "n1");
        assert_eq!(ids.next_id(), "n2");
    }

    #[test]
    fn test_uuid_ids_are_unique() {
        let mut ids = IdGenerator::new(IdStrategy::Uuid);
        let a = ids.next_id();
        let b = ids.next_id();
        assert_ne!(a, b);
        assert!(uuid::Uuid::parse_str(&a).is_ok());
    }

    #[test]
    fn test_partial_options_use_defaults() {
        let options: MigrationOptions =
            serde_json::from_value(json!({"idStrategy": "sequential", "fallbackFont": "Inter"}))
                .unwrap();

        assert_eq!(options.id_strategy, IdStrategy::Sequential);
        assert_eq!(options.fallback_font, "Inter");
        assert_eq!(options.document_version, DOCUMENT_VERSION);
        assert_eq!(options.page_width, DEFAULT_PAGE_WIDTH);
    }
}
