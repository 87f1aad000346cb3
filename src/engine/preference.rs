use crate::dom::Document;

/// The user's reduced-motion setting, read once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MotionPreference {
    reduced: bool,
}

impl MotionPreference {
    /// A host that cannot evaluate the query allows motion
    pub fn detect<D: Document>(doc: &D, query: &str) -> Self {
        let reduced = doc.media_matches(query).unwrap_or(false);
        Self { reduced }
    }

    pub fn reduced() -> Self {
        Self { reduced: true }
    }

    pub fn prefers_reduced_motion(&self) -> bool {
        self.reduced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDocument;

    const QUERY: &str = "(prefers-reduced-motion: reduce)";

    #[test]
    fn test_query_match() {
        let mut doc = MemoryDocument::new();
        doc.set_media(QUERY, true);
        assert!(MotionPreference::detect(&doc, QUERY).prefers_reduced_motion());

        doc.set_media(QUERY, false);
        assert!(!MotionPreference::detect(&doc, QUERY).prefers_reduced_motion());
    }

    #[test]
    fn test_missing_capability_allows_motion() {
        let doc = MemoryDocument::new();
        assert!(!MotionPreference::detect(&doc, QUERY).prefers_reduced_motion());
    }
}
