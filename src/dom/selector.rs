/// Typed element query
///
/// Kept structural rather than a CSS string so the in-memory document can
/// match it without a selector parser. [`Selector::to_css`] renders the
/// equivalent selector list for `querySelectorAll`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selector {
    /// Element must carry at least one of these classes (ignored when empty)
    pub any_class: Vec<String>,
    /// Element must carry this attribute
    pub attribute: Option<String>,
    /// Element must sit inside an ancestor with this class
    pub within_class: Option<String>,
    /// Element must not carry this class
    pub without_class: Option<String>,
}

impl Selector {
    pub fn classes<S: AsRef<str>>(classes: &[S]) -> Self {
        Self {
            any_class: classes.iter().map(|c| c.as_ref().to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn attribute(name: &str) -> Self {
        Self {
            attribute: Some(name.to_string()),
            ..Default::default()
        }
    }

    pub fn within(mut self, ancestor_class: &str) -> Self {
        self.within_class = Some(ancestor_class.to_string());
        self
    }

    pub fn without(mut self, class: &str) -> Self {
        self.without_class = Some(class.to_string());
        self
    }

    /// True when the selector can never match (no classes and no attribute)
    pub fn is_empty(&self) -> bool {
        self.any_class.is_empty() && self.attribute.is_none()
    }

    /// Render as a CSS selector list
    pub fn to_css(&self) -> String {
        let mut suffix = String::new();
        if let Some(attr) = &self.attribute {
            suffix.push_str(&format!("[{}]", attr));
        }
        if let Some(class) = &self.without_class {
            suffix.push_str(&format!(":not(.{})", class));
        }

        let prefix = self
            .within_class
            .as_ref()
            .map(|c| format!(".{} ", c))
            .unwrap_or_default();

        if self.any_class.is_empty() {
            return format!("{}{}", prefix, suffix);
        }

        self.any_class
            .iter()
            .map(|class| format!("{}.{}{}", prefix, class, suffix))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_list_css() {
        let selector = Selector::classes(&["fade-in", "zoom-in"]).without("animated");
        assert_eq!(
            selector.to_css(),
            ".fade-in:not(.animated), .zoom-in:not(.animated)"
        );
    }

    #[test]
    fn test_attribute_css() {
        let selector = Selector::attribute("data-counter").without("counted");
        assert_eq!(selector.to_css(), "[data-counter]:not(.counted)");
    }

    #[test]
    fn test_within_css() {
        let selector = Selector::classes(&["hero-title", "hero-badge"]).within("hero");
        assert_eq!(selector.to_css(), ".hero .hero-title, .hero .hero-badge");
    }

    #[test]
    fn test_empty() {
        assert!(Selector::classes::<&str>(&[]).is_empty());
        assert!(!Selector::attribute("data-tilt").is_empty());
    }
}
