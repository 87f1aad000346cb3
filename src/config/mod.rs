//! Engine configuration
//!
//! Every declarative marker name, threshold and timing constant the engine
//! consults lives here, so a page can rename its classes or retune the
//! effects from a YAML document without rebuilding the engine.

use serde::Deserialize;

use crate::animation::Easing;
use crate::error::{EngineError, Result};

/// Top-level engine configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub reveal: RevealConfig,
    pub counter: CounterConfig,
    pub parallax: ParallaxConfig,
    pub typing: TypingConfig,
    pub pointer: PointerConfig,
    pub hero: HeroConfig,
    /// Media query consulted once at startup
    pub reduced_motion_query: String,
    /// `EnvFilter` directive used by the browser console subscriber
    pub log_level: String,
}

/// Scroll-reveal markers and trigger geometry
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub classes: Vec<String>,
    pub completion_class: String,
    /// Fraction of the element that must be visible (0.0 to 1.0)
    pub threshold: f64,
    /// Bottom root margin in pixels; negative values shrink the viewport
    pub bottom_margin_px: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    pub target_attribute: String,
    pub duration_attribute: String,
    pub suffix_attribute: String,
    pub completion_class: String,
    pub default_duration_ms: f64,
    pub threshold: f64,
    pub easing: Easing,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ParallaxConfig {
    pub speed_attribute: String,
    pub default_speed: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TypingConfig {
    pub text_attribute: String,
    pub speed_attribute: String,
    pub delay_attribute: String,
    /// Milliseconds per character
    pub default_speed_ms: f64,
    pub default_delay_ms: f64,
    /// Startup offset after initialization before any typing element is touched
    pub settle_delay_ms: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PointerConfig {
    pub tilt_attribute: String,
    pub magnetic_attribute: String,
    /// Pixels of pointer offset per degree of rotation
    pub tilt_damping: f64,
    pub tilt_scale: f64,
    pub perspective_px: f64,
    /// Fraction of the pointer offset applied as translation
    pub magnet_strength: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HeroConfig {
    pub region_class: String,
    pub item_classes: Vec<String>,
    pub completion_class: String,
    pub base_delay_ms: f64,
    pub stagger_ms: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reveal: RevealConfig::default(),
            counter: CounterConfig::default(),
            parallax: ParallaxConfig::default(),
            typing: TypingConfig::default(),
            pointer: PointerConfig::default(),
            hero: HeroConfig::default(),
            reduced_motion_query: "(prefers-reduced-motion: reduce)".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            classes: [
                "fade-in",
                "fade-in-up",
                "fade-in-down",
                "fade-in-left",
                "fade-in-right",
                "zoom-in",
                "slide-up",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            completion_class: "animated".to_string(),
            threshold: 0.1,
            bottom_margin_px: -50.0,
        }
    }
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            target_attribute: "data-counter".to_string(),
            duration_attribute: "data-duration".to_string(),
            suffix_attribute: "data-suffix".to_string(),
            completion_class: "counted".to_string(),
            default_duration_ms: 2000.0,
            threshold: 0.5,
            easing: Easing::EaseOutCubic,
        }
    }
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            speed_attribute: "data-parallax".to_string(),
            default_speed: 0.5,
        }
    }
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            text_attribute: "data-typing-text".to_string(),
            speed_attribute: "data-typing-speed".to_string(),
            delay_attribute: "data-typing-delay".to_string(),
            default_speed_ms: 50.0,
            default_delay_ms: 0.0,
            settle_delay_ms: 500.0,
        }
    }
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            tilt_attribute: "data-tilt".to_string(),
            magnetic_attribute: "data-magnetic".to_string(),
            tilt_damping: 10.0,
            tilt_scale: 1.02,
            perspective_px: 1000.0,
            magnet_strength: 0.3,
        }
    }
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            region_class: "hero".to_string(),
            item_classes: [
                "hero-badge",
                "hero-title",
                "hero-subtitle",
                "hero-actions",
                "hero-visual",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            completion_class: "animated".to_string(),
            base_delay_ms: 100.0,
            stagger_ms: 150.0,
        }
    }
}

impl EngineConfig {
    /// Parse from YAML string; omitted fields keep their defaults
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: EngineConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        check_fraction("reveal.threshold", self.reveal.threshold)?;
        check_fraction("counter.threshold", self.counter.threshold)?;

        check_non_negative("counter.default_duration_ms", self.counter.default_duration_ms)?;
        check_non_negative("typing.default_speed_ms", self.typing.default_speed_ms)?;
        check_non_negative("typing.default_delay_ms", self.typing.default_delay_ms)?;
        check_non_negative("typing.settle_delay_ms", self.typing.settle_delay_ms)?;
        check_non_negative("hero.base_delay_ms", self.hero.base_delay_ms)?;
        check_non_negative("hero.stagger_ms", self.hero.stagger_ms)?;

        if self.pointer.tilt_damping <= 0.0 || !self.pointer.tilt_damping.is_finite() {
            return Err(EngineError::Config(format!(
                "pointer.tilt_damping must be positive, got {}",
                self.pointer.tilt_damping
            )));
        }

        for (field, class) in [
            ("reveal.completion_class", &self.reveal.completion_class),
            ("counter.completion_class", &self.counter.completion_class),
            ("hero.completion_class", &self.hero.completion_class),
        ] {
            if class.trim().is_empty() {
                return Err(EngineError::Config(format!("{} must not be empty", field)));
            }
        }

        Ok(())
    }

    /// CSS root margin string for the scroll-reveal observer
    pub fn reveal_root_margin(&self) -> String {
        format!("0px 0px {}px 0px", self.reveal.bottom_margin_px)
    }
}

fn check_fraction(field: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(EngineError::Config(format!(
            "{} must be between 0 and 1, got {}",
            field, value
        )))
    }
}

fn check_non_negative(field: &str, value: f64) -> Result<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(EngineError::Config(format!(
            "{} must be a non-negative number, got {}",
            field, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.reveal.threshold, 0.1);
        assert_eq!(config.counter.threshold, 0.5);
        assert_eq!(config.counter.default_duration_ms, 2000.0);
        assert_eq!(config.parallax.default_speed, 0.5);
        assert_eq!(config.typing.default_speed_ms, 50.0);
        assert_eq!(config.reveal.completion_class, "animated");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
reveal:
  classes: ["reveal"]
  threshold: 0.25
typing:
  settle_delay_ms: 0
"#;
        let config = EngineConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.reveal.classes, vec!["reveal".to_string()]);
        assert_eq!(config.reveal.threshold, 0.25);
        assert_eq!(config.reveal.completion_class, "animated");
        assert_eq!(config.typing.settle_delay_ms, 0.0);
        assert_eq!(config.counter.default_duration_ms, 2000.0);
    }

    #[test]
    fn test_easing_by_name() {
        let config = EngineConfig::from_yaml("counter:\n  easing: linear\n").unwrap();
        assert!(matches!(config.counter.easing, Easing::Linear));
    }

    #[test]
    fn test_invalid_threshold() {
        let result = EngineConfig::from_yaml("counter:\n  threshold: 1.5\n");
        assert!(matches!(result, Err(EngineError::Config(_))));
    }

    #[test]
    fn test_negative_delay_rejected() {
        let result = EngineConfig::from_yaml("hero:\n  stagger_ms: -10\n");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("hero.stagger_ms"));
    }

    #[test]
    fn test_malformed_yaml() {
        let result = EngineConfig::from_yaml("reveal: [unclosed");
        assert!(matches!(result, Err(EngineError::Yaml(_))));
    }

    #[test]
    fn test_root_margin() {
        let config = EngineConfig::default();
        assert_eq!(config.reveal_root_margin(), "0px 0px -50px 0px");
    }
}
