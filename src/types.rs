use serde::{Deserialize, Serialize};

/// Configuration stored in ~/.genesis/config.json
///
/// Every field has a serde default so a partial (or empty) file is valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub insight: InsightConfig,
    #[serde(default)]
    pub meditation: MeditationConfig,
    /// Optional JSON file replacing the built-in locale tables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale_path: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: Language::default(),
            insight: InsightConfig::default(),
            meditation: MeditationConfig::default(),
            locale_path: None,
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

// =============================================================================
// Insight provider configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightConfig {
    /// Falls back to `GEMINI_API_KEY` / `API_KEY` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// No timeout beyond the transport's own when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

impl InsightConfig {
    /// Config value first, then the environment.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .or_else(|| std::env::var("API_KEY").ok())
            .filter(|k| !k.trim().is_empty())
    }
}

fn default_model() -> String {
    "gemini-3-flash-preview".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

// =============================================================================
// Meditation timings
// =============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeditationConfig {
    #[serde(default = "default_phase_duration_ms")]
    pub phase_duration_ms: u64,
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
}

impl Default for MeditationConfig {
    fn default() -> Self {
        Self {
            phase_duration_ms: default_phase_duration_ms(),
            transition_ms: default_transition_ms(),
            frame_interval_ms: default_frame_interval_ms(),
        }
    }
}

fn default_phase_duration_ms() -> u64 {
    4500
}

fn default_transition_ms() -> u64 {
    800
}

fn default_frame_interval_ms() -> u64 {
    16
}

// =============================================================================
// Session model
// =============================================================================

/// UI language. `Pt` is the primary locale, `En` the secondary one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Pt,
    En,
}

impl Language {
    pub fn tag(self) -> &'static str {
        match self {
            Language::Pt => "pt",
            Language::En => "en",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "pt" => Some(Language::Pt),
            "en" => Some(Language::En),
            _ => None,
        }
    }
}

/// Which of the two lists an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Intentions,
    Emotions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestationState {
    pub intentions: Vec<ListItem>,
    pub emotions: Vec<ListItem>,
    pub potential_symbol: String,
}

impl ManifestationState {
    pub fn list(&self, kind: ListKind) -> &[ListItem] {
        match kind {
            ListKind::Intentions => &self.intentions,
            ListKind::Emotions => &self.emotions,
        }
    }

    pub fn list_mut(&mut self, kind: ListKind) -> &mut Vec<ListItem> {
        match kind {
            ListKind::Intentions => &mut self.intentions,
            ListKind::Emotions => &mut self.emotions,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoherenceValues {
    pub brain: f64,
    pub heart: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub title: String,
    pub description: String,
    pub alignment_score: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreathPhase {
    Inspire,
    Hold,
    Expire,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeFlags {
    pub is_meditating: bool,
    pub is_transitioning: bool,
    pub is_loading_insight: bool,
}
