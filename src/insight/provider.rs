use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::InsightError;
use crate::locale::{Strings, FALLBACK_ALIGNMENT_SCORE};
use crate::types::{Insight, Language, ManifestationState};

/// What the provider is asked about: plain list texts, the symbol and the
/// answer language.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightRequest {
    pub intentions: Vec<String>,
    pub emotions: Vec<String>,
    pub symbol: String,
    pub language: Language,
    /// Display name of `language` handed to the model.
    pub language_name: String,
}

impl InsightRequest {
    pub fn from_state(state: &ManifestationState, language: Language, strings: &Strings) -> Self {
        Self {
            intentions: state.intentions.iter().map(|i| i.text.clone()).collect(),
            emotions: state.emotions.iter().map(|e| e.text.clone()).collect(),
            symbol: state.potential_symbol.clone(),
            language,
            language_name: strings.provider_language.clone(),
        }
    }
}

/// A parsed provider answer. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightDraft {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub alignment_score: Option<f64>,
}

impl InsightDraft {
    /// Fill gaps from the locale's partial defaults and clamp the score.
    pub fn complete(self, strings: &Strings) -> Insight {
        let title = self
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| strings.partial_title.clone());
        let description = self
            .description
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| strings.partial_description.clone());
        let alignment_score = self
            .alignment_score
            .filter(|s| s.is_finite())
            .map(|s| s.round().clamp(0.0, 100.0) as u8)
            .unwrap_or(FALLBACK_ALIGNMENT_SCORE);
        Insight {
            title,
            description,
            alignment_score,
        }
    }
}

impl From<Insight> for InsightDraft {
    fn from(insight: Insight) -> Self {
        Self {
            title: Some(insight.title),
            description: Some(insight.description),
            alignment_score: Some(f64::from(insight.alignment_score)),
        }
    }
}

/// External generative service that scores how intentions and emotions align.
#[async_trait]
pub trait InsightProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch_insight(&self, request: &InsightRequest) -> Result<InsightDraft, InsightError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::LocaleTable;

    #[test]
    fn test_complete_keeps_provided_fields() {
        let table = LocaleTable::builtin();
        let draft = InsightDraft {
            title: Some("Quantum Signature".to_string()),
            description: Some("Aligned".to_string()),
            alignment_score: Some(87.0),
        };
        let insight = draft.complete(table.strings(Language::En));
        assert_eq!(insight.title, "Quantum Signature");
        assert_eq!(insight.alignment_score, 87);
    }

    #[test]
    fn test_complete_fills_missing_from_locale() {
        let table = LocaleTable::builtin();
        let insight = InsightDraft::default().complete(table.strings(Language::En));
        assert_eq!(insight.title, "Potential Under Observation");
        assert_eq!(
            insight.description,
            "The field is organizing around your attention."
        );
        assert_eq!(insight.alignment_score, 50);

        let insight = InsightDraft {
            title: Some("  ".to_string()),
            ..Default::default()
        }
        .complete(table.strings(Language::Pt));
        assert_eq!(insight.title, "Potencial em Observação");
    }

    #[test]
    fn test_complete_clamps_score() {
        let table = LocaleTable::builtin();
        let strings = table.strings(Language::En);
        let high = InsightDraft {
            alignment_score: Some(140.0),
            ..Default::default()
        };
        let low = InsightDraft {
            alignment_score: Some(-3.0),
            ..Default::default()
        };
        let zero = InsightDraft {
            alignment_score: Some(0.0),
            ..Default::default()
        };
        assert_eq!(high.complete(strings).alignment_score, 100);
        assert_eq!(low.complete(strings).alignment_score, 0);
        assert_eq!(zero.complete(strings).alignment_score, 0);
    }

    #[test]
    fn test_request_from_state() {
        let table = LocaleTable::builtin();
        let state = ManifestationState {
            intentions: table.en.initial_intentions.clone(),
            emotions: table.en.initial_emotions.clone(),
            potential_symbol: "J".to_string(),
        };
        let request = InsightRequest::from_state(&state, Language::En, table.strings(Language::En));
        assert_eq!(request.intentions.len(), 5);
        assert_eq!(request.emotions[2], "Free");
        assert_eq!(request.language_name, "English");
    }
}
