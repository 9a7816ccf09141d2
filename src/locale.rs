//! Locale string tables keyed by language.
//!
//! The core never branches on language except to pick an entry here (or the
//! provider language name). Tables are built in and can be replaced wholesale
//! by a JSON file named in `Config::locale_path`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{BreathPhase, Insight, Language, ListItem};

/// Score carried by every locally synthesized insight.
pub const FALLBACK_ALIGNMENT_SCORE: u8 = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Strings {
    /// Language name given to the provider ("answer in ...").
    pub provider_language: String,
    pub inspire: String,
    pub hold: String,
    pub expire: String,
    pub inspire_quote: String,
    pub hold_quote: String,
    pub expire_quote: String,
    /// Used when the provider call fails outright.
    pub fallback_title: String,
    pub fallback_description: String,
    /// Used to fill fields a parsed provider response left out.
    pub partial_title: String,
    pub partial_description: String,
    #[serde(default)]
    pub initial_intentions: Vec<ListItem>,
    #[serde(default)]
    pub initial_emotions: Vec<ListItem>,
}

/// Presentation data for one breath phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseCue {
    pub phase: BreathPhase,
    pub label: String,
    pub quote: String,
    pub accent: &'static str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocaleTable {
    pub pt: Strings,
    pub en: Strings,
}

impl Default for LocaleTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LocaleTable {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn strings(&self, lang: Language) -> &Strings {
        match lang {
            Language::Pt => &self.pt,
            Language::En => &self.en,
        }
    }

    pub fn fallback_insight(&self, lang: Language) -> Insight {
        let s = self.strings(lang);
        Insight {
            title: s.fallback_title.clone(),
            description: s.fallback_description.clone(),
            alignment_score: FALLBACK_ALIGNMENT_SCORE,
        }
    }

    pub fn phase_cue(&self, lang: Language, phase: BreathPhase) -> PhaseCue {
        let s = self.strings(lang);
        let (label, quote) = match phase {
            BreathPhase::Inspire => (&s.inspire, &s.inspire_quote),
            BreathPhase::Hold => (&s.hold, &s.hold_quote),
            BreathPhase::Expire => (&s.expire, &s.expire_quote),
        };
        PhaseCue {
            phase,
            label: label.clone(),
            quote: quote.clone(),
            accent: phase.accent(),
        }
    }

    pub fn builtin() -> Self {
        Self {
            pt: Strings {
                provider_language: "Portuguese (European)".to_string(),
                inspire: "INSPIRE".to_string(),
                hold: "SUSTENHA".to_string(),
                expire: "EXPIRE".to_string(),
                inspire_quote: "\"Sintonize a sua assinatura eletromagnética com o campo quântico. Sinta a energia subir.\"".to_string(),
                hold_quote: "\"Torne-se pura consciência. No presente generoso, o tempo e o espaço colapsam.\"".to_string(),
                expire_quote: "\"Renda-se à inteligência superior. Deixe que o Campo Unificado organize o seu novo potencial.\"".to_string(),
                fallback_title: "Coerência Inicial".to_string(),
                fallback_description: "A sua intenção e emoção estão a começar a ressoar com o campo quântico.".to_string(),
                partial_title: "Potencial em Observação".to_string(),
                partial_description: "O campo está a organizar-se em torno da sua atenção.".to_string(),
                initial_intentions: seed(&[
                    ("1", "Trabalhar a partir de qualquer sítio no mundo"),
                    ("2", "Ganhar o mesmo dinheiro ou mais"),
                    ("3", "Contratos por seis meses a um ano"),
                    ("4", "Amar o que faço"),
                    ("5", "Ser patrão de mim próprio e liderar a minha equipa"),
                ]),
                initial_emotions: seed(&[
                    ("e1", "Fortalecido"),
                    ("e2", "Apaixonado pela vida"),
                    ("e3", "Livre"),
                    ("e4", "Grato"),
                ]),
            },
            en: Strings {
                provider_language: "English".to_string(),
                inspire: "INHALE".to_string(),
                hold: "HOLD".to_string(),
                expire: "EXHALE".to_string(),
                inspire_quote: "\"Tune your electromagnetic signature with the quantum field. Feel the energy rising.\"".to_string(),
                hold_quote: "\"Become pure consciousness. In the generous present, time and space collapse.\"".to_string(),
                expire_quote: "\"Surrender to a higher intelligence. Let the Unified Field organize your new potential.\"".to_string(),
                fallback_title: "Initial Coherence".to_string(),
                fallback_description: "Your intention and emotion are beginning to resonate with the quantum field.".to_string(),
                partial_title: "Potential Under Observation".to_string(),
                partial_description: "The field is organizing around your attention.".to_string(),
                initial_intentions: seed(&[
                    ("1", "Work from anywhere in the world"),
                    ("2", "Earn the same money or more"),
                    ("3", "Six-month to one-year contracts"),
                    ("4", "Love what I do"),
                    ("5", "Be my own boss and lead my team"),
                ]),
                initial_emotions: seed(&[
                    ("e1", "Empowered"),
                    ("e2", "In love with life"),
                    ("e3", "Free"),
                    ("e4", "Grateful"),
                    ("e5", "Grateful"),
                ]),
            },
        }
    }
}

fn seed(items: &[(&str, &str)]) -> Vec<ListItem> {
    items
        .iter()
        .map(|(id, text)| ListItem {
            id: (*id).to_string(),
            text: (*text).to_string(),
        })
        .collect()
}
