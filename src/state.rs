use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::locale::LocaleTable;
use crate::symbol::DEFAULT_SYMBOL;
use crate::transition::TransitionSequencer;
use crate::types::{CoherenceValues, Config, Insight, Language, ManifestationState};

/// Session state owned by the controller. Nothing here outlives the process.
#[derive(Debug)]
pub struct AppState {
    pub manifestation: ManifestationState,
    pub coherence: CoherenceValues,
    /// Last completed insight; replaced by each new one.
    pub insight: Option<Insight>,
    pub language: Language,
    pub transition: TransitionSequencer,
}

impl AppState {
    /// Fresh session seeded with the locale's starter lists.
    pub fn seeded(language: Language, locale: &LocaleTable) -> Self {
        let strings = locale.strings(language);
        let manifestation = ManifestationState {
            intentions: strings.initial_intentions.clone(),
            emotions: strings.initial_emotions.clone(),
            potential_symbol: DEFAULT_SYMBOL.to_string(),
        };
        let coherence = CoherenceValues::from_state(&manifestation);
        Self {
            manifestation,
            coherence,
            insight: None,
            language,
            transition: TransitionSequencer::default(),
        }
    }

    /// Rederive both scores from the lists. Discards any earlier blend.
    pub fn recompute_coherence(&mut self) {
        self.coherence = CoherenceValues::from_state(&self.manifestation);
    }
}

/// Get the canonical config file path (~/.genesis/config.json)
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home.join(".genesis").join("config.json"))
}

/// Load ~/.genesis/config.json. A missing file means defaults.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        log::info!("No config at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Locale tables named by the config, or the built-in ones.
pub fn load_locale(config: &Config) -> LocaleTable {
    let Some(path) = config.locale_path.as_deref() else {
        return LocaleTable::builtin();
    };
    match LocaleTable::load(Path::new(path)) {
        Ok(table) => {
            log::info!("Loaded locale tables from {}", path);
            table
        }
        Err(e) => {
            log::warn!("{}. Falling back to built-in locale tables.", e);
            LocaleTable::builtin()
        }
    }
}
