//! inflexion-core
//!
//! Bidirectional morphology over sandhi rules and a lexicon: generate surface
//! forms from a lemma and a grammatical key, and parse surface forms back
//! into (lemma, key) analyses.
//!
//! Public API:
//! - `SandhiRule` - One `A|B>C<D|E` splicing rule
//! - `StemmingRuleSet` - Ordered rules per key, with a reverse surface index
//! - `Lexicon` - Lemma → stem entries keyed by key patterns, with a reverse index
//! - `Inflexion` - Engine composing lexicons and rule sets
//! - `MorphologyTable` - TOML description of a whole engine
//! - `Config` - Engine settings
//!
//! Lexicons and rule sets are assembled through builders and frozen with
//! `build()`; everything built is immutable and `Send + Sync`.
use serde::{Deserialize, Serialize};

pub mod error;
pub use error::InflexionError;

pub mod tags;
pub use tags::{Tag, TagFilter, TagSet};

pub mod sandhi;
pub use sandhi::SandhiRule;

pub mod stemming;
pub use stemming::{Inflection, StemCandidate, StemmingRuleSet, StemmingRuleSetBuilder};

pub mod lexicon;
pub use lexicon::{Lexicon, LexiconBuilder, LexiconEntry, StemSource};

pub mod engine;
pub use engine::{Generated, Inflexion};

pub mod table;
pub use table::{LexiconTable, MorphologyTable, RuleSetTable};

/// Engine settings.
///
/// Every field has a default, so a TOML document only needs the settings it
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// NFC-normalize and trim lemmas, keys and forms before querying.
    /// Default: true
    pub normalize_input: bool,

    /// Feature names used as the tag filter by `Inflexion::generate`.
    /// Default: empty
    pub default_tags: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            normalize_input: true,
            default_tags: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(
        path: P,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Utility helpers.
pub mod utils {
    /// Normalize input strings (NFC) and trim whitespace.
    pub fn normalize(s: &str) -> String {
        use unicode_normalization::UnicodeNormalization;
        s.nfc().collect::<String>().trim().to_string()
    }

    /// `normalize(s)` when `on`, otherwise `s` unchanged.
    pub fn prepare(s: &str, on: bool) -> String {
        if on {
            normalize(s)
        } else {
            s.to_string()
        }
    }
}
