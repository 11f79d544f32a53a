//! Morphology tables: a TOML description of a whole engine.
//!
//! ```toml
//! [config]
//! default_tags = []
//!
//! [[lexicon]]
//! name = "verbs"
//! entries = [
//!   { lemma = "FOO", key = "bar", stem = "foo" },
//!   { lemma = "FOO", key = "bar", stem = "faa", tags = ["+a"] },
//! ]
//!
//! [[rules]]
//! name = "endings"
//! entries = [
//!   { key = "barista", rule = "|o><|llow" },
//! ]
//! ```
//!
//! Entries are applied in document order, which matters both for rules of
//! one key and for lexicon entries of one lemma.
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::error::{InflexionError, Result};
use crate::{Config, Inflexion, Lexicon, StemmingRuleSet};

/// A complete engine description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MorphologyTable {
    pub config: Config,
    #[serde(rename = "lexicon")]
    pub lexicons: Vec<LexiconTable>,
    #[serde(rename = "rules")]
    pub rule_sets: Vec<RuleSetTable>,
}

/// One lexicon.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct LexiconTable {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub entries: Vec<LexiconRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LexiconRow {
    pub lemma: String,
    /// Key pattern, matched against the start of a key.
    pub key: String,
    pub stem: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// One stemming rule set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RuleSetTable {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub entries: Vec<RuleRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RuleRow {
    pub key: String,
    pub rule: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl MorphologyTable {
    /// Load a table from a TOML file.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| InflexionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| InflexionError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load a table from a TOML string.
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Build every lexicon and rule set and assemble the engine.
    ///
    /// The first malformed rule, tag or pattern aborts the build.
    pub fn build(&self) -> Result<Inflexion> {
        let normalize = self.config.normalize_input;
        let mut engine = Inflexion::with_config(self.config.clone());

        for table in &self.lexicons {
            let mut builder = Lexicon::builder();
            builder.normalize_input(normalize);
            for row in &table.entries {
                builder.add_tagged(&row.lemma, &row.key, &row.stem, &row.tags)?;
            }
            let lexicon = builder.build();
            debug!(name = %table.name, lemmas = lexicon.len(), "loaded lexicon table");
            engine.add_lexicon(lexicon);
        }

        for table in &self.rule_sets {
            let mut builder = StemmingRuleSet::builder();
            builder.normalize_input(normalize);
            for row in &table.entries {
                builder.add_tagged(&row.key, &row.rule, &row.tags)?;
            }
            let rules = builder.build();
            debug!(name = %table.name, rules = rules.len(), "loaded rule table");
            engine.add_stemming_rule_set(rules);
        }

        Ok(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"
[[lexicon]]
name = "verbs"
entries = [
  { lemma = "FOO", key = "bar", stem = "foo" },
]

[[rules]]
name = "endings"
entries = [
  { key = "barista", rule = "|o><|llow" },
  { key = "barman", rule = "|>s<|", tags = ["+pl"] },
]
"#;

    #[test]
    fn parses_document() {
        let table = MorphologyTable::from_toml_str(DOC).unwrap();
        assert_eq!(table.config, Config::default());
        assert_eq!(table.lexicons.len(), 1);
        assert_eq!(table.lexicons[0].name, "verbs");
        assert_eq!(table.rule_sets[0].entries.len(), 2);
        assert_eq!(table.rule_sets[0].entries[1].tags, vec!["+pl"]);
    }

    #[test]
    fn builds_engine() {
        let engine = MorphologyTable::from_toml_str(DOC).unwrap().build().unwrap();
        assert_eq!(engine.lexicons().len(), 1);
        assert_eq!(engine.stemming_rule_sets()[0].len(), 2);
        assert_eq!(engine.forms("FOO", "barista"), ["follow".to_string()].into());
        assert!(engine.forms("FOO", "barman").is_empty());
    }

    #[test]
    fn empty_document_is_an_empty_engine() {
        let engine = MorphologyTable::from_toml_str("").unwrap().build().unwrap();
        assert!(engine.lexicons().is_empty());
        assert!(engine.parse("anything").is_empty());
    }

    #[test]
    fn malformed_rule_aborts_build() {
        let doc = r#"
[[rules]]
entries = [ { key = "k", rule = "A|B" } ]
"#;
        let err = MorphologyTable::from_toml_str(doc).unwrap().build().unwrap_err();
        assert!(matches!(err, InflexionError::Format { .. }));
    }

    #[test]
    fn table_strings_follow_normalize_input() {
        let doc = r#"
[config]
normalize_input = false

[[lexicon]]
entries = [ { lemma = "FOO", key = "k", stem = " foo" } ]

[[rules]]
entries = [ { key = "k", rule = "|>s<|" } ]
"#;
        let engine = MorphologyTable::from_toml_str(doc).unwrap().build().unwrap();
        assert_eq!(engine.forms("FOO", "k"), [" foos".to_string()].into());

        let normalized = doc.replace("normalize_input = false", "normalize_input = true");
        let engine = MorphologyTable::from_toml_str(&normalized).unwrap().build().unwrap();
        assert_eq!(engine.forms("FOO", "k"), ["foos".to_string()].into());
    }

    #[test]
    fn load_errors_name_the_file() {
        let missing = std::env::temp_dir().join("inflexion_no_such_table.toml");
        let err = MorphologyTable::load_toml(&missing).unwrap_err();
        assert!(matches!(err, InflexionError::Io { ref path, .. } if path == &missing));
        assert!(std::error::Error::source(&err).is_some());

        let bad = std::env::temp_dir().join(format!(
            "inflexion_bad_table_{}.toml",
            std::process::id()
        ));
        std::fs::write(&bad, "[[lexicon]]\nentries = 3\n").unwrap();
        let err = MorphologyTable::load_toml(&bad).unwrap_err();
        assert!(matches!(err, InflexionError::Toml { .. }));
        let _ = std::fs::remove_file(bad);
    }

    #[test]
    fn missing_required_field_is_a_toml_error() {
        let doc = r#"
[[lexicon]]
entries = [ { lemma = "FOO", stem = "foo" } ]
"#;
        assert!(MorphologyTable::from_toml_str(doc).is_err());
    }
}
