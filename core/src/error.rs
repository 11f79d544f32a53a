//! Error type shared by every builder in the crate.
//!
//! All failures happen while tables are loaded or while rules, tags and
//! patterns are being registered. Queries against a built `Lexicon` or
//! `StemmingRuleSet` never fail: an unknown lemma, key or stem simply yields
//! an empty result.

use std::path::PathBuf;

/// Failure raised while loading tables or constructing rules, tag sets and
/// lexicon entries.
#[derive(Debug, thiserror::Error)]
pub enum InflexionError {
    /// The rule string is not of the shape `A|B>C<D|E`.
    #[error("malformed sandhi rule {rule:?}: {reason}")]
    Format { rule: String, reason: &'static str },

    /// A key pattern or theme pattern failed to compile.
    #[error("invalid pattern {pattern:?}: {source}")]
    Rule {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A tag string lacks its leading `+`/`-` or has an empty name.
    #[error("malformed tag {tag:?}: expected `+name` or `-name`")]
    Tag { tag: String },

    /// A morphology table could not be read.
    #[error("cannot read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A morphology table is not a valid TOML document.
    #[error("cannot parse {}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl InflexionError {
    pub(crate) fn format<R: Into<String>>(rule: R, reason: &'static str) -> Self {
        InflexionError::Format {
            rule: rule.into(),
            reason,
        }
    }

    pub(crate) fn pattern<P: Into<String>>(pattern: P, source: regex::Error) -> Self {
        InflexionError::Rule {
            pattern: pattern.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, InflexionError>;
