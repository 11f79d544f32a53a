//! Output records for the `inflexion` command, printable as text or JSON.
use inflexion_core::Generated;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// One generated form and how it was reached.
#[derive(Debug, Serialize, PartialEq)]
pub struct FormReport {
    pub form: String,
    pub stem: String,
    pub base: String,
    pub ending: String,
    pub rule: String,
    pub used_default: bool,
}

/// One `(lemma, key)` analysis.
#[derive(Debug, Serialize, PartialEq)]
pub struct AnalysisReport {
    pub lemma: String,
    pub key: String,
}

/// Flatten the engine's generation map, one row per provenance record.
pub fn forms(generated: &BTreeMap<String, Vec<Generated>>) -> Vec<FormReport> {
    generated
        .iter()
        .flat_map(|(form, records)| {
            records.iter().map(move |g| FormReport {
                form: form.clone(),
                stem: g.stem.clone(),
                base: g.inflection.base.clone(),
                ending: g.inflection.ending.clone(),
                rule: g.inflection.rule.to_string(),
                used_default: g.inflection.used_default,
            })
        })
        .collect()
}

pub fn analyses(parsed: &BTreeSet<(String, String)>) -> Vec<AnalysisReport> {
    parsed
        .iter()
        .map(|(lemma, key)| AnalysisReport {
            lemma: lemma.clone(),
            key: key.clone(),
        })
        .collect()
}

impl std::fmt::Display for FormReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\t{} + {}\t[{}]", self.form, self.base, self.ending, self.rule)?;
        if self.used_default {
            write!(f, " (default)")?;
        }
        Ok(())
    }
}

impl std::fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\t{}", self.lemma, self.key)
    }
}
