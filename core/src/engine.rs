// core/src/engine.rs
//
// Inflexion engine: composes lexicons and stemming rule sets in both
// directions.

use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, trace};

use crate::lexicon::Lexicon;
use crate::stemming::{Inflection, StemmingRuleSet};
use crate::tags::{TagFilter, TagSet};
use crate::{utils, Config};

/// One way a surface form was generated: the lexicon stem it started from
/// and the stemming record that turned it into the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub stem: String,
    pub inflection: Inflection,
}

/// Generation and parsing over any number of lexicons and rule sets.
///
/// Results are the union over every lexicon and every rule set; none takes
/// precedence over another. The engine only reads from what it holds, so a
/// built engine can be shared between threads.
#[derive(Debug, Clone, Default)]
pub struct Inflexion {
    lexicons: Vec<Lexicon>,
    stemming_rule_sets: Vec<StemmingRuleSet>,
    config: Config,
}

impl Inflexion {
    /// Create an empty engine with the default config.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            lexicons: Vec::new(),
            stemming_rule_sets: Vec::new(),
            config,
        }
    }

    pub fn add_lexicon(&mut self, lexicon: Lexicon) {
        self.lexicons.push(lexicon);
    }

    pub fn add_stemming_rule_set(&mut self, rule_set: StemmingRuleSet) {
        self.stemming_rule_sets.push(rule_set);
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn lexicons(&self) -> &[Lexicon] {
        &self.lexicons
    }

    pub fn stemming_rule_sets(&self) -> &[StemmingRuleSet] {
        &self.stemming_rule_sets
    }

    /// Generate every form of `lemma` for `key`, filtering with the
    /// configured default tags.
    pub fn generate(&self, lemma: &str, key: &str) -> BTreeMap<String, Vec<Generated>> {
        let filter: TagFilter = self.config.default_tags.iter().cloned().collect();
        self.generate_tagged(lemma, key, &filter)
    }

    /// Generate every form of `lemma` for `key`.
    ///
    /// This implements the full generation pipeline:
    /// 1. Collect the stems every lexicon gives `lemma` for `key`
    /// 2. Inflect each stem with every rule set
    /// 3. Group the resulting records by surface form
    ///
    /// The filter applies to both lexicon entries and rules.
    pub fn generate_tagged(
        &self,
        lemma: &str,
        key: &str,
        filter: &TagFilter,
    ) -> BTreeMap<String, Vec<Generated>> {
        let lemma = self.prepare(lemma);
        let key = self.prepare(key);

        let stems: BTreeSet<String> = self
            .lexicons
            .iter()
            .flat_map(|lx| lx.find_stems_tagged(&lemma, &key, filter))
            .collect();

        let mut forms: BTreeMap<String, Vec<Generated>> = BTreeMap::new();
        for stem in &stems {
            for rules in &self.stemming_rule_sets {
                for inflection in rules.inflect_tagged(stem, &key, filter) {
                    forms.entry(inflection.form()).or_default().push(Generated {
                        stem: stem.clone(),
                        inflection,
                    });
                }
            }
        }

        debug!(
            lemma = %lemma,
            key = %key,
            stems = stems.len(),
            forms = forms.len(),
            "generate"
        );
        forms
    }

    /// Just the surface forms of `lemma` for `key`.
    pub fn forms(&self, lemma: &str, key: &str) -> BTreeSet<String> {
        self.generate(lemma, key).into_keys().collect()
    }

    /// Every `(lemma, key)` analysis of `form`. Tags are not consulted.
    pub fn parse(&self, form: &str) -> BTreeSet<(String, String)> {
        self.analyse(form, None)
    }

    /// Like [`parse`](Self::parse), skipping rules and lexicon entries the
    /// filter excludes.
    pub fn parse_tagged(&self, form: &str, filter: &TagFilter) -> BTreeSet<(String, String)> {
        self.analyse(form, Some(filter))
    }

    fn analyse(&self, form: &str, filter: Option<&TagFilter>) -> BTreeSet<(String, String)> {
        let form = self.prepare(form);
        let admits = |tags: &TagSet| filter.map_or(true, |f| tags.admits(f));

        let mut analyses = BTreeSet::new();
        for rules in &self.stemming_rule_sets {
            for candidate in rules.candidates(&form) {
                if !admits(candidate.rule.tags()) {
                    continue;
                }
                for lexicon in &self.lexicons {
                    for source in lexicon.lemmas_for_stem(&candidate.stem) {
                        if !source.matches_key(&candidate.key) || !admits(source.tags()) {
                            continue;
                        }
                        trace!(
                            form = %form,
                            lemma = source.lemma(),
                            key = %candidate.key,
                            stem = %candidate.stem,
                            "analysis"
                        );
                        analyses.insert((source.lemma().to_string(), candidate.key.clone()));
                    }
                }
            }
        }

        debug!(form = %form, analyses = analyses.len(), "parse");
        analyses
    }

    /// `input` as the engine sees it: NFC-normalized and trimmed when
    /// `normalize_input` is set.
    pub fn prepare(&self, input: &str) -> String {
        utils::prepare(input, self.config.normalize_input)
    }
}
