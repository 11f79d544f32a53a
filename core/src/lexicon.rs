//! Lexicon: lemmas, the stems they take, and the keys those stems serve.
//!
//! Each lemma owns an ordered list of entries `(key pattern, stem, tags)`.
//! A key pattern is a regular expression matched against the start of a
//! grammatical key, so the pattern `"bar"` serves both `"bar"` and
//! `"barista"`. A reverse index maps every stem back to the lemmas and key
//! patterns that produce it, which is what parsing walks.
//!
//! Public API:
//! - `LexiconBuilder` - `add` / `add_tagged`, then `build`
//! - `Lexicon` - `find_stems`, `lemmas_for_stem`, `entries_for`
//! - `LexiconEntry`, `StemSource` - the forward and reverse records
//!
//! Notes:
//! - Entry order matters. `find_stems` only returns the last contiguous run
//!   of matching entries that share a key pattern. Entries sharing a key
//!   pattern for one lemma should therefore be added next to each other.
use ahash::AHashMap;
use regex::Regex;
use std::collections::BTreeSet;
use tracing::{debug, trace};

use crate::error::{InflexionError, Result};
use crate::tags::{TagFilter, TagSet};
use crate::utils;

/// One `(key pattern, stem, tags)` entry of a lemma.
#[derive(Debug, Clone)]
pub struct LexiconEntry {
    key_pattern: String,
    matcher: Regex,
    stem: String,
    tags: TagSet,
}

impl LexiconEntry {
    pub fn key_pattern(&self) -> &str {
        &self.key_pattern
    }

    pub fn stem(&self) -> &str {
        &self.stem
    }

    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    /// Whether the key pattern matches a prefix of `key`.
    pub fn matches_key(&self, key: &str) -> bool {
        self.matcher.is_match(key)
    }

    pub fn admits(&self, filter: &TagFilter) -> bool {
        self.tags.admits(filter)
    }
}

/// Where a stem comes from: a `(lemma, key pattern, tags)` triple.
#[derive(Debug, Clone)]
pub struct StemSource {
    lemma: String,
    key_pattern: String,
    matcher: Regex,
    tags: TagSet,
}

impl StemSource {
    pub fn lemma(&self) -> &str {
        &self.lemma
    }

    pub fn key_pattern(&self) -> &str {
        &self.key_pattern
    }

    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    /// Whether the key pattern matches a prefix of `key`.
    pub fn matches_key(&self, key: &str) -> bool {
        self.matcher.is_match(key)
    }

    pub fn admits(&self, filter: &TagFilter) -> bool {
        self.tags.admits(filter)
    }

    fn same_as(&self, lemma: &str, key_pattern: &str, tags: &TagSet) -> bool {
        self.lemma == lemma && self.key_pattern == key_pattern && &self.tags == tags
    }
}

impl PartialEq for StemSource {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(&other.lemma, &other.key_pattern, &other.tags)
    }
}

impl Eq for StemSource {}

/// Mutable phase of a [`Lexicon`].
///
/// Lemmas, key patterns and stems are NFC-normalized and trimmed unless
/// [`normalize_input`](Self::normalize_input) turns that off.
#[derive(Debug, Clone)]
pub struct LexiconBuilder {
    stems_by_lemma: AHashMap<String, Vec<LexiconEntry>>,
    lemma_order: Vec<String>,
    lemmas_by_stem: AHashMap<String, Vec<StemSource>>,
    // Compiled key patterns, shared between entries.
    patterns: AHashMap<String, Regex>,
    entry_count: usize,
    normalize: bool,
}

impl Default for LexiconBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconBuilder {
    pub fn new() -> Self {
        Self {
            stems_by_lemma: AHashMap::new(),
            lemma_order: Vec::new(),
            lemmas_by_stem: AHashMap::new(),
            patterns: AHashMap::new(),
            entry_count: 0,
            normalize: true,
        }
    }

    pub fn normalize_input(&mut self, on: bool) -> &mut Self {
        self.normalize = on;
        self
    }

    /// Add an untagged entry: `lemma` takes `stem` for keys starting with
    /// something `key_pattern` matches.
    pub fn add(&mut self, lemma: &str, key_pattern: &str, stem: &str) -> Result<()> {
        self.insert(lemma, key_pattern, stem, TagSet::new())
    }

    /// Add an entry carrying `+name` / `-name` tags.
    pub fn add_tagged<I, S>(&mut self, lemma: &str, key_pattern: &str, stem: &str, tags: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tags = TagSet::parse(tags)?;
        self.insert(lemma, key_pattern, stem, tags)
    }

    fn insert(&mut self, lemma: &str, key_pattern: &str, stem: &str, tags: TagSet) -> Result<()> {
        let (lemma, key_pattern, stem) = (
            utils::prepare(lemma, self.normalize),
            utils::prepare(key_pattern, self.normalize),
            utils::prepare(stem, self.normalize),
        );
        let (lemma, key_pattern, stem) = (lemma.as_str(), key_pattern.as_str(), stem.as_str());
        let matcher = self.compile(key_pattern)?;
        let entry = LexiconEntry {
            key_pattern: key_pattern.to_string(),
            matcher: matcher.clone(),
            stem: stem.to_string(),
            tags: tags.clone(),
        };

        match self.stems_by_lemma.get_mut(lemma) {
            Some(entries) => entries.push(entry),
            None => {
                self.lemma_order.push(lemma.to_string());
                self.stems_by_lemma.insert(lemma.to_string(), vec![entry]);
            }
        }
        self.entry_count += 1;

        let sources = self.lemmas_by_stem.entry(stem.to_string()).or_default();
        if !sources.iter().any(|s| s.same_as(lemma, key_pattern, &tags)) {
            sources.push(StemSource {
                lemma: lemma.to_string(),
                key_pattern: key_pattern.to_string(),
                matcher,
                tags,
            });
        }

        trace!(lemma, key_pattern, stem, "added lexicon entry");
        Ok(())
    }

    fn compile(&mut self, key_pattern: &str) -> Result<Regex> {
        if let Some(re) = self.patterns.get(key_pattern) {
            return Ok(re.clone());
        }
        // Reject patterns that only compile thanks to the wrapping group.
        Regex::new(key_pattern).map_err(|e| InflexionError::pattern(key_pattern, e))?;
        let re = Regex::new(&format!("^(?:{})", key_pattern))
            .map_err(|e| InflexionError::pattern(key_pattern, e))?;
        self.patterns.insert(key_pattern.to_string(), re.clone());
        Ok(re)
    }

    /// Freeze the lexicon.
    pub fn build(self) -> Lexicon {
        debug!(
            lemmas = self.lemma_order.len(),
            entries = self.entry_count,
            stems = self.lemmas_by_stem.len(),
            "built lexicon"
        );
        Lexicon {
            stems_by_lemma: self.stems_by_lemma,
            lemma_order: self.lemma_order,
            lemmas_by_stem: self.lemmas_by_stem,
            entry_count: self.entry_count,
        }
    }
}

/// Immutable lemma ⇄ stem dictionary.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    stems_by_lemma: AHashMap<String, Vec<LexiconEntry>>,
    lemma_order: Vec<String>,
    lemmas_by_stem: AHashMap<String, Vec<StemSource>>,
    entry_count: usize,
}

impl Lexicon {
    /// Start assembling a lexicon.
    ///
    /// # Example
    /// ```
    /// use inflexion_core::Lexicon;
    ///
    /// let mut builder = Lexicon::builder();
    /// builder.add("FOO", "bar", "foo").unwrap();
    /// let lexicon = builder.build();
    ///
    /// assert!(lexicon.find_stems("FOO", "barista").contains("foo"));
    /// assert!(lexicon.find_stems("FOO", "xbar").is_empty());
    /// ```
    pub fn builder() -> LexiconBuilder {
        LexiconBuilder::new()
    }

    /// Entries of `lemma` in insertion order; empty for unknown lemmas.
    pub fn entries_for(&self, lemma: &str) -> &[LexiconEntry] {
        self.stems_by_lemma
            .get(lemma)
            .map(|v| v.as_slice())
            .unwrap_or_default()
    }

    /// Lemmas in the order they were first added.
    pub fn lemmas(&self) -> impl Iterator<Item = &str> {
        self.lemma_order.iter().map(|l| l.as_str())
    }

    /// Stems of `lemma` for `key`, with no tag filter.
    pub fn find_stems(&self, lemma: &str, key: &str) -> BTreeSet<String> {
        self.find_stems_tagged(lemma, key, &TagFilter::empty())
    }

    /// Stems of `lemma` for `key`.
    ///
    /// Entries are scanned in order, skipping those the filter excludes and
    /// those whose key pattern does not match. Whenever a matching entry's
    /// pattern differs from the previous match's pattern the collected stems
    /// are dropped and collection restarts, so only the last contiguous run of
    /// same-pattern matches is returned.
    pub fn find_stems_tagged(&self, lemma: &str, key: &str, filter: &TagFilter) -> BTreeSet<String> {
        let mut stems = BTreeSet::new();
        let mut current: Option<&str> = None;

        for entry in self.entries_for(lemma) {
            if !entry.admits(filter) || !entry.matches_key(key) {
                continue;
            }
            if current != Some(entry.key_pattern()) {
                if !stems.is_empty() {
                    debug!(
                        lemma,
                        key,
                        previous = current.unwrap_or_default(),
                        next = entry.key_pattern(),
                        dropped = ?stems,
                        "key pattern changed, discarding earlier stems"
                    );
                    stems.clear();
                }
                current = Some(entry.key_pattern());
            }
            stems.insert(entry.stem().to_string());
        }

        trace!(lemma, key, found = stems.len(), "find_stems");
        stems
    }

    /// Everything that produces `stem`; empty for unknown stems.
    pub fn lemmas_for_stem(&self, stem: &str) -> &[StemSource] {
        self.lemmas_by_stem
            .get(stem)
            .map(|v| v.as_slice())
            .unwrap_or_default()
    }

    /// Number of lemmas.
    pub fn len(&self) -> usize {
        self.lemma_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lemma_order.is_empty()
    }

    /// Number of `(lemma, key pattern, stem)` entries.
    pub fn entry_count(&self) -> usize {
        self.entry_count
    }
}
