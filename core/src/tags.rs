//! Feature tags for rules and lexicon entries.
//!
//! A tag is written `+name` (the caller's filter must contain `name`) or
//! `-name` (the caller's filter must not contain `name`). Rules and entries
//! carry a [`TagSet`]; queries receive a [`TagFilter`] of plain feature names.
//! Passing no filter is the same as passing an empty one.
use ahash::AHashSet;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{InflexionError, Result};

/// A single `+name` / `-name` constraint.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tag {
    /// `+name`: admitted only when `name` is in the filter.
    Required(String),
    /// `-name`: admitted only when `name` is absent from the filter.
    Excluded(String),
}

impl Tag {
    /// Parse a tag string such as `"+a"` or `"-plural"`.
    pub fn parse(tag: &str) -> Result<Self> {
        let malformed = || InflexionError::Tag {
            tag: tag.to_string(),
        };
        let mut chars = tag.chars();
        let sign = chars.next().ok_or_else(malformed)?;
        let name = chars.as_str();
        if name.is_empty() {
            return Err(malformed());
        }
        match sign {
            '+' => Ok(Tag::Required(name.to_string())),
            '-' => Ok(Tag::Excluded(name.to_string())),
            _ => Err(malformed()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Tag::Required(name) | Tag::Excluded(name) => name,
        }
    }

    /// Whether this tag lets an item through the given filter.
    pub fn admits(&self, filter: &TagFilter) -> bool {
        match self {
            Tag::Required(name) => filter.contains(name),
            Tag::Excluded(name) => !filter.contains(name),
        }
    }
}

impl FromStr for Tag {
    type Err = InflexionError;

    fn from_str(s: &str) -> Result<Self> {
        Tag::parse(s)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Required(name) => write!(f, "+{}", name),
            Tag::Excluded(name) => write!(f, "-{}", name),
        }
    }
}

/// Canonical (sorted, de-duplicated) set of tags.
///
/// Ordering makes two sets built from the same tags in a different order
/// compare and hash equal, which the lexicon's reverse index relies on.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TagSet {
    tags: BTreeSet<Tag>,
}

impl TagSet {
    /// The empty set; admits every filter.
    pub fn new() -> Self {
        Self {
            tags: BTreeSet::new(),
        }
    }

    /// Build a set from tag strings, failing on the first malformed one.
    pub fn parse<I, S>(tags: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tags = tags
            .into_iter()
            .map(|t| Tag::parse(t.as_ref()))
            .collect::<Result<BTreeSet<_>>>()?;
        Ok(Self { tags })
    }

    /// An item is excluded as soon as one of its tags rejects the filter.
    pub fn admits(&self, filter: &TagFilter) -> bool {
        self.tags.iter().all(|t| t.admits(filter))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl FromIterator<Tag> for TagSet {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        Self {
            tags: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .tags
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        f.write_str(&joined)
    }
}

/// Feature names supplied by the caller of a query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilter {
    names: AHashSet<String>,
}

impl TagFilter {
    /// The empty filter: `+x` tags exclude, `-x` tags admit.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn insert<S: Into<String>>(&mut self, name: S) -> bool {
        self.names.insert(name.into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}

impl<S: Into<String>> FromIterator<S> for TagFilter {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}
