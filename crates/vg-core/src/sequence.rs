//! Instructional video sequence.
//!
//! A deployment watches a fixed, ordered list of items. The list never changes
//! while a study is running, so it is validated once and then only read.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Videos shown to every participant before the Gender Identification phase.
const AGENT_VIDEOS: [&str; 3] = [
    "/videos/Male_Agent.mp4",
    "/videos/Female_Agent.mp4",
    "/videos/Androgynous_Agent.mp4",
];

/// Resource locator of a single item in the sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemLocator(String);

impl ItemLocator {
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    #[error("sequence must contain at least one item")]
    Empty,

    #[error("sequence item {index} has a blank locator")]
    BlankItem { index: usize },
}

/// Ordered, non-empty list of items a participant must watch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    items: Vec<ItemLocator>,
}

impl Sequence {
    /// Build a sequence from item locators.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::Empty`] for an empty list and
    /// [`SequenceError::BlankItem`] when a locator is blank.
    pub fn new<I, S>(items: I) -> Result<Self, SequenceError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items: Vec<ItemLocator> = items.into_iter().map(ItemLocator::new).collect();

        if items.is_empty() {
            return Err(SequenceError::Empty);
        }
        if let Some(index) = items.iter().position(|item| item.as_str().trim().is_empty()) {
            return Err(SequenceError::BlankItem { index });
        }

        Ok(Self { items })
    }

    /// The three agent videos of the study deployment.
    pub fn agent_videos() -> Self {
        Self {
            items: AGENT_VIDEOS.iter().copied().map(ItemLocator::new).collect(),
        }
    }

    /// Number of items (`N`). Always at least one.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn item(&self, position: usize) -> Option<&ItemLocator> {
        self.items.get(position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemLocator> {
        self.items.iter()
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::agent_videos()
    }
}
