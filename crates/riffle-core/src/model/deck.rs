use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Identifier of a single card: `0..n` within a deck of size `n`.
pub type CardId = u16;

/// Errors raised when a deck fails its permutation invariant.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeckError {
    #[error("deck invariant violated: expected {expected} distinct identifiers, found {distinct}")]
    InvariantViolation { expected: usize, distinct: usize },
}

/// An ordered sequence of `n` distinct card identifiers.
///
/// Starts out as the sorted sequence `0..n` and afterwards is always some
/// permutation of it. Never mutated element-wise from outside the core; the
/// trial driver replaces it wholesale with a shuffle result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Deck {
    cards: Vec<CardId>,
}

impl Deck {
    /// The sorted initial deck `[0, 1, .., n-1]`.
    pub fn sequential(n: usize) -> Self {
        Self {
            cards: (0..n).map(|id| id as CardId).collect(),
        }
    }

    /// Build a deck from raw identifiers, verifying that each id in `[0, n)`
    /// appears exactly once. A violation indicates a split/shuffle defect,
    /// not user error.
    pub fn try_new(cards: Vec<CardId>) -> Result<Self, DeckError> {
        let n = cards.len();
        let mut seen = vec![false; n];
        let mut distinct = 0usize;
        for &card in &cards {
            let idx = usize::from(card);
            if idx < n && !seen[idx] {
                seen[idx] = true;
                distinct += 1;
            }
        }

        if distinct != n {
            return Err(DeckError::InvariantViolation {
                expected: n,
                distinct,
            });
        }

        Ok(Self { cards })
    }

    pub fn cards(&self) -> &[CardId] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of distinct identifiers present (equals `len` for any deck that
    /// passed construction; exposed for the reporting consumer).
    pub fn distinct_count(&self) -> usize {
        let n = self.cards.len();
        let mut seen = vec![false; n];
        let mut distinct = 0usize;
        for &card in &self.cards {
            let idx = usize::from(card);
            if idx < n && !seen[idx] {
                seen[idx] = true;
                distinct += 1;
            }
        }
        distinct
    }

    /// Position of every card, indexed by card id.
    pub fn positions(&self) -> Vec<usize> {
        let mut positions = vec![0usize; self.cards.len()];
        for (pos, &card) in self.cards.iter().enumerate() {
            positions[usize::from(card)] = pos;
        }
        positions
    }
}

impl<'de> Deserialize<'de> for Deck {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let cards = Vec::<CardId>::deserialize(deserializer)?;
        Deck::try_new(cards).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Deck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for card in &self.cards {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{card}")?;
            first = false;
        }
        Ok(())
    }
}
