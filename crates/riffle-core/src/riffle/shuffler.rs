use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::deck::{Deck, DeckError};
use crate::riffle::interleave;
use crate::riffle::offset::SplitOffsets;
use crate::riffle::split::{self, SplitHalves};

/// How the split-offset distribution is parameterized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitSpread {
    /// Reference behavior: the deck size drives the offset spread and the
    /// `split_accuracy` knob is held but left disconnected.
    #[default]
    DeckSize,
    /// Corrected behavior: `split_accuracy` drives the offset spread.
    SplitAccuracy,
}

/// Mixing parameters held for the lifetime of a [`Shuffler`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShufflerParams {
    /// Probability of switching the source side after each dropped card.
    pub shuffle_accuracy: f64,
    /// Intended control over how tightly cuts cluster around the midpoint.
    pub split_accuracy: f64,
    pub deck_size: usize,
    pub spread: SplitSpread,
}

impl Default for ShufflerParams {
    fn default() -> Self {
        Self {
            shuffle_accuracy: 0.5,
            split_accuracy: 0.95,
            deck_size: 52,
            spread: SplitSpread::DeckSize,
        }
    }
}

impl ShufflerParams {
    fn offsets(&self) -> SplitOffsets {
        match self.spread {
            SplitSpread::DeckSize => SplitOffsets::deck_size(self.deck_size),
            SplitSpread::SplitAccuracy => {
                SplitOffsets::split_accuracy(self.split_accuracy, self.deck_size)
            }
        }
    }
}

/// Simulates repeated imperfect riffle shuffles of a single deck.
///
/// All randomness comes from a caller-supplied generator, so seeded runs are
/// reproducible and independent instances never interfere. Not intended for
/// concurrent use; give each thread its own instance.
pub struct Shuffler {
    params: ShufflerParams,
    offsets: SplitOffsets,
    deck: Deck,
}

impl Shuffler {
    pub fn new(params: ShufflerParams) -> Self {
        Self {
            offsets: params.offsets(),
            deck: Deck::sequential(params.deck_size),
            params,
        }
    }

    pub fn params(&self) -> &ShufflerParams {
        &self.params
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Replace the deck state wholesale, normally with a shuffle result.
    pub fn adopt(&mut self, deck: Deck) {
        self.deck = deck;
    }

    /// Cut a deck into two halves using this instance's offset distribution.
    pub fn split<R: Rng + ?Sized>(&self, deck: &Deck, rng: &mut R) -> SplitHalves {
        split::split(deck, &self.offsets, rng)
    }

    /// Riffle two halves back together using this instance's accuracy.
    pub fn riffle<R: Rng + ?Sized>(
        &self,
        halves: &SplitHalves,
        rng: &mut R,
    ) -> Result<Deck, DeckError> {
        interleave::riffle(
            &halves.bottom,
            &halves.top,
            self.params.shuffle_accuracy,
            rng,
        )
    }

    /// One full trial over the current deck. Does not adopt the result; the
    /// trial driver decides whether the new ordering becomes current.
    pub fn split_and_shuffle<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Deck, DeckError> {
        let halves = self.split(&self.deck, rng);
        self.riffle(&halves, rng)
    }
}
