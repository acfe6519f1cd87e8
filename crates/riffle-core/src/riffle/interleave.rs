use rand::Rng;

use crate::model::deck::{CardId, Deck, DeckError};

/// Which half the next card falls from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Bottom,
    Top,
}

/// Interleave two halves with a fixed starting side.
///
/// Index 0 of each half is its top card, the last to fall. After every placed
/// card the source side switches with probability `accuracy`; the moment one
/// side empties, the remainder of the other side falls as a single block. An
/// empty input half short-circuits to a copy of the other half.
pub fn interleave_from<R: Rng + ?Sized>(
    bottom: &[CardId],
    top: &[CardId],
    start: Side,
    accuracy: f64,
    rng: &mut R,
) -> Vec<CardId> {
    if bottom.is_empty() {
        return top.to_vec();
    }
    if top.is_empty() {
        return bottom.to_vec();
    }

    let total = bottom.len() + top.len();
    let sides = [bottom, top];
    let mut cursors = [0usize; 2];
    let mut current = match start {
        Side::Bottom => 0,
        Side::Top => 1,
    };
    let switch_p = accuracy.clamp(0.0, 1.0);
    let mut merged = Vec::with_capacity(total);

    while merged.len() < total {
        merged.push(sides[current][cursors[current]]);
        cursors[current] += 1;
        if cursors[current] == sides[current].len() {
            // Nothing left in the current side.
            let other = 1 - current;
            merged.extend_from_slice(&sides[other][cursors[other]..]);
            break;
        }
        if rng.gen_bool(switch_p) {
            current = 1 - current;
        }
    }

    merged
}

/// Full riffle: draw the starting side uniformly, interleave, then re-check
/// the permutation invariant. A violation is a split/shuffle defect and is
/// surfaced rather than recovered from.
pub fn riffle<R: Rng + ?Sized>(
    bottom: &[CardId],
    top: &[CardId],
    accuracy: f64,
    rng: &mut R,
) -> Result<Deck, DeckError> {
    let start = if rng.gen_bool(0.5) {
        Side::Bottom
    } else {
        Side::Top
    };
    Deck::try_new(interleave_from(bottom, top, start, accuracy, rng))
}
