use rand::Rng;

use crate::model::deck::{CardId, Deck};
use crate::riffle::offset::SplitOffsets;

/// Two contiguous halves of a deck.
///
/// `bottom` holds positions `[0, splitidx)` and is placed first; `top` holds
/// the rest. Concatenating `bottom ++ top` reconstructs the input deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitHalves {
    pub bottom: Vec<CardId>,
    pub top: Vec<CardId>,
}

/// Cut the deck near its midpoint, with the imperfection drawn from `offsets`.
///
/// The signed offset is applied to `n / 2` and the result clamped into
/// `[0, n]`, so an extreme draw degrades to one empty side rather than
/// failing.
pub fn split<R: Rng + ?Sized>(deck: &Deck, offsets: &SplitOffsets, rng: &mut R) -> SplitHalves {
    let n = deck.len();
    let half = (n / 2) as i64;
    let sign: i64 = if rng.gen_bool(0.5) { 1 } else { -1 };
    let offset = offsets.sample(rng).trunc() as i64;
    let split_idx = (half + sign * offset).clamp(0, n as i64) as usize;
    cut(deck, split_idx)
}

/// Cut at a fixed index (clamped to the deck length).
pub fn cut(deck: &Deck, index: usize) -> SplitHalves {
    let index = index.min(deck.len());
    let (bottom, top) = deck.cards().split_at(index);
    SplitHalves {
        bottom: bottom.to_vec(),
        top: top.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::{cut, split};
    use crate::model::deck::Deck;
    use crate::riffle::offset::SplitOffsets;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn halves_reconstruct_the_deck() {
        let deck = Deck::sequential(52);
        let offsets = SplitOffsets::deck_size(52);
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..200 {
            let halves = split(&deck, &offsets, &mut rng);
            let mut rebuilt = halves.bottom.clone();
            rebuilt.extend_from_slice(&halves.top);
            assert_eq!(rebuilt, deck.cards());
        }
    }

    #[test]
    fn cut_at_zero_leaves_bottom_empty() {
        let deck = Deck::sequential(8);
        let halves = cut(&deck, 0);
        assert!(halves.bottom.is_empty());
        assert_eq!(halves.top, deck.cards());
    }

    #[test]
    fn cut_at_or_beyond_length_leaves_top_empty() {
        let deck = Deck::sequential(8);
        for index in [8, 9, 100] {
            let halves = cut(&deck, index);
            assert_eq!(halves.bottom, deck.cards());
            assert!(halves.top.is_empty());
        }
    }

    #[test]
    fn split_lands_near_the_midpoint() {
        let deck = Deck::sequential(52);
        let offsets = SplitOffsets::deck_size(52);
        let mut rng = StdRng::seed_from_u64(23);
        let mut total = 0usize;
        let rounds = 500;
        for _ in 0..rounds {
            total += split(&deck, &offsets, &mut rng).bottom.len();
        }
        let mean = total as f64 / rounds as f64;
        assert!((mean - 26.0).abs() < 2.0, "mean split index {mean}");
    }

    #[test]
    fn perfect_accuracy_cuts_exactly_in_half() {
        let deck = Deck::sequential(52);
        let offsets = SplitOffsets::split_accuracy(1.0, 52);
        let mut rng = StdRng::seed_from_u64(29);
        for _ in 0..50 {
            let halves = split(&deck, &offsets, &mut rng);
            assert_eq!(halves.bottom.len(), 26);
            assert_eq!(halves.top.len(), 26);
        }
    }
}
