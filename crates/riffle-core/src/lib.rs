#![deny(warnings)]
pub mod model;
pub mod riffle;

pub use model::deck::{CardId, Deck, DeckError};
pub use riffle::interleave::{Side, interleave_from, riffle};
pub use riffle::offset::SplitOffsets;
pub use riffle::shuffler::{Shuffler, ShufflerParams, SplitSpread};
pub use riffle::split::{SplitHalves, cut, split};
