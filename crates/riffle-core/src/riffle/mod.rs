pub mod interleave;
pub mod offset;
pub mod shuffler;
pub mod split;
