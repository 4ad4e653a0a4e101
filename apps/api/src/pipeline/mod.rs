//! Pipeline domain logic: how a candidate moves through a position's
//! interview flow and how interview scores roll up for display.

pub mod directory;
pub mod roster;
pub mod scoring;
pub mod transition;
