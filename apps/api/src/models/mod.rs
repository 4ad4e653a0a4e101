pub mod application;
pub mod candidate;
pub mod position;
