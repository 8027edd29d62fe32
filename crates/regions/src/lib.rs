//! Geographic regions companies operate in.

pub mod region;

pub use region::{Municipality, Region};
