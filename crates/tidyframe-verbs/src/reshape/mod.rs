//! Wide-to-long and long-to-wide reshaping.

pub mod gather;
pub mod spread;

pub use gather::Gather;
pub use spread::{Reducer, Spread};
