//! Part-detection core: edge debouncing and the piece tally.

pub mod edge;
pub mod tally;

pub use edge::{EdgeDetector, PieceEvent};
pub use tally::Tally;
