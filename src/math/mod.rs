pub mod coord;
pub mod bounds;

pub use coord::{Coord2, Coord3};
pub use bounds::Size3;
