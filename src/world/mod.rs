pub mod schematic;
pub mod records;
pub mod resize;
pub mod rotate;
