use std::ops::Sub;

use log::debug;

use crate::{
	McError,
	McResult,
	math::Size3,
	world::{
		records::{rotate_all, RecordLayout},
		schematic::*,
	},
};

/// A turn about the Y axis. Turning by 90 takes +X toward +Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
	Deg90,
	Deg180,
	Deg270,
}

impl Rotation {
	pub fn degrees(self) -> i32 {
		match self {
			Rotation::Deg90 => 90,
			Rotation::Deg180 => 180,
			Rotation::Deg270 => 270,
		}
	}

	/// Whether the X and Z extents trade places.
	pub fn swaps_axes(self) -> bool {
		!matches!(self, Rotation::Deg180)
	}

	/// Extents of a volume of `size` after this rotation.
	pub fn rotated_size(self, size: Size3) -> Size3 {
		if self.swaps_axes() {
			Size3::new(size.z, size.y, size.x)
		} else {
			size
		}
	}

	/// Where the cell `(x, z)` of a volume with extents `size_x` by `size_z` ends up.
	pub fn forward<T: Copy + Sub<Output = T>>(self, x: T, z: T, size_x: T, size_z: T, one: T) -> (T, T) {
		match self {
			Rotation::Deg90 => (size_z - z - one, x),
			Rotation::Deg180 => (size_x - x - one, size_z - z - one),
			Rotation::Deg270 => (z, size_x - x - one),
		}
	}

	/// The cell of the old volume that lands on `(x, z)` of the rotated one.
	pub fn source(self, x: usize, z: usize, old_size: Size3) -> (usize, usize) {
		let new_size = self.rotated_size(old_size);
		match self {
			Rotation::Deg90 => (z, new_size.x - x - 1),
			Rotation::Deg180 => (old_size.x - x - 1, old_size.z - z - 1),
			Rotation::Deg270 => (old_size.x - z - 1, x),
		}
	}
}

impl TryFrom<i32> for Rotation {
	type Error = McError;

	fn try_from(value: i32) -> Result<Self, Self::Error> {
		match value {
			90 => Ok(Rotation::Deg90),
			180 => Ok(Rotation::Deg180),
			270 => Ok(Rotation::Deg270),
			other => Err(McError::InvalidRotationAmount(other)),
		}
	}
}

impl Schematic {
	/// Rotates the whole volume about the Y axis by 90, 180 or 270 degrees.
	pub fn rotate(&mut self, angle: i32) -> McResult<()> {
		self.rotate_by(Rotation::try_from(angle)?);
		Ok(())
	}

	pub fn rotate_by(&mut self, rotation: Rotation) {
		let old_size = self.size;
		let new_size = rotation.rotated_size(old_size);
		let mut blocks = Vec::with_capacity(new_size.volume());
		let mut data = Vec::with_capacity(new_size.volume());
		// pushing in y, z, x order fills the arrays in index order
		for y in 0..new_size.y {
			for z in 0..new_size.z {
				for x in 0..new_size.x {
					let (old_x, old_z) = rotation.source(x, z, old_size);
					let index = old_size.index_unchecked(old_x, y, old_z);
					blocks.push(self.blocks[index]);
					data.push(self.data[index]);
				}
			}
		}
		self.blocks = blocks;
		self.data = data;
		self.size = new_size;
		rotate_all(&mut self.entities, RecordLayout::Entity, rotation, old_size, ENTITIES);
		rotate_all(&mut self.tile_entities, RecordLayout::Block, rotation, old_size, TILE_ENTITIES);
		rotate_all(&mut self.tile_ticks, RecordLayout::Block, rotation, old_size, TILE_TICKS);
		debug!(
			"Rotated schematic by {} degrees, {:?} -> {:?}.",
			rotation.degrees(), old_size, new_size,
		);
	}
}
