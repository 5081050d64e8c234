use log::debug;

use crate::{
	McError,
	McResult,
	math::Coord3,
	world::{
		records::{shift_and_prune, RecordLayout},
		schematic::*,
	},
};

/// Size and offset along one axis that make `coord` addressable.
fn grow_axis(coord: i32, size: usize) -> (i64, i64) {
	let size = size as i64;
	let coord = coord as i64;
	if coord < 0 {
		(size + coord.abs(), coord.abs())
	} else if coord >= size {
		(coord + 1, 0)
	} else {
		(size, 0)
	}
}

fn to_i32(value: i64) -> i32 {
	value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

impl Schematic {
	/// Changes the extents of the volume.
	///
	/// The old content is moved by `(offset_x, offset_y, offset_z)`. Cells that
	/// end up outside are lost, new cells are air. Records are moved by the same
	/// offset and dropped if they leave the volume.
	pub fn resize(&mut self, size_x: i32, size_y: i32, size_z: i32, offset_x: i32, offset_y: i32, offset_z: i32) -> McResult<()> {
		let new_size = checked_size(size_x, size_y, size_z)?;
		let old_size = self.size;
		let offset = Coord3::from((offset_x, offset_y, offset_z));
		let mut blocks = vec![0; new_size.volume()];
		let mut data = vec![0; new_size.volume()];
		for (index, coord) in new_size.iter().enumerate() {
			if let Some(old_index) = old_size.index(coord - offset) {
				blocks[index] = self.blocks[old_index];
				data[index] = self.data[old_index];
			}
		}
		self.blocks = blocks;
		self.data = data;
		self.size = new_size;
		shift_and_prune(&mut self.entities, RecordLayout::Entity, offset, new_size, ENTITIES);
		shift_and_prune(&mut self.tile_entities, RecordLayout::Block, offset, new_size, TILE_ENTITIES);
		shift_and_prune(&mut self.tile_ticks, RecordLayout::Block, offset, new_size, TILE_TICKS);
		debug!("Resized schematic from {:?} to {:?} with offset {:?}.", old_size, new_size, offset);
		Ok(())
	}

	/// Sets a block, first growing the volume if `(x, y, z)` lies outside of it.
	///
	/// Negative coordinates grow the volume toward the origin side and shift the
	/// existing content, so the block ends up at 0 on that axis. Invalid ids or
	/// metadata are rejected before anything is resized.
	pub fn force_set_block_and_meta(&mut self, x: i32, y: i32, z: i32, id: i32, meta: i32) -> McResult<()> {
		McError::range_check(id, 0..=255, McError::InvalidBlockId)?;
		McError::range_check(meta, 0..=15, McError::InvalidMetadata)?;
		if self.index_of(x, y, z).is_none() {
			let (size_x, offset_x) = grow_axis(x, self.size.x);
			let (size_y, offset_y) = grow_axis(y, self.size.y);
			let (size_z, offset_z) = grow_axis(z, self.size.z);
			self.resize(
				to_i32(size_x), to_i32(size_y), to_i32(size_z),
				to_i32(offset_x), to_i32(offset_y), to_i32(offset_z),
			)?;
		}
		self.set_block_and_meta(x.max(0), y.max(0), z.max(0), id, meta)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		compound,
		list,
		math::Size3,
		nbt::{Map, tag::{CompoundExt, Tag}},
	};

	fn record(tag: Tag) -> Map {
		match tag {
			Tag::Compound(map) => map,
			_ => unreachable!(),
		}
	}

	#[test]
	fn resize_with_offset() {
		let mut schematic = Schematic::new(2, 1, 2).unwrap();
		schematic.set_block_and_meta(0, 0, 0, 1, 0).unwrap();
		schematic.resize(3, 1, 2, 1, 0, 0).unwrap();
		assert_eq!(schematic.size(), Size3::new(3, 1, 2));
		assert_eq!(schematic.get_block_id(1, 0, 0), 1);
		assert_eq!(schematic.get_block_id(0, 0, 0), 0);
	}

	#[test]
	fn resize_to_same_size_changes_nothing() {
		let mut schematic = Schematic::new(3, 2, 2).unwrap();
		schematic.set_block_and_meta(2, 1, 1, 20, 4).unwrap();
		let before = schematic.clone();
		schematic.resize(3, 2, 2, 0, 0, 0).unwrap();
		assert_eq!(schematic, before);
	}

	#[test]
	fn shrinking_drops_cells_and_records() {
		let mut schematic = Schematic::new(4, 1, 1).unwrap();
		schematic.set_block_id(3, 0, 0, 5).unwrap();
		schematic.set_block_id(1, 0, 0, 6).unwrap();
		schematic.tile_entities_mut().push(record(compound!{ ("x", 3i32), ("y", 0i32), ("z", 0i32) }));
		schematic.tile_ticks_mut().push(record(compound!{ ("x", 1i32), ("y", 0i32), ("z", 0i32) }));
		schematic.entities_mut().push(record(compound!{ ("Pos", list![0.5f64, 0.5, 0.5]) }));
		schematic.resize(2, 1, 1, -1, 0, 0).unwrap();
		assert_eq!(schematic.blocks(), &[6, 0]);
		assert!(schematic.tile_entities().is_empty());
		assert_eq!(schematic.tile_ticks()[0].get_tag("x"), Some(&Tag::Int(0)));
		// shifted to x = -0.5, which floors to -1
		assert!(schematic.entities().is_empty());
	}

	#[test]
	fn resize_limits() {
		let mut schematic = Schematic::new(1, 1, 1).unwrap();
		assert!(matches!(schematic.resize(32768, 1, 1, 0, 0, 0), Err(McError::OutOfBounds(32768, 1, 1))));
		assert!(matches!(schematic.resize(1, -1, 1, 0, 0, 0), Err(McError::OutOfBounds(1, -1, 1))));
		assert_eq!(schematic.size(), Size3::new(1, 1, 1));
		schematic.resize(0, 0, 0, 0, 0, 0).unwrap();
		assert_eq!(schematic.volume(), 0);
	}

	#[test]
	fn force_set_grows_the_volume() {
		let mut schematic = Schematic::new(2, 1, 2).unwrap();
		schematic.set_block_id(0, 0, 0, 1).unwrap();
		schematic.force_set_block_and_meta(4, 0, 1, 2, 3).unwrap();
		assert_eq!(schematic.size(), Size3::new(5, 1, 2));
		assert_eq!(schematic.get_block_id(4, 0, 1), 2);
		assert_eq!(schematic.get_block_meta(4, 0, 1), 3);
		assert_eq!(schematic.get_block_id(0, 0, 0), 1);
	}

	#[test]
	fn force_set_negative_coordinates() {
		let mut schematic = Schematic::new(2, 1, 2).unwrap();
		schematic.set_block_id(0, 0, 0, 1).unwrap();
		schematic.force_set_block_and_meta(-2, 0, 0, 7, 0).unwrap();
		assert_eq!(schematic.size(), Size3::new(4, 1, 2));
		assert_eq!(schematic.get_block_id(0, 0, 0), 7);
		// old content moved by the offset
		assert_eq!(schematic.get_block_id(2, 0, 0), 1);
	}

	#[test]
	fn force_set_inside_is_a_plain_set() {
		let mut schematic = Schematic::new(2, 2, 2).unwrap();
		schematic.force_set_block_and_meta(1, 1, 1, 3, 1).unwrap();
		assert_eq!(schematic.size(), Size3::new(2, 2, 2));
		assert_eq!(schematic.get_block_id(1, 1, 1), 3);
	}

	#[test]
	fn force_set_rejects_before_growing() {
		let mut schematic = Schematic::new(2, 1, 2).unwrap();
		schematic.set_block_id(1, 0, 1, 9).unwrap();
		let before = schematic.clone();
		assert!(matches!(schematic.force_set_block_and_meta(5, 0, 0, 300, 0), Err(McError::InvalidBlockId(300))));
		assert!(matches!(schematic.force_set_block_and_meta(-3, 0, 0, 1, 16), Err(McError::InvalidMetadata(16))));
		assert!(matches!(schematic.force_set_block_and_meta(0, 4, 0, -1, 0), Err(McError::InvalidBlockId(-1))));
		assert_eq!(schematic.size(), Size3::new(2, 1, 2));
		assert_eq!(schematic, before);
	}
}
