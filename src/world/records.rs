//! Entities, tile entities and tile ticks all carry a position inside the
//! schematic. These helpers move those positions along with the blocks.

use log::{trace, warn};

use crate::{
	math::{Coord3, Size3},
	nbt::{
		Map,
		tag::{CompoundExt, ListTag, Tag},
	},
	world::rotate::Rotation,
};

/// Where a record keeps its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordLayout {
	/// Int members `x`, `y` and `z`. Tile entities and tile ticks.
	Block,
	/// A three element `Pos` list of Doubles. Entities.
	/// Float and Int lists are read too, and written back as they were.
	Entity,
}

fn saturate(value: f64) -> i32 {
	value.clamp(i32::MIN as f64, i32::MAX as f64) as i32
}

impl RecordLayout {
	/// The record's position, or `None` if it can't be read.
	pub fn position(self, record: &Map) -> Option<[f64; 3]> {
		match self {
			RecordLayout::Block => {
				let mut position = [0.0; 3];
				for (axis, name) in ["x", "y", "z"].into_iter().enumerate() {
					match record.get_tag(name) {
						Some(Tag::Int(value)) => position[axis] = *value as f64,
						_ => return None,
					}
				}
				Some(position)
			}
			RecordLayout::Entity => match record.get_tag("Pos") {
				Some(Tag::List(ListTag::Double(pos))) if pos.len() == 3 => Some([pos[0], pos[1], pos[2]]),
				Some(Tag::List(ListTag::Float(pos))) if pos.len() == 3 => Some([pos[0] as f64, pos[1] as f64, pos[2] as f64]),
				Some(Tag::List(ListTag::Int(pos))) if pos.len() == 3 => Some([pos[0] as f64, pos[1] as f64, pos[2] as f64]),
				_ => None,
			}
		}
	}

	/// Overwrites a readable position, keeping its tag types.
	/// Returns false if the record has no readable position.
	pub fn set_position(self, record: &mut Map, position: [f64; 3]) -> bool {
		if self.position(record).is_none() {
			return false;
		}
		match self {
			RecordLayout::Block => {
				for (axis, name) in ["x", "y", "z"].into_iter().enumerate() {
					record.insert(name.into(), Tag::Int(saturate(position[axis])));
				}
			}
			RecordLayout::Entity => {
				let Some(Tag::List(pos)) = record.get_tag_mut("Pos") else {
					return false;
				};
				match pos {
					ListTag::Double(pos) => pos.copy_from_slice(&position),
					ListTag::Float(pos) => pos.iter_mut().zip(position).for_each(|(out, value)| *out = value as f32),
					ListTag::Int(pos) => pos.iter_mut().zip(position).for_each(|(out, value)| *out = saturate(value)),
					_ => return false,
				}
			}
		}
		true
	}

	/// The block cell the record occupies. Entity positions are floored.
	pub fn cell(self, record: &Map) -> Option<Coord3> {
		self.position(record).map(|[x, y, z]| {
			Coord3::new(x.floor() as i64, y.floor() as i64, z.floor() as i64)
		})
	}
}

/// Adds `offset` to every record, then drops those whose cell lies outside `size`.
/// Records without a readable position are kept as they are.
pub(crate) fn shift_and_prune(records: &mut Vec<Map>, layout: RecordLayout, offset: Coord3, size: Size3, kind: &str) {
	let before = records.len();
	records.retain_mut(|record| {
		let Some([x, y, z]) = layout.position(record) else {
			warn!("{kind} record has no readable position, leaving it untouched.");
			return true;
		};
		let shifted = [x + offset.x as f64, y + offset.y as f64, z + offset.z as f64];
		layout.set_position(record, shifted);
		match layout.cell(record) {
			Some(cell) if size.contains(cell) => true,
			cell => {
				trace!("Dropping {kind} record at {cell:?}, outside of {size:?}.");
				false
			}
		}
	});
	if records.len() != before {
		trace!("Dropped {} of {} {kind} records.", before - records.len(), before);
	}
}

/// Moves every record the way `rotation` moves the blocks of a volume of `old_size`.
pub(crate) fn rotate_all(records: &mut [Map], layout: RecordLayout, rotation: Rotation, old_size: Size3, kind: &str) {
	for record in records.iter_mut() {
		let Some([x, y, z]) = layout.position(record) else {
			warn!("{kind} record has no readable position, leaving it untouched.");
			continue;
		};
		let (x, z) = rotation.forward(x, z, old_size.x as f64, old_size.z as f64, 1.0);
		layout.set_position(record, [x, y, z]);
	}
}
