//! The MCEdit-style `.schematic` volume: a box of legacy block ids and
//! metadata nibbles, plus the entity, tile entity and tile tick records
//! that live inside it.

use std::path::Path;

use log::debug;

use crate::{
	McError,
	McResult,
	math::{Coord2, Coord3, Size3},
	nbt::{
		Map,
		io::{decode_with, encode_with, DecodeOptions, EncodeOptions},
		tag::{CompoundExt, ListTag, NamedTag, NbtString, Tag, TagID},
		tagtype::{self, FromTag, TypeId},
	},
};

/// Largest extent a schematic can have on any axis; sizes are stored as Shorts.
pub const MAX_SIZE: i32 = i16::MAX as i32;
/// Largest cell count; the block arrays are stored with an Int length.
pub const MAX_VOLUME: usize = i32::MAX as usize;
pub const ROOT_NAME: &str = "Schematic";
pub const DEFAULT_MATERIALS: &str = "Alpha";

pub(crate) const WIDTH: &str = "Width";
pub(crate) const HEIGHT: &str = "Height";
pub(crate) const LENGTH: &str = "Length";
pub(crate) const MATERIALS: &str = "Materials";
pub(crate) const BLOCKS: &str = "Blocks";
pub(crate) const DATA: &str = "Data";
pub(crate) const ENTITIES: &str = "Entities";
pub(crate) const TILE_ENTITIES: &str = "TileEntities";
pub(crate) const TILE_TICKS: &str = "TileTicks";

/// Members held in typed form, in the order a new schematic writes them.
const FIELDS: [&str; 9] = [WIDTH, HEIGHT, LENGTH, MATERIALS, BLOCKS, DATA, ENTITIES, TILE_ENTITIES, TILE_TICKS];
/// Stands in for a member held in typed form.
const PLACEHOLDER: Tag = Tag::Byte(0);

#[derive(Debug, Clone, PartialEq)]
pub struct Schematic {
	pub(crate) size: Size3,
	pub(crate) materials: NbtString,
	pub(crate) blocks: Vec<u8>,
	pub(crate) data: Vec<u8>,
	pub(crate) entities: Vec<Map>,
	pub(crate) tile_entities: Vec<Map>,
	pub(crate) tile_ticks: Vec<Map>,
	/// The loaded compound minus the fields held above. Those fields are left
	/// as placeholders so that they are written back in their original position.
	pub(crate) members: Map,
}

/// Moves a typed member out of `map`, leaving a placeholder in its slot.
fn take_field<T: FromTag + TypeId>(map: &mut Map, name: &str) -> McResult<T> {
	let slot = map.get_tag_mut(name).ok_or_else(|| McError::NotFoundInCompound(name.to_owned()))?;
	let tag = std::mem::replace(slot, PLACEHOLDER);
	T::from_tag(tag).map_err(|tag| McError::WrongFieldType {
		name: name.to_owned(),
		expected: T::tag_id(),
		found: tag.id(),
	})
}

/// Reads a List of Compound. Empty lists of any element type are accepted,
/// since some writers tag empty lists with End or Byte.
fn take_records(map: &mut Map, name: &str) -> McResult<Vec<Map>> {
	match take_field::<tagtype::List>(map, name)? {
		ListTag::Compound(records) => Ok(records),
		list if list.is_empty() => Ok(Vec::new()),
		list => Err(McError::WrongFieldType {
			name: name.to_owned(),
			expected: TagID::Compound,
			found: list.element_id(),
		}),
	}
}

fn take_volume_array(map: &mut Map, name: &str, volume: usize) -> McResult<Vec<u8>> {
	let array = take_field::<tagtype::ByteArray>(map, name)?;
	if array.len() != volume {
		return Err(McError::VolumeMismatch {
			name: name.to_owned(),
			expected: volume,
			found: array.len(),
		});
	}
	Ok(array.into_iter().map(|value| value as u8).collect())
}

/// Converts a signed size to an axis extent, enforcing the Short range on
/// each axis and [MAX_VOLUME] on the product.
pub(crate) fn checked_size(x: i32, y: i32, z: i32) -> McResult<Size3> {
	let valid = 0..=MAX_SIZE;
	let volume = (x as i64) * (y as i64) * (z as i64);
	if valid.contains(&x) && valid.contains(&y) && valid.contains(&z) && volume <= MAX_VOLUME as i64 {
		Ok(Size3::new(x as usize, y as usize, z as usize))
	} else {
		Err(McError::OutOfBounds(x as i64, y as i64, z as i64))
	}
}

impl Schematic {
	/// Creates an air-filled volume with no records.
	pub fn new(x: i32, y: i32, z: i32) -> McResult<Self> {
		let size = checked_size(x, y, z)?;
		Ok(Self {
			size,
			materials: NbtString::from(DEFAULT_MATERIALS),
			blocks: vec![0; size.volume()],
			data: vec![0; size.volume()],
			entities: Vec::new(),
			tile_entities: Vec::new(),
			tile_ticks: Vec::new(),
			members: FIELDS.into_iter().map(|name| (NbtString::from(name), PLACEHOLDER)).collect(),
		})
	}

	/// Wraps a decoded document. The root name is not checked.
	pub fn from_nbt(root: NamedTag) -> McResult<Self> {
		match root.tag {
			Tag::Compound(map) => Self::from_compound(map),
			other => Err(McError::WrongFieldType {
				name: root.name.to_string(),
				expected: TagID::Compound,
				found: other.id(),
			}),
		}
	}

	/// Wraps the schematic compound itself (the value of the root tag).
	pub fn from_compound(mut map: Map) -> McResult<Self> {
		let width = take_field::<tagtype::Short>(&mut map, WIDTH)?;
		let height = take_field::<tagtype::Short>(&mut map, HEIGHT)?;
		let length = take_field::<tagtype::Short>(&mut map, LENGTH)?;
		let size = checked_size(width as i32, height as i32, length as i32)?;
		let materials = if map.has_tag(MATERIALS) {
			take_field::<tagtype::String>(&mut map, MATERIALS)?
		} else {
			NbtString::from(DEFAULT_MATERIALS)
		};
		let blocks = take_volume_array(&mut map, BLOCKS, size.volume())?;
		let data = take_volume_array(&mut map, DATA, size.volume())?;
		let entities = take_records(&mut map, ENTITIES)?;
		let tile_entities = take_records(&mut map, TILE_ENTITIES)?;
		let tile_ticks = if map.has_tag(TILE_TICKS) {
			take_records(&mut map, TILE_TICKS)?
		} else {
			debug!("Schematic has no {TILE_TICKS}, creating an empty list.");
			map.insert(TILE_TICKS.into(), PLACEHOLDER);
			Vec::new()
		};
		debug!(
			"Loaded {}x{}x{} schematic with {} entities, {} tile entities and {} tile ticks.",
			width, height, length,
			entities.len(), tile_entities.len(), tile_ticks.len(),
		);
		Ok(Self {
			size,
			materials,
			blocks,
			data,
			entities,
			tile_entities,
			tile_ticks,
			members: map,
		})
	}

	/// Decodes a (possibly gzipped) schematic document.
	pub fn from_bytes(bytes: &[u8]) -> McResult<Self> {
		Self::from_bytes_with(bytes, DecodeOptions::default())
	}

	pub fn from_bytes_with(bytes: &[u8], options: DecodeOptions<'_>) -> McResult<Self> {
		Self::from_nbt(decode_with(bytes, options)?)
	}

	pub fn read_from_file<P: AsRef<Path>>(path: P) -> McResult<Self> {
		let bytes = std::fs::read(path)?;
		Self::from_bytes(&bytes)
	}

	/// Builds the schematic compound. Members that were loaded keep their order;
	/// new ones are appended.
	pub fn to_compound(&self) -> Map {
		let mut map = self.members.clone();
		let short = |value: usize| Tag::Short(value as i16);
		let bytes = |array: &[u8]| Tag::ByteArray(array.iter().map(|&value| value as i8).collect());
		let records = |records: &[Map]| Tag::List(ListTag::Compound(records.to_vec()));
		map.insert(WIDTH.into(), short(self.size.x));
		map.insert(HEIGHT.into(), short(self.size.y));
		map.insert(LENGTH.into(), short(self.size.z));
		map.insert(MATERIALS.into(), Tag::String(self.materials.clone()));
		map.insert(BLOCKS.into(), bytes(&self.blocks));
		map.insert(DATA.into(), bytes(&self.data));
		map.insert(ENTITIES.into(), records(&self.entities));
		map.insert(TILE_ENTITIES.into(), records(&self.tile_entities));
		map.insert(TILE_TICKS.into(), records(&self.tile_ticks));
		map
	}

	/// The document root, named `"Schematic"`.
	pub fn to_nbt(&self) -> NamedTag {
		NamedTag::new(ROOT_NAME, self.to_compound())
	}

	pub fn to_bytes(&self, options: EncodeOptions<'_>) -> McResult<Vec<u8>> {
		encode_with(&self.to_nbt(), options)
	}

	/// Writes the gzipped document to `path`.
	pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> McResult<()> {
		let bytes = self.to_bytes(EncodeOptions {
			gzip: true,
			..Default::default()
		})?;
		std::fs::write(path, bytes)?;
		Ok(())
	}

	#[inline(always)]
	pub fn size(&self) -> Size3 {
		self.size
	}

	#[inline(always)]
	pub fn volume(&self) -> usize {
		self.size.volume()
	}

	/// Flat index of `(x, y, z)` into [Schematic::blocks] and [Schematic::data].
	#[inline]
	pub fn index_of(&self, x: i32, y: i32, z: i32) -> Option<usize> {
		self.size.index(Coord3::from((x, y, z)))
	}

	fn checked_index(&self, x: i32, y: i32, z: i32) -> McResult<usize> {
		self.index_of(x, y, z).ok_or(McError::OutOfBounds(x as i64, y as i64, z as i64))
	}

	/// Block id at `(x, y, z)`, or 0 (air) outside of the volume.
	pub fn get_block_id(&self, x: i32, y: i32, z: i32) -> u8 {
		self.index_of(x, y, z).map_or(0, |index| self.blocks[index])
	}

	/// Block metadata at `(x, y, z)`, or 0 outside of the volume.
	pub fn get_block_meta(&self, x: i32, y: i32, z: i32) -> u8 {
		self.index_of(x, y, z).map_or(0, |index| self.data[index])
	}

	/// Sets the block id and resets its metadata to 0.
	pub fn set_block_id(&mut self, x: i32, y: i32, z: i32, id: i32) -> McResult<()> {
		self.set_block_and_meta(x, y, z, id, 0)
	}

	pub fn set_block_meta(&mut self, x: i32, y: i32, z: i32, meta: i32) -> McResult<()> {
		let index = self.checked_index(x, y, z)?;
		McError::range_check(meta, 0..=15, McError::InvalidMetadata)?;
		self.data[index] = meta as u8;
		Ok(())
	}

	pub fn set_block_and_meta(&mut self, x: i32, y: i32, z: i32, id: i32, meta: i32) -> McResult<()> {
		let index = self.checked_index(x, y, z)?;
		McError::range_check(id, 0..=255, McError::InvalidBlockId)?;
		McError::range_check(meta, 0..=15, McError::InvalidMetadata)?;
		self.blocks[index] = id as u8;
		self.data[index] = meta as u8;
		Ok(())
	}

	/// Chunk column that would hold `(x, y, z)` if the schematic were pasted at the origin.
	pub fn chunk_position(&self, x: i32, y: i32, z: i32) -> Coord2 {
		Coord3::from((x, y, z)).chunk_coord()
	}

	pub fn blocks(&self) -> &[u8] {
		&self.blocks
	}

	pub fn data(&self) -> &[u8] {
		&self.data
	}

	pub fn materials(&self) -> &NbtString {
		&self.materials
	}

	pub fn set_materials<S: Into<NbtString>>(&mut self, materials: S) {
		self.materials = materials.into();
	}

	pub fn entities(&self) -> &[Map] {
		&self.entities
	}

	pub fn entities_mut(&mut self) -> &mut Vec<Map> {
		&mut self.entities
	}

	pub fn set_entities(&mut self, entities: Vec<Map>) {
		self.entities = entities;
	}

	pub fn tile_entities(&self) -> &[Map] {
		&self.tile_entities
	}

	pub fn tile_entities_mut(&mut self) -> &mut Vec<Map> {
		&mut self.tile_entities
	}

	pub fn set_tile_entities(&mut self, tile_entities: Vec<Map>) {
		self.tile_entities = tile_entities;
	}

	pub fn tile_ticks(&self) -> &[Map] {
		&self.tile_ticks
	}

	pub fn tile_ticks_mut(&mut self) -> &mut Vec<Map> {
		&mut self.tile_ticks
	}

	pub fn set_tile_ticks(&mut self, tile_ticks: Vec<Map>) {
		self.tile_ticks = tile_ticks;
	}
}
