//! Reading and writing of NBT documents.
//!
//! Decoding works on a [BinaryCursor] over the whole (decompressed) document.
//! Encoding writes into any [Write]r. Compression is never done here; it is
//! handed off to a [Compressor]/[Decompressor].

use std::io::{
	Read,
	Write,
};

use byteorder::{BigEndian, ByteOrder};
use log::{debug, trace};

use crate::{
	McResult,
	compression::{
		CancelToken,
		Compressor,
		Decompressor,
		GzipCodec,
		ProgressFn,
		is_gzip,
	},
	ioext::{BinaryCursor, WriteExt},
	nbt::{
		Map,
		NbtError,
		MAX_DEPTH,
		tag::*,
	},
};

/// Settings for [decode_with].
#[derive(Default)]
pub struct DecodeOptions<'a> {
	/// Used when the input starts with the gzip magic.
	/// Falls back to [GzipCodec] when not set.
	pub decompressor: Option<&'a dyn Decompressor>,
	/// Receives decompression progress as a percentage and a message.
	pub progress: Option<ProgressFn<'a>>,
	/// Checked between decompression slices.
	pub cancel: Option<&'a CancelToken>,
}

/// Settings for [encode_with].
#[derive(Default)]
pub struct EncodeOptions<'a> {
	/// Encloses the document in the unnamed, empty-named Compound that
	/// some legacy chunk exports carry.
	pub wrap_legacy: bool,
	/// Compress the output. Uses `compressor`, or [GzipCodec] if unset.
	pub gzip: bool,
	pub compressor: Option<&'a dyn Compressor>,
	pub progress: Option<ProgressFn<'a>>,
}

/// Decodes an NBT document, gunzipping it first if necessary.
pub fn decode(bytes: &[u8]) -> McResult<NamedTag> {
	decode_with(bytes, DecodeOptions::default())
}

pub fn decode_with(bytes: &[u8], options: DecodeOptions<'_>) -> McResult<NamedTag> {
	if !is_gzip(bytes) {
		return Ok(decode_uncompressed(bytes)?);
	}
	debug!("Input starts with gzip magic, decompressing {} bytes.", bytes.len());
	let fallback;
	let decompressor: &dyn Decompressor = match options.decompressor {
		Some(decompressor) => decompressor,
		None => {
			fallback = GzipCodec::default();
			&fallback
		}
	};
	let inflated = decompressor.decompress(bytes, options.progress, options.cancel)?;
	Ok(decode_uncompressed(&inflated)?)
}

/// Decodes an NBT document that is known not to be compressed.
pub fn decode_uncompressed(bytes: &[u8]) -> Result<NamedTag, NbtError> {
	let mut cursor = BinaryCursor::new(bytes);
	read_root(&mut cursor)
}

/// Reads the root tag, which must be a named Compound.
/// Bytes following the root are left in the cursor.
pub fn read_root(cursor: &mut BinaryCursor<'_>) -> Result<NamedTag, NbtError> {
	let mut root_id = cursor.read_ubyte(false)?;
	if skip_legacy_wrapper(cursor)? {
		root_id = cursor.read_ubyte(false)?;
	}
	if root_id != TagID::Compound.value() {
		return Err(NbtError::UnexpectedRootTag(format!(
			"expected 0x{:02x} but found 0x{:02x}",
			TagID::Compound.value(),
			root_id,
		)));
	}
	let name = NbtString::from(cursor.read_string()?);
	let tag = read_payload(cursor, TagID::Compound, 0)?;
	Ok(NamedTag { name, tag })
}

/// Some legacy exports put an unnamed Compound in front of the real root,
/// so the data starts with `0A 00 00`. Call this right after the first tag id
/// has been read: if the name length that follows is zero, it is skipped and
/// `true` is returned, meaning the next byte is the id of the real root.
pub fn skip_legacy_wrapper(cursor: &mut BinaryCursor<'_>) -> Result<bool, NbtError> {
	if cursor.read_ushort(true)? != 0 {
		return Ok(false);
	}
	cursor.skip(2)?;
	debug!("Skipped anonymous wrapper Compound at position {}.", cursor.position());
	Ok(true)
}

fn read_tag_id(cursor: &mut BinaryCursor<'_>) -> Result<TagID, NbtError> {
	let offset = cursor.position();
	let id = cursor.read_ubyte(false)?;
	TagID::from_u8(id).ok_or(NbtError::UnknownTagType { id, offset })
}

fn read_length(cursor: &mut BinaryCursor<'_>) -> Result<usize, NbtError> {
	let length = cursor.read_int(false)?;
	if length < 0 {
		return Err(NbtError::NegativeLength(length));
	}
	Ok(length as usize)
}

fn read_byte_array(cursor: &mut BinaryCursor<'_>) -> Result<Vec<i8>, NbtError> {
	let length = read_length(cursor)?;
	let buffer = cursor.read_buffer(length, false)?;
	Ok(buffer.iter().map(|&byte| byte as i8).collect())
}

fn read_int_array(cursor: &mut BinaryCursor<'_>) -> Result<Vec<i32>, NbtError> {
	let length = read_length(cursor)?;
	let byte_length = length.checked_mul(4).ok_or(NbtError::LengthOverflow(length))?;
	let buffer = cursor.read_buffer(byte_length, false)?;
	Ok(buffer.chunks_exact(4).map(BigEndian::read_i32).collect())
}

fn read_nbt_string(cursor: &mut BinaryCursor<'_>) -> Result<NbtString, NbtError> {
	Ok(NbtString::from(cursor.read_string()?))
}

fn check_depth(depth: usize) -> Result<(), NbtError> {
	if depth > MAX_DEPTH {
		return Err(NbtError::NestingTooDeep(MAX_DEPTH));
	}
	Ok(())
}

fn read_compound(cursor: &mut BinaryCursor<'_>, depth: usize) -> Result<Map, NbtError> {
	check_depth(depth)?;
	let mut map = Map::new();
	loop {
		let id = read_tag_id(cursor)?;
		if id == TagID::End {
			break;
		}
		let name = read_nbt_string(cursor)?;
		let tag = read_payload(cursor, id, depth)?;
		map.insert(name, tag);
	}
	Ok(map)
}

fn read_list(cursor: &mut BinaryCursor<'_>, depth: usize) -> Result<ListTag, NbtError> {
	check_depth(depth)?;
	let element_id = read_tag_id(cursor)?;
	let length = read_length(cursor)?;
	// Capacity is capped by how many elements of the smallest encoding the
	// remaining input could still hold.
	macro_rules! elements {
		($read:expr, $min_size:expr) => {
			{
				let capacity = length.min(cursor.remaining() / $min_size);
				let mut items = Vec::with_capacity(capacity);
				for _ in 0..length {
					items.push($read?);
				}
				items
			}
		};
	}
	Ok(match element_id {
		TagID::End => ListTag::Empty,
		TagID::Byte => ListTag::Byte(elements!(cursor.read_byte(false), 1)),
		TagID::Short => ListTag::Short(elements!(cursor.read_short(false), 2)),
		TagID::Int => ListTag::Int(elements!(cursor.read_int(false), 4)),
		TagID::Long => ListTag::Long(elements!(cursor.read_long(false), 8)),
		TagID::Float => ListTag::Float(elements!(cursor.read_float(false), 4)),
		TagID::Double => ListTag::Double(elements!(cursor.read_double(false), 8)),
		TagID::ByteArray => ListTag::ByteArray(elements!(read_byte_array(cursor), 4)),
		TagID::String => ListTag::String(elements!(read_nbt_string(cursor), 2)),
		TagID::List => ListTag::List(elements!(read_list(cursor, depth + 1), 5)),
		TagID::Compound => ListTag::Compound(elements!(read_compound(cursor, depth + 1), 1)),
		TagID::IntArray => ListTag::IntArray(elements!(read_int_array(cursor), 4)),
	})
}

/// Reads the payload of a tag whose id has already been consumed.
/// `depth` is the number of List/Compound levels already entered.
pub fn read_payload(cursor: &mut BinaryCursor<'_>, id: TagID, depth: usize) -> Result<Tag, NbtError> {
	Ok(match id {
		TagID::End => {
			return Err(NbtError::UnknownTagType {
				id: TagID::End.value(),
				offset: cursor.position(),
			});
		}
		TagID::Byte => Tag::Byte(cursor.read_byte(false)?),
		TagID::Short => Tag::Short(cursor.read_short(false)?),
		TagID::Int => Tag::Int(cursor.read_int(false)?),
		TagID::Long => Tag::Long(cursor.read_long(false)?),
		TagID::Float => Tag::Float(cursor.read_float(false)?),
		TagID::Double => Tag::Double(cursor.read_double(false)?),
		TagID::ByteArray => Tag::ByteArray(read_byte_array(cursor)?),
		TagID::String => Tag::String(read_nbt_string(cursor)?),
		TagID::List => Tag::List(read_list(cursor, depth + 1)?),
		TagID::Compound => Tag::Compound(read_compound(cursor, depth + 1)?),
		TagID::IntArray => Tag::IntArray(read_int_array(cursor)?),
	})
}

/// Encodes a named Compound without compression.
pub fn encode(root: &NamedTag) -> McResult<Vec<u8>> {
	encode_with(root, EncodeOptions::default())
}

pub fn encode_with(root: &NamedTag, options: EncodeOptions<'_>) -> McResult<Vec<u8>> {
	let bytes = encode_uncompressed(root.name.as_bytes(), &root.tag, options.wrap_legacy)?;
	compress_output(bytes, options)
}

/// Encodes a root given as a map holding exactly one Compound, the shape
/// a decoded document has when viewed as `{ name: tag }`.
pub fn encode_root_map(root: &Map, options: EncodeOptions<'_>) -> McResult<Vec<u8>> {
	if root.len() != 1 {
		return Err(NbtError::UnexpectedRootTag(format!(
			"expected 1 element in root, found {}",
			root.len(),
		)).into());
	}
	let Some((name, tag)) = root.get_index(0) else {
		return Err(NbtError::UnexpectedRootTag("root is empty".to_owned()).into());
	};
	let bytes = encode_uncompressed(name.as_bytes(), tag, options.wrap_legacy)?;
	compress_output(bytes, options)
}

fn compress_output(bytes: Vec<u8>, options: EncodeOptions<'_>) -> McResult<Vec<u8>> {
	if !options.gzip {
		return Ok(bytes);
	}
	match options.compressor {
		Some(compressor) => compressor.compress(&bytes, options.progress),
		None => GzipCodec::default().compress(&bytes, options.progress),
	}
}

/// Serializes a named root Compound, optionally enclosed in the legacy wrapper.
/// A root with an empty name is always wrapped: unwrapped, it would start with
/// `0A 00 00` and be read back as the wrapper itself.
pub fn encode_uncompressed(name: &[u8], tag: &Tag, wrap_legacy: bool) -> Result<Vec<u8>, NbtError> {
	if tag.id() != TagID::Compound {
		return Err(NbtError::UnexpectedRootTag(format!(
			"expected 0x{:02x} but found 0x{:02x}",
			TagID::Compound.value(),
			tag.id().value(),
		)));
	}
	let wrap_legacy = wrap_legacy || name.is_empty();
	let mut buffer = Vec::new();
	if wrap_legacy {
		buffer.write_ubyte(TagID::Compound.value())?;
		buffer.write_ushort(0)?;
	}
	write_named_tag(&mut buffer, name, tag)?;
	if wrap_legacy {
		buffer.write_ubyte(TagID::End.value())?;
	}
	trace!("Encoded NBT document of {} bytes.", buffer.len());
	Ok(buffer)
}

/// Writes tag id, name and payload.
pub fn write_named_tag<W: Write>(writer: &mut W, name: &[u8], tag: &Tag) -> Result<(), NbtError> {
	writer.write_ubyte(tag.id().value())?;
	writer.write_string(name)?;
	write_payload(writer, tag)
}

fn write_byte_array<W: Write>(writer: &mut W, array: &[i8]) -> Result<(), NbtError> {
	writer.write_length(array.len())?;
	let bytes: Vec<u8> = array.iter().map(|&byte| byte as u8).collect();
	writer.write_all(&bytes)?;
	Ok(())
}

fn write_int_array<W: Write>(writer: &mut W, array: &[i32]) -> Result<(), NbtError> {
	writer.write_length(array.len())?;
	for &value in array {
		writer.write_int(value)?;
	}
	Ok(())
}

fn write_compound<W: Write>(writer: &mut W, map: &Map) -> Result<(), NbtError> {
	for (name, tag) in map {
		write_named_tag(writer, name.as_bytes(), tag)?;
	}
	writer.write_ubyte(TagID::End.value())?;
	Ok(())
}

fn write_list<W: Write>(writer: &mut W, list: &ListTag) -> Result<(), NbtError> {
	writer.write_ubyte(list.element_id().value())?;
	writer.write_length(list.len())?;
	macro_rules! elements {
		($items:expr, |$writer:ident, $item:ident| $write:expr) => {
			for $item in $items {
				let $writer = &mut *writer;
				$write?;
			}
		};
	}
	match list {
		ListTag::Empty => (),
		ListTag::Byte(items) => elements!(items, |w, item| w.write_byte(*item)),
		ListTag::Short(items) => elements!(items, |w, item| w.write_short(*item)),
		ListTag::Int(items) => elements!(items, |w, item| w.write_int(*item)),
		ListTag::Long(items) => elements!(items, |w, item| w.write_long(*item)),
		ListTag::Float(items) => elements!(items, |w, item| w.write_float(*item)),
		ListTag::Double(items) => elements!(items, |w, item| w.write_double(*item)),
		ListTag::ByteArray(items) => elements!(items, |w, item| write_byte_array(w, item)),
		ListTag::String(items) => elements!(items, |w, item| w.write_string(item.as_bytes())),
		ListTag::List(items) => elements!(items, |w, item| write_list(w, item)),
		ListTag::Compound(items) => elements!(items, |w, item| write_compound(w, item)),
		ListTag::IntArray(items) => elements!(items, |w, item| write_int_array(w, item)),
	}
	Ok(())
}

/// Writes the payload of a tag, without its id or name.
pub fn write_payload<W: Write>(writer: &mut W, tag: &Tag) -> Result<(), NbtError> {
	match tag {
		Tag::Byte(value) => writer.write_byte(*value)?,
		Tag::Short(value) => writer.write_short(*value)?,
		Tag::Int(value) => writer.write_int(*value)?,
		Tag::Long(value) => writer.write_long(*value)?,
		Tag::Float(value) => writer.write_float(*value)?,
		Tag::Double(value) => writer.write_double(*value)?,
		Tag::ByteArray(array) => write_byte_array(writer, array)?,
		Tag::String(value) => writer.write_string(value.as_bytes())?,
		Tag::List(list) => write_list(writer, list)?,
		Tag::Compound(map) => write_compound(writer, map)?,
		Tag::IntArray(array) => write_int_array(writer, array)?,
	}
	Ok(())
}

/// Reads a whole NBT document from a reader.
pub trait ReadNbt: Read {
	fn read_nbt(&mut self) -> McResult<NamedTag> {
		let mut buffer = Vec::new();
		self.read_to_end(&mut buffer)?;
		decode(&buffer)
	}
}

impl<R: Read> ReadNbt for R {}

/// Writes an uncompressed NBT document to a writer.
pub trait WriteNbt: Write {
	fn write_nbt(&mut self, root: &NamedTag) -> Result<usize, NbtError> {
		let bytes = encode_uncompressed(root.name.as_bytes(), &root.tag, false)?;
		self.write_all(&bytes)?;
		Ok(bytes.len())
	}
}

impl<W: Write> WriteNbt for W {}
