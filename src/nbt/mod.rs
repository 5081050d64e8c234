pub mod tag;
pub mod tagtype;
pub mod io;
pub mod macros;

use thiserror::Error;

use tag::NbtString;

/// Compound storage. Keys are unique and keep their insertion order,
/// which the encoder relies on to reproduce the decoded byte layout.
pub type MapType<T> = indexmap::IndexMap<NbtString, T>;
pub type Map = MapType<tag::Tag>;

/// Maximum number of nested List/Compound levels the decoder will follow.
pub const MAX_DEPTH: usize = 512;

#[derive(Debug, Error)]
pub enum NbtError {
	#[error("Unexpectedly reached end of NBT data. Tried reading {requested} bytes at position {position} (0x{position:x}) with {available} remaining.")]
	TruncatedData {
		position: usize,
		requested: usize,
		available: usize,
	},
	#[error("Unknown tag type 0x{id:02x} encountered at position {offset} (0x{offset:x}).")]
	UnknownTagType {
		id: u8,
		offset: usize,
	},
	#[error("Unexpected root tag: {0}")]
	UnexpectedRootTag(String),
	#[error("Negative length {0} for array or list.")]
	NegativeLength(i32),
	#[error("NBT data is nested deeper than {0} levels.")]
	NestingTooDeep(usize),
	#[error("Length {0} does not fit its NBT length prefix.")]
	LengthOverflow(usize),
	#[error("IO Error: {0}")]
	IoError(#[from] std::io::Error),
}
