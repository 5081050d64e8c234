pub mod nbt;
pub mod world;
pub mod ioext;
pub mod error;
pub mod math;
pub mod compression;

pub use flate2;

pub use error::McError;
pub use error::McResult;

pub use nbt::{
	Map,
	NbtError,
	tag::{Tag, TagID, ListTag, NamedTag, NbtString},
	io::{decode, decode_with, encode, encode_with, DecodeOptions, EncodeOptions},
};
pub use world::{
	schematic::Schematic,
	rotate::Rotation,
};
pub use compression::{CancelToken, Compressor, Decompressor, GzipCodec};
