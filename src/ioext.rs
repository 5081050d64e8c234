//! Big-endian primitives shared by the NBT reader and writer.

use std::io::{
	self,
	Write,
};

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};

use crate::nbt::NbtError;

/// A sequential reader over an in-memory buffer.
/// The position is explicit and owned by whoever holds the cursor,
/// so every decode call works on its own cursor.
#[derive(Debug, Clone)]
pub struct BinaryCursor<'a> {
	data: &'a [u8],
	position: usize,
}

macro_rules! fixed_width_reads {
	($($(#[$attr:meta])* $name:ident -> $type:ty = $width:literal, $convert:path;)+) => {
		$(
			$(#[$attr])*
			pub fn $name(&mut self, peek: bool) -> Result<$type, NbtError> {
				let buffer = self.read_buffer($width, peek)?;
				Ok($convert(buffer))
			}
		)+
	};
}

impl<'a> BinaryCursor<'a> {
	pub fn new(data: &'a [u8]) -> Self {
		Self {
			data,
			position: 0,
		}
	}

	#[inline(always)]
	pub fn position(&self) -> usize {
		self.position
	}

	#[inline(always)]
	pub fn remaining(&self) -> usize {
		self.data.len() - self.position
	}

	#[inline(always)]
	pub fn is_empty(&self) -> bool {
		self.remaining() == 0
	}

	/// Returns the next `length` bytes, advancing past them unless `peek` is set.
	/// A zero length request is valid and yields an empty slice.
	pub fn read_buffer(&mut self, length: usize, peek: bool) -> Result<&'a [u8], NbtError> {
		if length == 0 {
			return Ok(&[]);
		}
		if length > self.remaining() {
			return Err(NbtError::TruncatedData {
				position: self.position,
				requested: length,
				available: self.remaining(),
			});
		}
		let data = self.data;
		let buffer = &data[self.position..self.position + length];
		if !peek {
			self.position += length;
		}
		Ok(buffer)
	}

	/// Advances the position without looking at the bytes.
	pub fn skip(&mut self, length: usize) -> Result<(), NbtError> {
		self.read_buffer(length, false).map(|_| ())
	}

	pub fn read_byte(&mut self, peek: bool) -> Result<i8, NbtError> {
		let buffer = self.read_buffer(1, peek)?;
		Ok(buffer[0] as i8)
	}

	pub fn read_ubyte(&mut self, peek: bool) -> Result<u8, NbtError> {
		let buffer = self.read_buffer(1, peek)?;
		Ok(buffer[0])
	}

	fixed_width_reads!{
		read_short -> i16 = 2, BigEndian::read_i16;
		/// Used for string length prefixes.
		read_ushort -> u16 = 2, BigEndian::read_u16;
		read_int -> i32 = 4, BigEndian::read_i32;
		read_long -> i64 = 8, BigEndian::read_i64;
		read_float -> f32 = 4, BigEndian::read_f32;
		read_double -> f64 = 8, BigEndian::read_f64;
	}

	/// Reads a `u16` length prefix followed by that many raw bytes.
	/// The bytes are returned as-is; no text decoding takes place.
	pub fn read_string(&mut self) -> Result<&'a [u8], NbtError> {
		let length = self.read_ushort(false)? as usize;
		self.read_buffer(length, false)
	}
}

/// Writing counterpart of [BinaryCursor]. Implemented for every writer.
pub trait WriteExt: Write {
	fn write_byte(&mut self, value: i8) -> io::Result<()> {
		self.write_i8(value)
	}

	fn write_ubyte(&mut self, value: u8) -> io::Result<()> {
		self.write_u8(value)
	}

	fn write_short(&mut self, value: i16) -> io::Result<()> {
		self.write_i16::<BigEndian>(value)
	}

	fn write_ushort(&mut self, value: u16) -> io::Result<()> {
		self.write_u16::<BigEndian>(value)
	}

	fn write_int(&mut self, value: i32) -> io::Result<()> {
		self.write_i32::<BigEndian>(value)
	}

	fn write_long(&mut self, value: i64) -> io::Result<()> {
		self.write_i64::<BigEndian>(value)
	}

	fn write_float(&mut self, value: f32) -> io::Result<()> {
		self.write_f32::<BigEndian>(value)
	}

	fn write_double(&mut self, value: f64) -> io::Result<()> {
		self.write_f64::<BigEndian>(value)
	}

	/// Writes a `u16` length prefix and the raw bytes.
	fn write_string(&mut self, bytes: &[u8]) -> Result<(), NbtError> {
		let length = u16::try_from(bytes.len())
			.map_err(|_| NbtError::LengthOverflow(bytes.len()))?;
		self.write_ushort(length)?;
		self.write_all(bytes)?;
		Ok(())
	}

	/// Writes an `i32` element count, used by arrays and lists.
	fn write_length(&mut self, length: usize) -> Result<(), NbtError> {
		let length = i32::try_from(length)
			.map_err(|_| NbtError::LengthOverflow(length))?;
		self.write_int(length)?;
		Ok(())
	}
}

impl<W: Write + ?Sized> WriteExt for W {}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn read_widths_test() {
		let data = [
			0x7f,
			0x01, 0x02,
			0x00, 0x00, 0x01, 0x00,
			0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe,
			0x3f, 0x80, 0x00, 0x00,
			0x40, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
		];
		let mut cursor = BinaryCursor::new(&data);
		assert_eq!(cursor.read_byte(false).unwrap(), 127);
		assert_eq!(cursor.read_short(false).unwrap(), 0x0102);
		assert_eq!(cursor.read_int(false).unwrap(), 256);
		assert_eq!(cursor.read_long(false).unwrap(), -2);
		assert_eq!(cursor.read_float(false).unwrap(), 1.0);
		assert_eq!(cursor.read_double(false).unwrap(), 2.0);
		assert!(cursor.is_empty());
	}

	#[test]
	fn peek_does_not_advance() {
		let data = [0x00, 0x00, 0x0a];
		let mut cursor = BinaryCursor::new(&data);
		assert_eq!(cursor.read_short(true).unwrap(), 0);
		assert_eq!(cursor.position(), 0);
		assert_eq!(cursor.read_short(false).unwrap(), 0);
		assert_eq!(cursor.position(), 2);
		assert_eq!(cursor.read_byte(true).unwrap(), 10);
		assert_eq!(cursor.remaining(), 1);
	}

	#[test]
	fn truncated_read_fails() {
		let data = [0x00, 0x01];
		let mut cursor = BinaryCursor::new(&data);
		cursor.skip(1).unwrap();
		let err = cursor.read_int(false).unwrap_err();
		match err {
			NbtError::TruncatedData { position, requested, available } => {
				assert_eq!((position, requested, available), (1, 4, 1));
			}
			other => panic!("unexpected error: {other}"),
		}
		// a failed read leaves the position untouched
		assert_eq!(cursor.position(), 1);
	}

	#[test]
	fn zero_length_string() {
		let data = [0x00, 0x00];
		let mut cursor = BinaryCursor::new(&data);
		assert_eq!(cursor.read_string().unwrap(), b"");
		assert!(cursor.is_empty());
		// zero length reads are fine even at the end of the buffer
		assert_eq!(cursor.read_buffer(0, false).unwrap(), b"");
	}

	#[test]
	fn write_mirrors_read() {
		let mut buffer = Vec::new();
		buffer.write_byte(-1).unwrap();
		buffer.write_short(-300).unwrap();
		WriteExt::write_int(&mut buffer, 70000).unwrap();
		buffer.write_long(i64::MIN).unwrap();
		buffer.write_float(-0.5).unwrap();
		buffer.write_double(1e100).unwrap();
		buffer.write_string(b"sign").unwrap();
		let mut cursor = BinaryCursor::new(&buffer);
		assert_eq!(cursor.read_byte(false).unwrap(), -1);
		assert_eq!(cursor.read_short(false).unwrap(), -300);
		assert_eq!(cursor.read_int(false).unwrap(), 70000);
		assert_eq!(cursor.read_long(false).unwrap(), i64::MIN);
		assert_eq!(cursor.read_float(false).unwrap(), -0.5);
		assert_eq!(cursor.read_double(false).unwrap(), 1e100);
		assert_eq!(cursor.read_string().unwrap(), b"sign");
	}

	#[test]
	fn oversized_string_is_rejected() {
		let long = vec![b'a'; u16::MAX as usize + 1];
		let mut buffer = Vec::new();
		let err = buffer.write_string(&long).unwrap_err();
		assert!(matches!(err, NbtError::LengthOverflow(65536)));
		assert!(buffer.is_empty());
	}
}
