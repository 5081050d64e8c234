use thiserror::Error;

use crate::nbt::{NbtError, tag::TagID};

/// The master error type.
#[derive(Debug, Error)]
pub enum McError {
	#[error("IO Error: {0}")]
	IoError(#[from] std::io::Error),
	#[error("NBT Error: {0}")]
	Nbt(#[from] NbtError),
	#[error("Coordinate ({0}, {1}, {2}) is out of bounds.")]
	OutOfBounds(i64, i64, i64),
	#[error("Block ID must be from 0 to 255, got {0}.")]
	InvalidBlockId(i32),
	#[error("Block metadata must be from 0 to 15, got {0}.")]
	InvalidMetadata(i32),
	#[error("Rotation must be 90, 180 or 270 degrees, got {0}.")]
	InvalidRotationAmount(i32),
	#[error("Integrity check failed: {0}")]
	IntegrityError(String),
	#[error("Operation was cancelled.")]
	Cancelled,
	#[error("Tag was not found in Compound.\n\"{0}\"")]
	NotFoundInCompound(String),
	#[error("Tag \"{name}\" has type {found:?}, expected {expected:?}.")]
	WrongFieldType {
		name: String,
		expected: TagID,
		found: TagID,
	},
	#[error("\"{name}\" holds {found} entries but the volume is {expected}.")]
	VolumeMismatch {
		name: String,
		expected: usize,
		found: usize,
	},
}

impl McError {

	/// Checks that `value` lies within `range`, producing `error(value)` otherwise.
	pub fn range_check<T, R, F>(value: T, range: R, error: F) -> Result<(),McError>
	where
	T: PartialOrd + Copy,
	R: std::ops::RangeBounds<T>,
	F: FnOnce(T) -> McError {
		if range.contains(&value) {
			Ok(())
		} else {
			Err(error(value))
		}
	}
}

pub type McResult<T> = Result<T,McError>;
