//! Compression is an outside concern of the NBT codec. The codec talks to it
//! through [Decompressor] and [Compressor]; [GzipCodec] is the stock
//! implementation, backed by `flate2`.

use std::{
	io::{Read, Write},
	sync::{
		Arc,
		atomic::{AtomicBool, Ordering},
	},
};

use flate2::{
	Compression,
	read::GzDecoder,
	write::GzEncoder,
};
use log::debug;

use crate::{McError, McResult};

/// Every gzip stream starts with these two bytes.
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Receives a completion percentage (0 to 100) and a short message.
pub type ProgressFn<'a> = &'a mut dyn FnMut(u8, &str);

pub fn is_gzip(bytes: &[u8]) -> bool {
	bytes.starts_with(&GZIP_MAGIC)
}

/// A cancellation flag that can be handed to another thread.
/// Cancellation is only observed between slices, so it is best-effort.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn cancel(&self) {
		self.0.store(true, Ordering::Relaxed);
	}

	pub fn is_cancelled(&self) -> bool {
		self.0.load(Ordering::Relaxed)
	}
}

pub trait Decompressor {
	/// Decompresses a whole stream.
	/// Fails with [McError::IntegrityError] if the stream is corrupt or its
	/// checksum/length trailer doesn't match, and with [McError::Cancelled]
	/// if `cancel` fires before the end. Partial output is never returned.
	fn decompress(&self, bytes: &[u8], progress: Option<ProgressFn<'_>>, cancel: Option<&CancelToken>) -> McResult<Vec<u8>>;
}

pub trait Compressor {
	fn compress(&self, bytes: &[u8], progress: Option<ProgressFn<'_>>) -> McResult<Vec<u8>>;
}

#[derive(Debug, Clone, Copy)]
pub struct GzipCodec {
	pub level: Compression,
	/// Number of bytes processed between progress reports and cancellation checks.
	pub slice_size: usize,
}

impl GzipCodec {
	pub const DEFAULT_SLICE_SIZE: usize = 64 * 1024;

	pub fn new(level: Compression) -> Self {
		Self {
			level,
			slice_size: Self::DEFAULT_SLICE_SIZE,
		}
	}

	pub fn with_slice_size(mut self, slice_size: usize) -> Self {
		self.slice_size = slice_size.max(1);
		self
	}
}

impl Default for GzipCodec {
	fn default() -> Self {
		Self::new(Compression::default())
	}
}

fn percentage(done: usize, total: usize) -> u8 {
	if total == 0 {
		return 100;
	}
	((done as u128 * 100) / total as u128).min(100) as u8
}

impl Decompressor for GzipCodec {
	fn decompress(&self, bytes: &[u8], mut progress: Option<ProgressFn<'_>>, cancel: Option<&CancelToken>) -> McResult<Vec<u8>> {
		let slice_size = self.slice_size.max(1) as u64;
		let mut decoder = GzDecoder::new(bytes);
		let mut output = Vec::new();
		loop {
			if cancel.map_or(false, CancelToken::is_cancelled) {
				debug!("Decompression cancelled after {} bytes.", output.len());
				return Err(McError::Cancelled);
			}
			let read = (&mut decoder)
				.take(slice_size)
				.read_to_end(&mut output)
				.map_err(|err| McError::IntegrityError(err.to_string()))?;
			if read == 0 {
				break;
			}
			if let Some(progress) = progress.as_mut() {
				// The decoder's input slice shrinks as it consumes the stream.
				let consumed = bytes.len() - decoder.get_ref().len();
				progress(percentage(consumed, bytes.len()), "Inflating GZIP data...");
			}
		}
		if let Some(progress) = progress.as_mut() {
			progress(100, "Inflating GZIP data...");
		}
		debug!("Inflated {} bytes into {} bytes.", bytes.len(), output.len());
		Ok(output)
	}
}

impl Compressor for GzipCodec {
	fn compress(&self, bytes: &[u8], mut progress: Option<ProgressFn<'_>>) -> McResult<Vec<u8>> {
		let mut encoder = GzEncoder::new(Vec::new(), self.level);
		let mut done = 0;
		for slice in bytes.chunks(self.slice_size.max(1)) {
			encoder.write_all(slice)?;
			done += slice.len();
			if let Some(progress) = progress.as_mut() {
				progress(percentage(done, bytes.len()), "Deflating GZIP data...");
			}
		}
		let output = encoder.finish()?;
		debug!("Deflated {} bytes into {} bytes.", bytes.len(), output.len());
		Ok(output)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn payload() -> Vec<u8> {
		(0..200_000u32).map(|i| (i % 251) as u8).collect()
	}

	#[test]
	fn gzip_round_trip() {
		let codec = GzipCodec::default().with_slice_size(4096);
		let compressed = codec.compress(&payload(), None).unwrap();
		assert!(is_gzip(&compressed));
		let inflated = codec.decompress(&compressed, None, None).unwrap();
		assert_eq!(inflated, payload());
	}

	#[test]
	fn progress_is_reported() {
		let codec = GzipCodec::default().with_slice_size(4096);
		let mut reports = Vec::new();
		let mut record = |percent: u8, _: &str| reports.push(percent);
		let compressed = codec.compress(&payload(), Some(&mut record)).unwrap();
		assert_eq!(reports.last(), Some(&100));

		let mut reports = Vec::new();
		let mut record = |percent: u8, message: &str| {
			assert!(message.contains("Inflating"));
			reports.push(percent);
		};
		codec.decompress(&compressed, Some(&mut record), None).unwrap();
		assert!(reports.len() > 1);
		assert!(reports.windows(2).all(|pair| pair[0] <= pair[1]));
		assert_eq!(reports.last(), Some(&100));
	}

	#[test]
	fn bad_checksum_is_an_integrity_error() {
		let codec = GzipCodec::default();
		let mut compressed = codec.compress(&payload(), None).unwrap();
		// trailer is CRC32 then ISIZE, 4 bytes each
		let crc = compressed.len() - 8;
		compressed[crc] ^= 0xff;
		let err = codec.decompress(&compressed, None, None).unwrap_err();
		assert!(matches!(err, McError::IntegrityError(_)));
	}

	#[test]
	fn bad_length_is_an_integrity_error() {
		let codec = GzipCodec::default();
		let mut compressed = codec.compress(&payload(), None).unwrap();
		let size = compressed.len() - 4;
		compressed[size] ^= 0x01;
		let err = codec.decompress(&compressed, None, None).unwrap_err();
		assert!(matches!(err, McError::IntegrityError(_)));
	}

	#[test]
	fn cancelled_token_stops_decompression() {
		let codec = GzipCodec::default().with_slice_size(1024);
		let compressed = codec.compress(&payload(), None).unwrap();
		let token = CancelToken::new();
		token.cancel();
		let err = codec.decompress(&compressed, None, Some(&token)).unwrap_err();
		assert!(matches!(err, McError::Cancelled));
	}

	#[test]
	fn cancel_between_slices() {
		let codec = GzipCodec::default().with_slice_size(1024);
		let compressed = codec.compress(&payload(), None).unwrap();
		let token = CancelToken::new();
		let remote = token.clone();
		let mut cancel_on_first = |_: u8, _: &str| remote.cancel();
		let err = codec.decompress(&compressed, Some(&mut cancel_on_first), Some(&token)).unwrap_err();
		assert!(matches!(err, McError::Cancelled));
	}
}
