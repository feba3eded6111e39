//! Error types for every stage of the conversion.

use {
	std::{collections::TryReserveError, io, path::PathBuf},
	thiserror::Error,
};

/// Failures while reading or decoding the NBT document.
#[derive(Debug, Error)]
pub enum LoadError {
	#[error("unable to read document")]
	Io(#[from] io::Error),

	/// The gzip stream is malformed.
	#[error("decompression failed: {0}")]
	Decompress(io::Error),

	#[error("corrupt document: {0}")]
	Corrupt(String),
}

impl LoadError {
	pub(crate) fn corrupt(msg: impl Into<String>) -> Self {
		Self::Corrupt(msg.into())
	}
}

/// The decoded tree does not have the shape of a map document.
///
/// Missing keys and wrongly typed keys are not told apart.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapError {
	#[error("invalid map file")]
	InvalidFormat,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaletteError {
	#[error("invalid mapping: {0}")]
	Unknown(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScaleError {
	#[error("invalid scale '{0}': expected a positive integer")]
	Invalid(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RasterError {
	#[error("output image too large: {width}x{height} map at scale {scale}")]
	TooLarge { width: u32, height: u32, scale: u32 },
}

/// Failures of the PNG encoder, tagged with the phase they happened in.
#[derive(Debug, Error)]
pub enum EncodeError {
	#[error("unable to create encoder for a {width}x{height} image")]
	Context { width: u32, height: u32 },

	#[error("error while writing header")]
	Header(#[source] png::EncodingError),

	#[error("unable to allocate memory for row pointers")]
	RowTable(#[source] TryReserveError),

	#[error("unable to allocate row pointer[{row}]")]
	Row {
		row: usize,
		#[source]
		source: TryReserveError,
	},

	#[error("error while writing image data")]
	ImageData(#[source] png::EncodingError),

	#[error("error while writing end")]
	End(#[source] png::EncodingError),
}

/// Everything [`crate::convert::run`] can fail with.
#[derive(Debug, Error)]
pub enum Error {
	#[error("error reading '{}'", .path.display())]
	Load {
		path: PathBuf,
		#[source]
		source: LoadError,
	},

	#[error(transparent)]
	Map(#[from] MapError),

	#[error(transparent)]
	Raster(#[from] RasterError),

	#[error("unable to open file '{}' for writing", .path.display())]
	Create {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	#[error("write(): {0}")]
	Encode(#[from] EncodeError),

	#[error("unable to write metadata to '{}': {reason}", .path.display())]
	Metadata { path: PathBuf, reason: String },
}

#[cfg(test)]
mod tests {
	use {super::*, std::error::Error as _};

	#[test]
	fn encodePhasesAreNamedInMessages() {
		let io = || png::EncodingError::from(io::Error::other("disk full"));
		assert_eq!(EncodeError::Header(io()).to_string(), "error while writing header");
		assert_eq!(EncodeError::ImageData(io()).to_string(), "error while writing image data");
		assert_eq!(EncodeError::End(io()).to_string(), "error while writing end");
		assert_eq!(
			Error::from(EncodeError::End(io())).to_string(),
			"write(): error while writing end"
		);
	}

	#[test]
	fn loadErrorKeepsPathAndSource() {
		let err = Error::Load {
			path: PathBuf::from("map_3.dat"),
			source: LoadError::Decompress(io::Error::new(io::ErrorKind::InvalidData, "corrupt deflate stream")),
		};
		assert_eq!(err.to_string(), "error reading 'map_3.dat'");
		let source = err.source().map(ToString::to_string).unwrap_or_default();
		assert!(source.contains("corrupt deflate stream"), "{source}");
	}

	#[test]
	fn mapErrorIsUndifferentiated() {
		assert_eq!(MapError::InvalidFormat.to_string(), "invalid map file");
		assert_eq!(Error::from(MapError::InvalidFormat).to_string(), "invalid map file");
	}
}
