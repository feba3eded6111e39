#![warn(clippy::pedantic, elided_lifetimes_in_paths, explicit_outlives_requirements)]
#![allow(non_snake_case)]

//! Renders `Map_X.dat` overview maps (gzip'd NBT documents) into RGBA PNG images.

pub mod convert;
pub mod encode;
pub mod error;
pub mod map;
pub mod nbt;
pub mod palette;
pub mod raster;

pub use {
	convert::Conversion,
	error::{EncodeError, Error, LoadError, MapError, PaletteError, RasterError, ScaleError},
	map::{MapMetadata, MapRecord},
	palette::PaletteVersion,
	raster::{PixelGrid, Scale},
};

pub const RGBA_SIZE: usize = 4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba {
	pub red: u8,
	pub green: u8,
	pub blue: u8,
	pub alpha: u8,
}

impl Rgba {
	pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

	/// Stands in for palette indices the selected table has no entry for.
	pub const UNKNOWN: Self = Self::new(255, 0, 255, 255);

	#[inline]
	pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
		Self { red, green, blue, alpha }
	}

	#[inline]
	pub const fn toArray(self) -> [u8; RGBA_SIZE] {
		[self.red, self.green, self.blue, self.alpha]
	}
}

use std::{fs::File, io};

/// Unbuffered handle to standard output, independent of `io::stdout()`'s line buffering.
/// Dropping it closes only the duplicated descriptor.
#[cfg(unix)]
pub fn stdoutRaw() -> io::Result<File> {
	use std::os::fd::AsFd;
	Ok(File::from(io::stdout().as_fd().try_clone_to_owned()?))
}

#[cfg(windows)]
pub fn stdoutRaw() -> io::Result<File> {
	use std::os::windows::io::AsHandle;
	Ok(File::from(io::stdout().as_handle().try_clone_to_owned()?))
}
