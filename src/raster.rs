//! Palette lookup and nearest-neighbor upscaling.

use {
	crate::{
		error::{RasterError, ScaleError},
		map::MapRecord,
		Rgba,
	},
	core::{fmt, num::NonZeroU32, str::FromStr},
};

/// Integer replication factor; every map cell becomes a `scale`×`scale` block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Scale(NonZeroU32);

impl Scale {
	pub const ONE: Self = Self(NonZeroU32::MIN);

	pub fn new(factor: u32) -> Option<Self> {
		NonZeroU32::new(factor).map(Self)
	}

	#[inline]
	pub fn get(self) -> u32 {
		self.0.get()
	}
}

impl Default for Scale {
	fn default() -> Self {
		Self(NonZeroU32::new(4).unwrap_or(NonZeroU32::MIN))
	}
}

impl FromStr for Scale {
	type Err = ScaleError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		s.trim().parse::<u32>().ok().and_then(Self::new).ok_or_else(|| ScaleError::Invalid(s.to_owned()))
	}
}

impl fmt::Display for Scale {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(&self.0, f)
	}
}

/// A fully materialized RGBA image, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelGrid {
	width: u32,
	height: u32,
	pixels: Vec<Rgba>,
}

impl PixelGrid {
	/// Returns `None` unless `pixels.len() == width * height`.
	pub fn new(width: u32, height: u32, pixels: Vec<Rgba>) -> Option<Self> {
		(pixels.len() as u64 == u64::from(width) * u64::from(height)).then_some(Self { width, height, pixels })
	}

	#[inline]
	pub fn width(&self) -> u32 {
		self.width
	}

	#[inline]
	pub fn height(&self) -> u32 {
		self.height
	}

	#[inline]
	pub fn pixels(&self) -> &[Rgba] {
		&self.pixels
	}

	pub fn row(&self, y: usize) -> &[Rgba] {
		let width = self.width as usize;
		&self.pixels[y * width..][..width]
	}

	#[inline]
	pub fn pixel(&self, x: usize, y: usize) -> Rgba {
		self.pixels[y * self.width as usize + x]
	}
}

/// Palette entry for `index`, or [`Rgba::UNKNOWN`] (with a warning) when the table is too short.
pub fn lookup(palette: &[Rgba], index: u8) -> Rgba {
	palette.get(index as usize).copied().unwrap_or_else(|| {
		tracing::warn!(index, "unknown color");
		Rgba::UNKNOWN
	})
}

pub fn rasterize(record: &MapRecord, palette: &[Rgba], scale: Scale) -> Result<PixelGrid, RasterError> {
	let (mapWidth, mapHeight) = (record.width().unsigned_abs() as usize, record.height().unsigned_abs() as usize);
	let tooLarge = || RasterError::TooLarge { width: mapWidth as _, height: mapHeight as _, scale: scale.get() };
	let [width, height] =
		[mapWidth, mapHeight].map(|dimension| u32::try_from(dimension).ok().and_then(|d| d.checked_mul(scale.get())));
	let (Some(width), Some(height)) = (width, height) else {
		return Err(tooLarge());
	};
	let len = (width as usize).checked_mul(height as usize).ok_or_else(tooLarge)?;
	let mut pixels = Vec::new();
	pixels.try_reserve_exact(len).map_err(|_| tooLarge())?;

	let factor = scale.get() as usize;
	let scaledRow = &mut Vec::with_capacity(width as usize);
	for y in 0..mapHeight {
		scaledRow.clear();
		for x in 0..mapWidth {
			let color = lookup(palette, record.cell(x, y));
			scaledRow.extend((0..factor).map(|_| color));
		}
		for _ in 0..factor {
			pixels.extend_from_slice(scaledRow);
		}
	}
	debug_assert_eq!(pixels.len(), len);
	tracing::debug!(width, height, scale = factor, "rasterized map");
	Ok(PixelGrid { width, height, pixels })
}
