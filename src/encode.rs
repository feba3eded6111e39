//! PNG output.
//!
//! Encoding runs as a fixed ladder of steps: validate the image and bind the sink, write the
//! header, allocate one buffer per row, fill the rows, stream them, write the end chunk. Every
//! resource is owned by a local, so whichever step fails, the ones acquired before it are dropped
//! in reverse order (row buffers, row table, png writer, then the sink) exactly once.

use {
	crate::{error::EncodeError, raster::PixelGrid, RGBA_SIZE},
	png::{BitDepth, ColorType, Compression},
	std::{collections::TryReserveError, io::Write},
};

pub const BIT_DEPTH: BitDepth = BitDepth::Eight;
pub const COLOR_TYPE: ColorType = ColorType::Rgba;

/// Largest width or height a PNG header can carry.
pub const MAX_DIMENSION: u32 = i32::MAX as u32;

/// Bytes per row of unfiltered image data, as the png crate expects them.
pub fn rowStride(width: u32) -> Option<usize> {
	let bits = (width as usize).checked_mul(COLOR_TYPE.samples())?.checked_mul(BIT_DEPTH as usize)?;
	Some(bits.div_ceil(8))
}

/// Allocates a zeroed row buffer without aborting on allocation failure.
pub fn allocRow(stride: usize) -> Result<Box<[u8]>, TryReserveError> {
	let mut row = Vec::new();
	row.try_reserve_exact(stride)?;
	row.resize(stride, 0);
	Ok(row.into_boxed_slice())
}

/// One buffer per image row. Slots stay `None` until their row is allocated, so a table that
/// failed halfway through still drops cleanly.
#[derive(Debug)]
pub struct RowTable {
	rows: Vec<Option<Box<[u8]>>>,
	stride: usize,
}

impl RowTable {
	pub fn allocate(
		height: usize,
		stride: usize,
		mut alloc: impl FnMut(usize) -> Result<Box<[u8]>, TryReserveError>,
	) -> Result<Self, EncodeError> {
		let mut rows = Vec::new();
		rows.try_reserve_exact(height).map_err(EncodeError::RowTable)?;
		rows.resize_with(height, || None);
		let mut table = Self { rows, stride };
		for (y, slot) in table.rows.iter_mut().enumerate() {
			match alloc(stride) {
				Ok(row) => *slot = Some(row),
				Err(source) => {
					tracing::debug!(row = y, "row allocation failed, releasing {y} allocated rows");
					return Err(EncodeError::Row { row: y, source });
				}
			}
		}
		Ok(table)
	}

	#[inline]
	pub fn stride(&self) -> usize {
		self.stride
	}

	pub fn allocatedRows(&self) -> usize {
		self.rows.iter().flatten().count()
	}

	pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
		self.rows.iter().flatten().map(AsRef::as_ref)
	}

	/// Copies every pixel as `R, G, B, A` at byte offset `x * 4` of its row.
	pub fn fill(&mut self, grid: &PixelGrid) {
		for (y, row) in self.rows.iter_mut().enumerate() {
			let Some(row) = row else { continue };
			for (bytes, pixel) in row.chunks_exact_mut(RGBA_SIZE).zip(grid.row(y)) {
				bytes.copy_from_slice(&pixel.toArray());
			}
		}
	}
}

pub fn encodePng<W: Write>(grid: &PixelGrid, sink: W) -> Result<(), EncodeError> {
	encodePngWith(grid, sink, allocRow)
}

/// [`encodePng`] with a custom row allocator.
pub fn encodePngWith<W: Write>(
	grid: &PixelGrid,
	mut sink: W,
	alloc: impl FnMut(usize) -> Result<Box<[u8]>, TryReserveError>,
) -> Result<(), EncodeError> {
	let (width, height) = (grid.width(), grid.height());
	let dimensions = 1..=MAX_DIMENSION;
	let stride = match rowStride(width) {
		Some(stride) if dimensions.contains(&width) && dimensions.contains(&height) => stride,
		_ => return Err(EncodeError::Context { width, height }),
	};

	let mut encoder = png::Encoder::new(&mut sink, width, height);
	encoder.set_color(COLOR_TYPE);
	encoder.set_depth(BIT_DEPTH);
	encoder.set_compression(Compression::Default);
	let mut writer = encoder.write_header().map_err(EncodeError::Header)?;

	let mut rows = RowTable::allocate(height as usize, stride, alloc)?;
	rows.fill(grid);
	writeImageData(&mut writer, &rows).map_err(EncodeError::ImageData)?;
	drop(rows);

	writer.finish().map_err(EncodeError::End)?;
	sink.flush().map_err(|err| EncodeError::End(err.into()))?;
	tracing::debug!(width, height, "wrote png");
	Ok(())
}

fn writeImageData<W: Write>(writer: &mut png::Writer<W>, rows: &RowTable) -> Result<(), png::EncodingError> {
	let mut stream = writer.stream_writer()?;
	for row in rows.rows() {
		stream.write_all(row)?;
	}
	stream.finish()
}
