//! Pulls the map record out of a decoded document.

use {
	crate::{
		error::MapError,
		nbt::{Compound, Tag},
	},
	serde::Serialize,
};

/// Width, height and palette indices of a map, validated so that
/// `cells.len() == width * height` and both dimensions are positive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapRecord {
	width: i16,
	height: i16,
	cells: Vec<u8>,
	metadata: MapMetadata,
}

/// Descriptive fields found next to the pixel data. None of them is required.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MapMetadata {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub scale: Option<i8>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub dimension: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub xCenter: Option<i32>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub zCenter: Option<i32>,
}

impl MapRecord {
	pub fn new(width: i16, height: i16, cells: Vec<u8>) -> Result<Self, MapError> {
		if width <= 0 || height <= 0 {
			tracing::debug!(width, height, "map dimensions must be positive");
			return Err(MapError::InvalidFormat);
		}
		let expected = width as usize * height as usize;
		if cells.len() != expected {
			tracing::debug!(expected, actual = cells.len(), "colors length does not match width * height");
			return Err(MapError::InvalidFormat);
		}
		Ok(Self { width, height, cells, metadata: MapMetadata::default() })
	}

	#[must_use]
	pub fn withMetadata(self, metadata: MapMetadata) -> Self {
		Self { metadata, ..self }
	}

	/// Expects `root` to be `{data: {width: short, height: short, colors: byte[]}}`.
	pub fn fromTree(root: &Tag) -> Result<Self, MapError> {
		let data = match root.asCompound().map(|root| field(root, "data")).transpose()? {
			Some(Tag::Compound(data)) => data,
			_ => return Err(invalid("root or 'data' is not a compound")),
		};
		let (Tag::Short(height), Tag::Short(width), Tag::ByteArray(colors)) =
			(field(data, "height")?, field(data, "width")?, field(data, "colors")?)
		else {
			return Err(invalid("'width', 'height' or 'colors' has the wrong type"));
		};
		Ok(Self::new(*width, *height, colors.clone())?.withMetadata(MapMetadata::fromCompound(data)))
	}

	#[inline]
	pub fn width(&self) -> i16 {
		self.width
	}

	#[inline]
	pub fn height(&self) -> i16 {
		self.height
	}

	#[inline]
	pub fn cells(&self) -> &[u8] {
		&self.cells
	}

	#[inline]
	pub fn metadata(&self) -> &MapMetadata {
		&self.metadata
	}

	/// Palette index at column `x` of row `y`.
	#[inline]
	pub fn cell(&self, x: usize, y: usize) -> u8 {
		self.cells[y * self.width as usize + x]
	}
}

impl MapMetadata {
	fn fromCompound(data: &Compound) -> Self {
		let int = |key| match data.get(key) {
			Some(&Tag::Int(value)) => Some(value),
			_ => None,
		};
		Self {
			scale: match data.get("scale") {
				Some(&Tag::Byte(scale)) => Some(scale),
				_ => None,
			},
			dimension: match data.get("dimension") {
				Some(Tag::Byte(dimension)) => Some(dimension.to_string()),
				Some(Tag::Int(dimension)) => Some(dimension.to_string()),
				Some(Tag::String(dimension)) => Some(dimension.clone()),
				_ => None,
			},
			xCenter: int("xCenter"),
			zCenter: int("zCenter"),
		}
	}
}

fn field<'a>(compound: &'a Compound, key: &str) -> Result<&'a Tag, MapError> {
	compound.get(key).ok_or_else(|| invalid(&format!("missing '{key}'")))
}

fn invalid(reason: &str) -> MapError {
	tracing::debug!(reason, "not a map document");
	MapError::InvalidFormat
}
