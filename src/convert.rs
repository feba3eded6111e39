//! The whole pipeline: document → map record → pixel grid → PNG.

use {
	crate::{
		encode,
		error::Error,
		map::{MapMetadata, MapRecord},
		nbt::Document,
		palette::PaletteVersion,
		raster::{self, PixelGrid, Scale},
		stdoutRaw,
	},
	serde::{ser, Serialize},
	std::{
		fs::{self, File},
		io::{self, BufWriter, Write},
		path::{Path, PathBuf},
	},
};

/// Stands for standard input or output wherever a path is accepted.
pub const STDIO_PATH: &str = "-";

/// Everything one run needs to know. `None` paths mean standard input/output.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Conversion {
	pub input: Option<PathBuf>,
	pub scale: Scale,
	pub output: Option<PathBuf>,
	pub palette: PaletteVersion,
	/// Where to write a TOML summary of the map, if anywhere.
	pub metadata: Option<PathBuf>,
}

pub fn run(conversion: &Conversion) -> Result<(), Error> {
	let record = loadRecord(conversion.input.as_deref())?;
	let grid = raster::rasterize(&record, conversion.palette.colors(), conversion.scale)?;
	if let Some(path) = &conversion.metadata {
		writeMetadata(path, &Summary::new(&record, &grid, conversion))?;
	}
	encode::encodePng(&grid, openSink(conversion.output.as_deref())?)?;
	Ok(())
}

pub fn loadRecord(input: Option<&Path>) -> Result<MapRecord, Error> {
	let load = || match input {
		Some(path) => Document::open(path)?.decode(),
		None => Document::fromReader(io::stdin().lock())?.decode(),
	};
	let root = load().map_err(|source| Error::Load {
		path: input.map_or_else(|| PathBuf::from(STDIO_PATH), Path::to_path_buf),
		source,
	})?;
	tracing::debug!(name = %root.name, "decoded document");
	Ok(MapRecord::fromTree(&root.tag)?)
}

/// Buffered output to `path`, or to standard output for `None`.
pub fn openSink(path: Option<&Path>) -> Result<BufWriter<File>, Error> {
	let file = match path {
		Some(path) => File::create(path),
		None => stdoutRaw(),
	};
	file.map(BufWriter::new).map_err(|source| Error::Create {
		path: path.map_or_else(|| PathBuf::from(STDIO_PATH), Path::to_path_buf),
		source,
	})
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Dimensions {
	pub width: u32,
	pub height: u32,
}

/// What `--metadata` writes.
#[derive(Debug, Serialize)]
pub struct Summary<'a> {
	pub scale: u32,
	pub palette: &'static str,
	pub map: Dimensions,
	pub image: Dimensions,
	pub metadata: &'a MapMetadata,
}

impl<'a> Summary<'a> {
	pub fn new(record: &'a MapRecord, grid: &PixelGrid, conversion: &Conversion) -> Self {
		Self {
			scale: conversion.scale.get(),
			palette: conversion.palette.name(),
			map: Dimensions { width: record.width().unsigned_abs().into(), height: record.height().unsigned_abs().into() },
			image: Dimensions { width: grid.width(), height: grid.height() },
			metadata: record.metadata(),
		}
	}
}

pub fn toml_toStringPretty<T: ?Sized + ser::Serialize>(value: &T) -> Result<String, toml::ser::Error> {
	let mut string = String::with_capacity(128);
	value.serialize((&mut toml::ser::Serializer::pretty(&mut string)).pretty_array(false))?;
	Ok(string)
}

fn writeMetadata(path: &Path, summary: &Summary<'_>) -> Result<(), Error> {
	let failed = |reason: String| Error::Metadata { path: path.to_path_buf(), reason };
	let toml = toml_toStringPretty(summary).map_err(|err| failed(err.to_string()))?;
	let written = if path == Path::new(STDIO_PATH) { io::stderr().write_all(toml.as_bytes()) } else { fs::write(path, toml) };
	written.map_err(|err| failed(err.to_string()))
}

#[cfg(test)]
mod tests {
	use {super::*, crate::Rgba};

	#[test]
	fn defaultsMatchTheCommandLine() {
		let conversion = Conversion::default();
		assert_eq!(conversion.scale.get(), 4);
		assert_eq!(conversion.palette, PaletteVersion::Original);
		assert!(conversion.input.is_none() && conversion.output.is_none());
	}

	#[test]
	fn summaryAsToml() {
		let record = MapRecord::new(2, 1, vec![4, 255]).unwrap().withMetadata(MapMetadata {
			scale: Some(0),
			xCenter: Some(-128),
			..MapMetadata::default()
		});
		let grid = PixelGrid::new(4, 2, vec![Rgba::TRANSPARENT; 8]).unwrap();
		let conversion = Conversion { scale: Scale::new(2).unwrap(), palette: PaletteVersion::V1_12, ..Conversion::default() };
		let toml = toml_toStringPretty(&Summary::new(&record, &grid, &conversion)).unwrap();
		let value: toml::Value = toml.parse().unwrap();
		assert_eq!(value["scale"].as_integer(), Some(2));
		assert_eq!(value["palette"].as_str(), Some("1.12"));
		assert_eq!(value["map"]["width"].as_integer(), Some(2));
		assert_eq!(value["image"]["height"].as_integer(), Some(2));
		assert_eq!(value["metadata"]["xCenter"].as_integer(), Some(-128));
		assert!(value["metadata"].get("zCenter").is_none());
	}

	#[test]
	fn missingInputIsLoadError() {
		let err = loadRecord(Some(Path::new("/nonexistent/map_0.dat"))).unwrap_err();
		assert!(matches!(&err, Error::Load { path, .. } if path == Path::new("/nonexistent/map_0.dat")));
	}

	#[test]
	fn unwritableOutputIsCreateError() {
		assert!(matches!(openSink(Some(Path::new("/nonexistent/dir/map.png"))), Err(Error::Create { .. })));
	}
}
