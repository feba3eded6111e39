#![allow(non_snake_case)]

use {
	byteorder::{WriteBytesExt, BE},
	flate2::{write::GzEncoder, Compression},
	mapdat2png::{
		convert::{self, Conversion},
		nbt::tagId,
		Error, PaletteVersion, Scale,
	},
	std::{
		fs,
		io::Write,
		path::{Path, PathBuf},
		process,
	},
};

struct NbtWriter(Vec<u8>);

impl NbtWriter {
	fn new() -> Self {
		Self(Vec::new())
	}

	fn header(&mut self, id: u8, name: &str) -> &mut Self {
		self.0.push(id);
		self.0.write_u16::<BE>(name.len() as _).unwrap();
		self.0.extend_from_slice(name.as_bytes());
		self
	}

	fn short(&mut self, name: &str, value: i16) -> &mut Self {
		self.header(tagId::SHORT, name).0.write_i16::<BE>(value).unwrap();
		self
	}

	fn int(&mut self, name: &str, value: i32) -> &mut Self {
		self.header(tagId::INT, name).0.write_i32::<BE>(value).unwrap();
		self
	}

	fn bytes(&mut self, name: &str, values: &[u8]) -> &mut Self {
		self.header(tagId::BYTE_ARRAY, name).0.write_i32::<BE>(values.len() as _).unwrap();
		self.0.extend_from_slice(values);
		self
	}

	fn end(&mut self) -> &mut Self {
		self.0.push(tagId::END);
		self
	}

	fn gzip(&self) -> Vec<u8> {
		let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
		encoder.write_all(&self.0).unwrap();
		encoder.finish().unwrap()
	}
}

fn mapDocument(width: i16, height: i16, colors: &[u8]) -> Vec<u8> {
	NbtWriter::new()
		.header(tagId::COMPOUND, "")
		.header(tagId::COMPOUND, "data")
		.short("height", height)
		.short("width", width)
		.bytes("colors", colors)
		.int("xCenter", 0)
		.end()
		.end()
		.gzip()
}

/// Scratch file path unique to this test process.
fn scratch(name: &str) -> PathBuf {
	std::env::temp_dir().join(format!("mapdat2png-{}-{name}", process::id()))
}

fn decodePng(path: &Path) -> (u32, u32, Vec<u8>) {
	let mut png = png::Decoder::new(fs::File::open(path).unwrap()).read_info().unwrap();
	let mut buffer = vec![0; png.output_buffer_size()];
	let info = png.next_frame(&mut buffer).unwrap();
	assert_eq!((info.color_type, info.bit_depth), (png::ColorType::Rgba, png::BitDepth::Eight));
	buffer.truncate(info.buffer_size());
	(info.width, info.height, buffer)
}

#[test]
fn twoCellMapAtScaleOne() {
	let (input, output) = (scratch("two.dat"), scratch("two.png"));
	fs::write(&input, mapDocument(2, 1, &[4, 255])).unwrap();
	let conversion = Conversion {
		input: Some(input.clone()),
		scale: Scale::ONE,
		output: Some(output.clone()),
		..Conversion::default()
	};
	convert::run(&conversion).unwrap();
	assert_eq!(decodePng(&output), (2, 1, vec![89, 125, 39, 255, 255, 0, 255, 255]));
	fs::remove_file(input).unwrap();
	fs::remove_file(output).unwrap();
}

#[test]
fn defaultScaleQuadruplesEachSide() {
	let (input, output, metadata) = (scratch("full.dat"), scratch("full.png"), scratch("full.toml"));
	let colors: Vec<u8> = (0..128 * 128).map(|i| (i % 208) as u8).collect();
	fs::write(&input, mapDocument(128, 128, &colors)).unwrap();
	let conversion = Conversion {
		input: Some(input.clone()),
		output: Some(output.clone()),
		palette: PaletteVersion::V1_8,
		metadata: Some(metadata.clone()),
		..Conversion::default()
	};
	convert::run(&conversion).unwrap();

	let (width, height, data) = decodePng(&output);
	assert_eq!((width, height), (512, 512));
	let palette = PaletteVersion::V1_8.colors();
	for (x, y) in [(0, 0), (3, 3), (4, 0), (511, 511), (130, 257)] {
		let offset = (y * 512 + x) * 4;
		let cell = colors[(y / 4) * 128 + x / 4];
		assert_eq!(data[offset..offset + 4], palette[cell as usize].toArray(), "({x}, {y})");
	}

	let summary: toml::Value = fs::read_to_string(&metadata).unwrap().parse().unwrap();
	assert_eq!(summary["image"]["width"].as_integer(), Some(512));
	assert_eq!(summary["palette"].as_str(), Some("1.8"));
	assert_eq!(summary["metadata"]["xCenter"].as_integer(), Some(0));
	for path in [input, output, metadata] {
		fs::remove_file(path).unwrap();
	}
}

#[test]
fn missingColorsLeavesOutputUntouched() {
	let (input, output) = (scratch("nocolors.dat"), scratch("nocolors.png"));
	let document = NbtWriter::new()
		.header(tagId::COMPOUND, "")
		.header(tagId::COMPOUND, "data")
		.short("height", 1)
		.short("width", 1)
		.end()
		.end()
		.gzip();
	fs::write(&input, document).unwrap();
	let conversion = Conversion { input: Some(input.clone()), output: Some(output.clone()), ..Conversion::default() };
	let err = convert::run(&conversion).unwrap_err();
	assert!(matches!(err, Error::Map(_)), "{err:?}");
	assert!(!output.exists());
	fs::remove_file(input).unwrap();
}

#[test]
fn garbageInputIsLoadError() {
	let input = scratch("garbage.dat");
	fs::write(&input, [0x1F, 0x8B, 0x08, 0x00, 0xDE, 0xAD]).unwrap();
	let conversion = Conversion { input: Some(input.clone()), output: Some(scratch("garbage.png")), ..Conversion::default() };
	let err = convert::run(&conversion).unwrap_err();
	assert!(err.to_string().starts_with("error reading"), "{err}");
	fs::remove_file(input).unwrap();
}
