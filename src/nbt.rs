//! Named Binary Tag documents: the gzip'd, big-endian tree format maps are stored in.

use {
	crate::error::LoadError,
	byteorder::{ReadBytesExt, BE},
	flate2::read::GzDecoder,
	std::{
		collections::HashMap,
		fs::File,
		io::{self, Read},
		path::Path,
	},
};

const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Compounds and lists nested deeper than this are rejected as corrupt.
pub const MAX_DEPTH: usize = 512;

pub mod tagId {
	pub const END: u8 = 0;
	pub const BYTE: u8 = 1;
	pub const SHORT: u8 = 2;
	pub const INT: u8 = 3;
	pub const LONG: u8 = 4;
	pub const FLOAT: u8 = 5;
	pub const DOUBLE: u8 = 6;
	pub const BYTE_ARRAY: u8 = 7;
	pub const STRING: u8 = 8;
	pub const LIST: u8 = 9;
	pub const COMPOUND: u8 = 10;
	pub const INT_ARRAY: u8 = 11;
	pub const LONG_ARRAY: u8 = 12;
}

#[derive(Clone, Debug, PartialEq)]
pub enum Tag {
	Byte(i8),
	Short(i16),
	Int(i32),
	Long(i64),
	Float(f32),
	Double(f64),
	/// Kept as raw bytes; NBT calls them signed but map colors are read unsigned.
	ByteArray(Vec<u8>),
	String(String),
	List(Vec<Tag>),
	Compound(Compound),
	IntArray(Vec<i32>),
	LongArray(Vec<i64>),
}

impl Tag {
	pub fn id(&self) -> u8 {
		match self {
			Self::Byte(_) => tagId::BYTE,
			Self::Short(_) => tagId::SHORT,
			Self::Int(_) => tagId::INT,
			Self::Long(_) => tagId::LONG,
			Self::Float(_) => tagId::FLOAT,
			Self::Double(_) => tagId::DOUBLE,
			Self::ByteArray(_) => tagId::BYTE_ARRAY,
			Self::String(_) => tagId::STRING,
			Self::List(_) => tagId::LIST,
			Self::Compound(_) => tagId::COMPOUND,
			Self::IntArray(_) => tagId::INT_ARRAY,
			Self::LongArray(_) => tagId::LONG_ARRAY,
		}
	}

	pub fn asCompound(&self) -> Option<&Compound> {
		match self {
			Self::Compound(compound) => Some(compound),
			_ => None,
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Compound(HashMap<String, Tag>);

impl Compound {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn get(&self, key: &str) -> Option<&Tag> {
		self.0.get(key)
	}

	pub fn insert(&mut self, key: impl Into<String>, tag: Tag) -> Option<Tag> {
		self.0.insert(key.into(), tag)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &Tag)> {
		self.0.iter().map(|(key, tag)| (key.as_str(), tag))
	}
}

impl<K: Into<String>> FromIterator<(K, Tag)> for Compound {
	fn from_iter<I: IntoIterator<Item = (K, Tag)>>(iter: I) -> Self {
		Self(iter.into_iter().map(|(key, tag)| (key.into(), tag)).collect())
	}
}

/// The root of a document: a single tag with a (usually empty) name.
#[derive(Clone, Debug, PartialEq)]
pub struct NamedTag {
	pub name: String,
	pub tag: Tag,
}

/// Raw bytes of a document as read from disk, still compressed.
pub struct Document {
	bytes: Vec<u8>,
}

impl Document {
	pub fn open(path: impl AsRef<Path>) -> Result<Self, LoadError> {
		Self::fromReader(File::open(path)?)
	}

	pub fn fromReader(mut reader: impl Read) -> Result<Self, LoadError> {
		let mut bytes = Vec::new();
		reader.read_to_end(&mut bytes)?;
		Ok(Self { bytes })
	}

	pub fn fromBytes(bytes: Vec<u8>) -> Self {
		Self { bytes }
	}

	pub fn isCompressed(&self) -> bool {
		self.bytes.starts_with(&GZIP_MAGIC)
	}

	pub fn decode(&self) -> Result<NamedTag, LoadError> {
		if self.isCompressed() {
			let mut inflated = Vec::new();
			GzDecoder::new(self.bytes.as_slice()).read_to_end(&mut inflated).map_err(LoadError::Decompress)?;
			tracing::debug!(compressed = self.bytes.len(), inflated = inflated.len(), "inflated document");
			parse(&inflated)
		} else {
			parse(&self.bytes)
		}
	}
}

/// Parses an uncompressed document.
pub fn parse(bytes: &[u8]) -> Result<NamedTag, LoadError> {
	let mut cursor = io::Cursor::new(bytes);
	let id = cursor.read_u8().map_err(truncated)?;
	if id == tagId::END {
		return Err(LoadError::corrupt("document starts with an end tag"));
	}
	let name = cursor.readNbtString()?;
	let tag = cursor.readPayload(id, 0)?;
	Ok(NamedTag { name, tag })
}

fn truncated(err: io::Error) -> LoadError {
	if err.kind() == io::ErrorKind::UnexpectedEof {
		LoadError::corrupt("unexpected end of data")
	} else {
		LoadError::Io(err)
	}
}

trait ReadNbtExt {
	fn readNbtString(&mut self) -> Result<String, LoadError>;
	fn readLength(&mut self) -> Result<usize, LoadError>;
	fn readPayload(&mut self, id: u8, depth: usize) -> Result<Tag, LoadError>;
	fn readVec<T>(&mut self, read: impl FnMut(&mut Self) -> io::Result<T>) -> Result<Vec<T>, LoadError>;
}

impl ReadNbtExt for io::Cursor<&[u8]> {
	fn readNbtString(&mut self) -> Result<String, LoadError> {
		let len = self.read_u16::<BE>().map_err(truncated)? as usize;
		let mut bytes = vec![0; len];
		self.read_exact(&mut bytes).map_err(truncated)?;
		// Modified UTF-8 only differs from UTF-8 for NUL and supplementary characters.
		Ok(String::from_utf8(bytes).unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned()))
	}

	fn readLength(&mut self) -> Result<usize, LoadError> {
		let len = self.read_i32::<BE>().map_err(truncated)?;
		usize::try_from(len).map_err(|_| LoadError::corrupt(format!("negative length {len}")))
	}

	fn readVec<T>(&mut self, mut read: impl FnMut(&mut Self) -> io::Result<T>) -> Result<Vec<T>, LoadError> {
		let len = self.readLength()?;
		let remaining = self.get_ref().len().saturating_sub(self.position() as usize);
		let mut vec = Vec::with_capacity(len.min(remaining));
		for _ in 0..len {
			vec.push(read(self).map_err(truncated)?);
		}
		Ok(vec)
	}

	fn readPayload(&mut self, id: u8, depth: usize) -> Result<Tag, LoadError> {
		if depth > MAX_DEPTH {
			return Err(LoadError::corrupt(format!("nesting deeper than {MAX_DEPTH}")));
		}
		Ok(match id {
			tagId::BYTE => Tag::Byte(self.read_i8().map_err(truncated)?),
			tagId::SHORT => Tag::Short(self.read_i16::<BE>().map_err(truncated)?),
			tagId::INT => Tag::Int(self.read_i32::<BE>().map_err(truncated)?),
			tagId::LONG => Tag::Long(self.read_i64::<BE>().map_err(truncated)?),
			tagId::FLOAT => Tag::Float(self.read_f32::<BE>().map_err(truncated)?),
			tagId::DOUBLE => Tag::Double(self.read_f64::<BE>().map_err(truncated)?),
			tagId::BYTE_ARRAY => Tag::ByteArray(self.readVec(ReadBytesExt::read_u8)?),
			tagId::STRING => Tag::String(self.readNbtString()?),
			tagId::LIST => {
				let elementId = self.read_u8().map_err(truncated)?;
				let len = self.readLength()?;
				if elementId == tagId::END && len > 0 {
					return Err(LoadError::corrupt("non-empty list of end tags"));
				}
				let mut list = Vec::with_capacity(len.min(self.get_ref().len()));
				for _ in 0..len {
					list.push(self.readPayload(elementId, depth + 1)?);
				}
				Tag::List(list)
			}
			tagId::COMPOUND => {
				let mut compound = Compound::new();
				loop {
					let childId = self.read_u8().map_err(truncated)?;
					if childId == tagId::END {
						break;
					}
					let key = self.readNbtString()?;
					let child = self.readPayload(childId, depth + 1)?;
					compound.insert(key, child);
				}
				Tag::Compound(compound)
			}
			tagId::INT_ARRAY => Tag::IntArray(self.readVec(ReadBytesExt::read_i32::<BE>)?),
			tagId::LONG_ARRAY => Tag::LongArray(self.readVec(ReadBytesExt::read_i64::<BE>)?),
			_ => return Err(LoadError::corrupt(format!("unknown tag id {id}"))),
		})
	}
}
