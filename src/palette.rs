//! Built-in map color tables.
//!
//! Every table is derived from a list of base colors: base `i` occupies indices `4*i..4*i + 4`,
//! one entry per brightness shade. Base 0 means "nothing drawn here" and stays fully transparent.

use {
	crate::{error::PaletteError, Rgba},
	core::{fmt, str::FromStr},
};

/// Brightness multipliers (out of 255) of the four shades of a base color.
pub const SHADES: [u16; 4] = [180, 220, 255, 135];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PaletteVersion {
	#[default]
	Original,
	V1_7,
	V1_8,
	V1_12,
}

impl PaletteVersion {
	pub const ALL: [Self; 4] = [Self::Original, Self::V1_7, Self::V1_8, Self::V1_12];

	pub const ORIGINAL_NAME: &'static str = "original";
	pub const V1_7_NAME: &'static str = "1.7";
	pub const V1_8_NAME: &'static str = "1.8";
	pub const V1_12_NAME: &'static str = "1.12";

	pub const fn name(self) -> &'static str {
		match self {
			Self::Original => Self::ORIGINAL_NAME,
			Self::V1_7 => Self::V1_7_NAME,
			Self::V1_8 => Self::V1_8_NAME,
			Self::V1_12 => Self::V1_12_NAME,
		}
	}

	pub fn colors(self) -> &'static [Rgba] {
		match self {
			Self::Original => &COLORS_ORIGINAL,
			Self::V1_7 => &COLORS_1_7,
			Self::V1_8 => &COLORS_1_8,
			Self::V1_12 => &COLORS_1_12,
		}
	}
}

impl FromStr for PaletteVersion {
	type Err = PaletteError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::ALL.into_iter().find(|version| version.name() == s).ok_or_else(|| PaletteError::Unknown(s.to_owned()))
	}
}

impl fmt::Display for PaletteVersion {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// Looks a table up by the name given on the command line.
pub fn byName(name: &str) -> Result<&'static [Rgba], PaletteError> {
	name.parse::<PaletteVersion>().map(PaletteVersion::colors)
}

const fn shade([red, green, blue]: [u8; 3], multiplier: u16) -> Rgba {
	Rgba::new(
		(red as u16 * multiplier / 255) as u8,
		(green as u16 * multiplier / 255) as u8,
		(blue as u16 * multiplier / 255) as u8,
		255,
	)
}

const fn expand<const BASES: usize, const LEN: usize>(bases: &[[u8; 3]; BASES]) -> [Rgba; LEN] {
	assert!(LEN == BASES * SHADES.len());
	let mut table = [Rgba::TRANSPARENT; LEN];
	let mut i = 1;
	while i < BASES {
		let mut j = 0;
		while j < SHADES.len() {
			table[i * SHADES.len() + j] = shade(bases[i], SHADES[j]);
			j += 1;
		}
		i += 1;
	}
	table
}

#[rustfmt::skip]
const BASES_ORIGINAL: [[u8; 3]; 14] = [
	[0, 0, 0],       // none
	[127, 178, 56],  // grass
	[247, 233, 163], // sand
	[167, 167, 167], // wool
	[255, 0, 0],     // fire
	[160, 160, 255], // ice
	[167, 167, 167], // iron
	[0, 124, 0],     // foliage
	[255, 255, 255], // snow
	[164, 168, 184], // clay
	[183, 106, 77],  // dirt
	[112, 112, 112], // stone
	[64, 64, 255],   // water
	[104, 83, 50],   // wood
];

#[rustfmt::skip]
const BASES_1_7: [[u8; 3]; 36] = [
	[0, 0, 0],
	[127, 178, 56],
	[247, 233, 163],
	[199, 199, 199], // wool
	[255, 0, 0],
	[160, 160, 255],
	[167, 167, 167],
	[0, 124, 0],
	[255, 255, 255],
	[164, 168, 184],
	[151, 109, 77],  // dirt
	[112, 112, 112],
	[64, 64, 255],
	[143, 119, 72],  // wood
	[255, 252, 245], // quartz
	[216, 127, 51],  // orange
	[178, 76, 216],  // magenta
	[102, 153, 216], // light blue
	[229, 229, 51],  // yellow
	[127, 204, 25],  // lime
	[242, 127, 165], // pink
	[76, 76, 76],    // gray
	[153, 153, 153], // light gray
	[76, 127, 153],  // cyan
	[127, 63, 178],  // purple
	[51, 76, 178],   // blue
	[102, 76, 51],   // brown
	[102, 127, 51],  // green
	[153, 51, 51],   // red
	[25, 25, 25],    // black
	[250, 238, 77],  // gold
	[92, 219, 213],  // diamond
	[74, 128, 255],  // lapis
	[0, 217, 58],    // emerald
	[129, 86, 49],   // podzol
	[112, 2, 0],     // netherrack
];

#[rustfmt::skip]
const BASES_1_8: [[u8; 3]; 52] = {
	let mut bases = [[0; 3]; 52];
	let mut i = 0;
	while i < BASES_1_7.len() {
		bases[i] = BASES_1_7[i];
		i += 1;
	}
	// stained hardened clay, white through black
	let clay: [[u8; 3]; 16] = [
		[209, 177, 161], [159, 82, 36],  [149, 87, 108], [112, 108, 138],
		[186, 133, 36],  [103, 117, 53], [160, 77, 78],  [57, 41, 35],
		[135, 107, 98],  [87, 92, 92],   [122, 73, 88],  [76, 62, 92],
		[76, 50, 35],    [76, 82, 42],   [142, 60, 46],  [37, 22, 16],
	];
	let mut j = 0;
	while j < clay.len() {
		bases[BASES_1_7.len() + j] = clay[j];
		j += 1;
	}
	bases
};

static COLORS_ORIGINAL: [Rgba; 56] = expand(&BASES_ORIGINAL);
static COLORS_1_7: [Rgba; 144] = expand(&BASES_1_7);
static COLORS_1_8: [Rgba; 208] = expand(&BASES_1_8);
static COLORS_1_12: [Rgba; 208] = expand(&BASES_1_8);
