#![warn(clippy::pedantic, elided_lifetimes_in_paths, explicit_outlives_requirements)]
#![allow(non_snake_case)]

use {
	anyhow::Context,
	clap::Parser,
	const_format::concatcp,
	mapdat2png::{
		convert::{self, STDIO_PATH},
		Conversion, PaletteVersion, Scale,
	},
	std::{env, path::PathBuf, process::ExitCode},
	tracing::Level,
};

const MAPPING_HELP: &str = concatcp!(
	"color mapping to use ('",
	PaletteVersion::ORIGINAL_NAME,
	"', '",
	PaletteVersion::V1_7_NAME,
	"', '",
	PaletteVersion::V1_8_NAME,
	"' or '",
	PaletteVersion::V1_12_NAME,
	"')"
);

/// Renders a map item file into a PNG image.
#[derive(Parser, Debug)]
#[clap(version)]
struct Args {
	/// 'Map_X.dat' in 'serverroot/world/data' ('-' reads standard input)
	#[clap(value_name = "map_file")]
	mapFile: PathBuf,

	/// scale of the map ('4' means 1 map pixel translates to 4 pixels in the output)
	#[clap(value_name = "scale", default_value = "4")]
	scale: Scale,

	/// filename for the png output ('-' or absent writes standard output)
	#[clap(value_name = "output")]
	output: Option<PathBuf>,

	#[clap(value_name = "mapping", default_value = PaletteVersion::ORIGINAL_NAME, help = MAPPING_HELP)]
	mapping: PaletteVersion,

	/// also write a TOML summary of the map to this file ('-' for standard error)
	#[clap(long, value_name = "path")]
	metadata: Option<PathBuf>,

	/// log every pipeline step
	#[clap(short, long, conflicts_with = "quiet")]
	verbose: bool,

	/// do not warn about unknown colors
	#[clap(short, long)]
	quiet: bool,
}

impl Args {
	fn conversion(self) -> Conversion {
		let stdio = |path: PathBuf| (path.as_os_str() != STDIO_PATH).then_some(path);
		Conversion {
			input: stdio(self.mapFile),
			scale: self.scale,
			output: self.output.and_then(stdio),
			palette: self.mapping,
			metadata: self.metadata,
		}
	}
}

fn main() -> ExitCode {
	let args = match Args::try_parse() {
		Ok(args) => args,
		Err(err) => {
			_ = err.print();
			return if err.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS };
		}
	};
	tracing_subscriber::fmt()
		.with_writer(std::io::stderr)
		.with_target(false)
		.without_time()
		.with_max_level(match (args.verbose, args.quiet) {
			(true, _) => Level::DEBUG,
			(_, true) => Level::ERROR,
			_ => Level::WARN,
		})
		.init();

	match run(args) {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			let program = env::args().next().unwrap_or_else(|| env!("CARGO_PKG_NAME").to_owned());
			eprintln!("{program}: {err:#}");
			ExitCode::FAILURE
		}
	}
}

fn run(args: Args) -> anyhow::Result<()> {
	let conversion = args.conversion();
	tracing::debug!(?conversion, "starting");
	convert::run(&conversion).context("conversion failed")
}
