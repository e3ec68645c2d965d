use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use inilayer::store::{CONFIG_FILE_NAME, default_global_path};
use inilayer::{Destination, LayeredConfig};

#[derive(Parser)]
#[command(name = "inilayer")]
#[command(
	author,
	version,
	about = "Read and edit local/global layered INI configuration files"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	/// Local configuration file; its values win over the global file
	#[arg(long, global = true, value_name = "PATH")]
	local_file: Option<PathBuf>,

	/// Global configuration file holding shared defaults
	#[arg(long, global = true, value_name = "PATH")]
	global_file: Option<PathBuf>,

	/// Show more diagnostics on stderr (-v, -vv, -vvv)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
	/// Print the resolved value of a token
	Get {
		section: String,
		key: String,

		/// Printed when the token exists in neither layer
		#[arg(long)]
		default: Option<String>,
	},
	/// Print each element of a list value on its own line
	GetList { section: String, key: String },
	/// Print a token read as an integer
	GetNumber {
		section: String,
		key: String,

		/// Printed when the token is missing or not a number
		#[arg(long, default_value_t = 0, allow_negative_numbers = true)]
		default: i64,

		/// Base of the stored number (0 guesses from the prefix)
		#[arg(long, default_value_t = 10)]
		base: u32,
	},
	/// Set a token
	Set {
		section: String,
		key: String,
		value: String,

		/// Write to the global file instead of the local one
		#[arg(long)]
		global: bool,
	},
	/// Set a token to a list of values
	SetList {
		section: String,
		key: String,

		#[arg(required = true, allow_hyphen_values = true)]
		values: Vec<String>,

		/// Write to the global file instead of the local one
		#[arg(long)]
		global: bool,
	},
	/// Remove a token from one layer
	Unset {
		section: String,
		key: String,

		/// Remove from the global file instead of the local one
		#[arg(long)]
		global: bool,
	},
	/// List section names from both layers
	Sections,
	/// Display the resolved configuration
	Show,
	/// Print the effective configuration as TOML
	Export,
}

/// Resolved locations of both layers.
struct Paths {
	local: PathBuf,
	global: PathBuf,
}

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();

	inilayer::logging::init(cli.verbose)
		.map_err(|e| anyhow::anyhow!(e))
		.context("Failed to initialize logging")?;

	let paths = resolve_paths(cli.local_file, cli.global_file)?;
	let mut config = LayeredConfig::from_files(&paths.local, &paths.global).into_inner();

	match cli.command {
		Commands::Get {
			section,
			key,
			default,
		} => handle_get(&config, &section, &key, default.as_deref()),
		Commands::GetList { section, key } => handle_get_list(&config, &section, &key),
		Commands::GetNumber {
			section,
			key,
			default,
			base,
		} => {
			println!("{}", config.get_number(&section, &key, default, base));
			Ok(ExitCode::SUCCESS)
		}
		Commands::Set {
			section,
			key,
			value,
			global,
		} => {
			let destination = destination(global);
			let stored = config.set(&section, &key, value, destination).to_string();
			tracing::info!(%section, %key, value = %stored, ?destination, "Token set");
			save(&config, &paths, destination)
		}
		Commands::SetList {
			section,
			key,
			values,
			global,
		} => {
			let destination = destination(global);
			let stored = config
				.set_vector(&section, &key, &values, destination)
				.to_string();
			tracing::info!(%section, %key, value = %stored, ?destination, "List set");
			save(&config, &paths, destination)
		}
		Commands::Unset {
			section,
			key,
			global,
		} => {
			let destination = destination(global);
			if !config.remove(&section, &key, destination) {
				eprintln!("Token not found: [{section}] {key}");
				return Ok(ExitCode::FAILURE);
			}
			save(&config, &paths, destination)
		}
		Commands::Sections => {
			for name in config.names() {
				println!("{name}");
			}
			Ok(ExitCode::SUCCESS)
		}
		Commands::Show => handle_show(&config),
		Commands::Export => {
			let exported = config
				.to_toml()
				.context("Failed to export configuration")?;
			print!("{exported}");
			Ok(ExitCode::SUCCESS)
		}
	}
}

fn resolve_paths(local: Option<PathBuf>, global: Option<PathBuf>) -> Result<Paths> {
	let local = local.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
	let global = match global {
		Some(path) => path,
		None => default_global_path().context("Failed to locate the global configuration")?,
	};
	Ok(Paths { local, global })
}

fn destination(global: bool) -> Destination {
	if global {
		Destination::Global
	} else {
		Destination::Local
	}
}

fn handle_get(
	config: &LayeredConfig,
	section: &str,
	key: &str,
	default: Option<&str>,
) -> Result<ExitCode> {
	match config.get(section, key).or(default) {
		Some(value) => {
			println!("{value}");
			Ok(ExitCode::SUCCESS)
		}
		None => Ok(ExitCode::FAILURE),
	}
}

fn handle_get_list(config: &LayeredConfig, section: &str, key: &str) -> Result<ExitCode> {
	if config.get(section, key).is_none() {
		return Ok(ExitCode::FAILURE);
	}

	let items: Vec<String> = config.get_vector(section, key);
	for item in items {
		println!("{item}");
	}
	Ok(ExitCode::SUCCESS)
}

fn handle_show(config: &LayeredConfig) -> Result<ExitCode> {
	let no_section = config.no_section();
	if !no_section.is_empty() {
		for (key, value) in no_section {
			println!("{key} = {value}");
		}
		println!();
	}

	print!("{config}");
	Ok(ExitCode::SUCCESS)
}

/// Write back the layer that changed.
fn save(config: &LayeredConfig, paths: &Paths, destination: Destination) -> Result<ExitCode> {
	match destination {
		Destination::Local => config
			.to_file(&paths.local)
			.with_context(|| format!("Failed to write {}", paths.local.display()))?,
		Destination::Global => {
			ensure_parent_dir(&paths.global)?;
			config
				.to_files(&paths.local, &paths.global)
				.context("Failed to write configuration files")?
		}
	}
	Ok(ExitCode::SUCCESS)
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
	if let Some(parent) = path.parent()
		&& !parent.as_os_str().is_empty()
	{
		std::fs::create_dir_all(parent)
			.with_context(|| format!("Failed to create {}", parent.display()))?;
	}
	Ok(())
}
