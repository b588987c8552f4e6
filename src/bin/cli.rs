use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use gdtf_creator::describe::describe_fixture;
use gdtf_creator::error::AppError;
use gdtf_creator::gdtf::generate_description_with;
use gdtf_creator::package;
use gdtf_creator::paths;
use gdtf_creator::schema::fixture_schema_pretty;
use gdtf_creator::settings::{self, GeneratorSettings};
use gdtf_creator::storage::load_fixture;

// ── CLI argument parsing ─────────────────────────────────────────

#[derive(Parser)]
#[command(name = "gdtf-creator", about = "Generate GDTF fixture files from extracted fixture data", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Settings file (defaults to ./gdtf-creator.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log resolution details to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a .gdtf archive (or bare description.xml) for a fixture
    Generate {
        fixture: PathBuf,
        /// Output directory
        #[arg(long)]
        out: Option<PathBuf>,
        /// Write description.xml instead of a .gdtf archive
        #[arg(long)]
        xml_only: bool,
        /// Fixed FixtureTypeID instead of a random one
        #[arg(long)]
        fixture_type_id: Option<String>,
    },
    /// Print the descriptor to stdout
    Xml { fixture: PathBuf },
    /// Print a summary and per-mode channel tables
    Describe { fixture: PathBuf },
    /// Print the JSON Schema of the fixture description format
    Schema,
}

// ── Main ─────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), AppError> {
    let config_path = cli
        .config
        .unwrap_or_else(|| paths::settings_path(Path::new(".")));
    let settings = settings::load_settings(&config_path)?;

    match cli.command {
        Commands::Generate {
            fixture,
            out,
            xml_only,
            fixture_type_id,
        } => generate(&settings, &fixture, out, xml_only, fixture_type_id.as_deref()),
        Commands::Xml { fixture } => {
            let fixture = load_fixture(&fixture)?;
            println!("{}", generate_description_with(&fixture, &settings.descriptor_options(None)));
            Ok(())
        }
        Commands::Describe { fixture } => {
            let fixture = load_fixture(&fixture)?;
            println!("{}", describe_fixture(&fixture));
            Ok(())
        }
        Commands::Schema => {
            println!("{}", fixture_schema_pretty());
            Ok(())
        }
    }
}

fn generate(
    settings: &GeneratorSettings,
    fixture_path: &Path,
    out: Option<PathBuf>,
    xml_only: bool,
    fixture_type_id: Option<&str>,
) -> Result<(), AppError> {
    let id = fixture_type_id
        .map(|s| {
            Uuid::parse_str(s).map_err(|_| AppError::InvalidFixtureTypeId {
                value: s.to_string(),
            })
        })
        .transpose()?;

    let fixture = load_fixture(fixture_path)?;
    let xml = generate_description_with(&fixture, &settings.descriptor_options(id));

    let out_dir = out
        .or_else(|| settings.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));

    let written = if xml_only || !settings.write_archive {
        package::write_description(&out_dir, &xml)?
    } else {
        package::write_archive(&out_dir, &fixture, &xml)?
    };
    println!("{}", written.display());
    Ok(())
}
