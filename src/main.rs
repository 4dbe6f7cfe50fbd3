use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use huffcodec::config::CodecConfig;
use huffcodec::Codec;

#[derive(Parser)]
#[command(name = "huffcodec", version)]
#[command(about = "Huffman compression with a postorder tree header.", long_about = None)]
struct Cli {
    /// JSON codec configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file (default output: <input>.huf)
    Compress {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Uncompress a file (default output: <input>.orig)
    Decompress {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print compression statistics for a file as JSON
    Stats { input: PathBuf },
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

fn init_logging(verbose: bool) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(if verbose { Level::DEBUG } else { Level::INFO })
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("failed to set up logging")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let config = match &cli.config {
        Some(path) => CodecConfig::from_json_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => CodecConfig::default(),
    };
    let codec = Codec::new(config);

    match cli.command {
        Commands::Compress { input, output } => {
            let output = output.unwrap_or_else(|| with_suffix(&input, ".huf"));
            codec
                .compress_file(&input, &output)
                .with_context(|| format!("compressing {}", input.display()))?;
        }
        Commands::Decompress { input, output } => {
            let output = output.unwrap_or_else(|| with_suffix(&input, ".orig"));
            codec
                .decompress_file(&input, &output)
                .with_context(|| format!("uncompressing {}", input.display()))?;
        }
        Commands::Stats { input } => {
            let data = std::fs::read(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let (_, report) = codec.compress_with_report(&data)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
