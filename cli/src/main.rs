use anyhow::{Context, Result};
use arm_identity_core::{
    expand_value, flatten, ExpandOptions, ExtraBlocks, UserAssignedIdentityId, UserAssignedList,
};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(name = "arm-identity")]
#[command(about = "Convert managed identity blocks between schema and Resource Manager wire form")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand schema `identity` blocks into a request body
    Expand {
        /// Input JSON file holding an array of identity blocks (`-` for stdin)
        input: PathBuf,

        /// Output file (defaults to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fail instead of ignoring identity blocks after the first
        #[arg(long)]
        reject_extra_blocks: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },

    /// Flatten an API identity response into schema `identity` blocks
    Flatten {
        /// Input JSON file holding the API identity object (`-` for stdin)
        input: PathBuf,

        /// Output file (defaults to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },

    /// Parse a user-assigned identity ID and print its components
    ParseId {
        /// The resource ID to parse
        id: String,

        /// Require canonical casing of the static segments
        #[arg(long)]
        strict: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum OutputFormat {
    Pretty,
    Compact,
}

#[derive(Serialize)]
struct ParsedId<'a> {
    id: String,
    subscription_id: &'a str,
    resource_group_name: &'a str,
    user_assigned_identity_name: &'a str,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for JSON
    let log_level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Expand {
            input,
            output,
            reject_extra_blocks,
            format,
        } => {
            let config: serde_json::Value = read_json(&input, "identity blocks")?;

            let options = ExpandOptions {
                extra_blocks: if reject_extra_blocks {
                    ExtraBlocks::Reject
                } else {
                    ExtraBlocks::Ignore
                },
            };

            let list = expand_value(&config, &options)
                .map_err(|e| anyhow::Error::from(e).context("Expansion failed"))?;

            write_json(&list, output.as_ref(), format)?;
        }
        Commands::Flatten {
            input,
            output,
            format,
        } => {
            let list: UserAssignedList = read_json(&input, "identity response")?;

            let blocks = flatten(Some(&list))
                .map_err(|e| anyhow::Error::from(e).context("Flatten failed"))?;

            write_json(&blocks, output.as_ref(), format)?;
        }
        Commands::ParseId { id, strict, format } => {
            let result = if strict {
                UserAssignedIdentityId::parse(&id)
            } else {
                UserAssignedIdentityId::parse_insensitively(&id)
            };
            let parsed = result
                .with_context(|| format!("Failed to parse {id:?} as a User Assigned Identity ID"))?;

            tracing::debug!(canonical = %parsed, "parsed identity ID");

            let view = ParsedId {
                id: parsed.to_string(),
                subscription_id: &parsed.subscription_id,
                resource_group_name: &parsed.resource_group_name,
                user_assigned_identity_name: &parsed.user_assigned_identity_name,
            };
            write_json(&view, None, format)?;
        }
    }

    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        return serde_json::from_str(&buf)
            .with_context(|| format!("Failed to parse {what} from stdin"));
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open input file: {}", path.display()))?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse {what} from: {}", path.display()))
}

fn write_json<T: Serialize>(val: &T, path: Option<&PathBuf>, format: OutputFormat) -> Result<()> {
    let mut writer: Box<dyn Write> = if let Some(p) = path {
        let file = File::create(p)
            .with_context(|| format!("Failed to create output file: {}", p.display()))?;
        Box::new(BufWriter::new(file))
    } else {
        Box::new(BufWriter::new(io::stdout()))
    };

    match format {
        OutputFormat::Pretty => {
            serde_json::to_writer_pretty(&mut writer, val).context("Failed to write JSON")?;
        }
        OutputFormat::Compact => {
            serde_json::to_writer(&mut writer, val).context("Failed to write JSON")?;
        }
    }

    // Ensure trailing newline
    writeln!(writer).context("Failed to write trailing newline")?;
    writer.flush().context("Failed to flush output")?;

    Ok(())
}
