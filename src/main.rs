// In src/main.rs

use std::num::IntErrorKind;
use std::path::PathBuf;

use anyhow::{bail, Context};
use column_pack::{BuildConfig, PackingInfo, BUILD_REPORT, VECTOR_SIZE};
use log::info;

const USAGE: &str = "usage: column-pack [--width <n>] [<extent>...] | column-pack --config <file.json>";

/// What the command line asked for.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    /// Print the usage line.
    Help,
    /// Print the build report.
    Report,
    /// Pack each extent at the given width.
    Pack { width: usize, extents: Vec<usize> },
    /// Resolve a build configuration read from a JSON file.
    Resolve(PathBuf),
}

fn parse_args<I>(args: I) -> anyhow::Result<Command>
where
    I: IntoIterator<Item = String>,
{
    let mut width = None;
    let mut config = None;
    let mut extents = Vec::new();

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--width" => {
                let raw = args.next().context("--width needs a value")?;
                let parsed =
                    parse_positive(&raw).with_context(|| format!("invalid --width {:?}", raw))?;
                width = Some(parsed);
            }
            "--config" => {
                let path = args.next().context("--config needs a path")?;
                config = Some(PathBuf::from(path));
            }
            "-h" | "--help" => return Ok(Command::Help),
            _ => {
                let extent =
                    parse_positive(&arg).with_context(|| format!("invalid extent {:?}", arg))?;
                extents.push(extent);
            }
        }
    }

    match config {
        Some(path) => {
            if width.is_some() || !extents.is_empty() {
                bail!("--config cannot be combined with extents\n{}", USAGE);
            }
            Ok(Command::Resolve(path))
        }
        None if extents.is_empty() => {
            if width.is_some() {
                bail!("--width needs at least one extent\n{}", USAGE);
            }
            Ok(Command::Report)
        }
        None => Ok(Command::Pack {
            width: width.unwrap_or(VECTOR_SIZE),
            extents,
        }),
    }
}

/// Extents and widths are positive; zero and negatives are rejected, never clamped.
fn parse_positive(raw: &str) -> anyhow::Result<usize> {
    let value: i128 = match raw.trim().parse() {
        Ok(value) => value,
        Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
            bail!("out of range")
        }
        Err(e) => return Err(e).context("not an integer"),
    };
    if value < 1 {
        bail!("must be at least 1, got {}", value);
    }
    usize::try_from(value).context("out of range")
}

fn run(command: Command) -> anyhow::Result<String> {
    match command {
        Command::Help => Ok(USAGE.to_string()),
        Command::Report => {
            serde_json::to_string_pretty(&*BUILD_REPORT).context("Failed to serialize build report")
        }
        Command::Pack { width, extents } => {
            let mut packed = Vec::with_capacity(extents.len());
            for extent in extents {
                let info = PackingInfo::new(extent, width)
                    .with_context(|| format!("Failed to pack extent {} at width {}", extent, width))?;
                packed.push(info);
            }
            serde_json::to_string_pretty(&packed).context("Failed to serialize packing")
        }
        Command::Resolve(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let config: BuildConfig = serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse build configuration {}", path.display()))?;
            let resolved = config
                .resolve()
                .with_context(|| format!("Failed to resolve build configuration {}", path.display()))?;
            serde_json::to_string_pretty(&resolved).context("Failed to serialize resolved backend")
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize the logger. Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let command = parse_args(std::env::args().skip(1))?;
    info!("Running {:?}", command);
    println!("{}", run(command)?);
    Ok(())
}
