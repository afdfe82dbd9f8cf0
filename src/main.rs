//! Pinball Panic command-line entry point
//!
//! Generates one board and prints it as text (or JSON with `--json`).

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;

use pinball_panic::{BoardConfig, CellKind, Generator};

/// Procedurally generate a pinball puzzle grid.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Start from a level preset (1-based)
    #[arg(short, long, conflicts_with = "config")]
    level: Option<usize>,

    /// Load a JSON board configuration
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Grid side length, border included
    #[arg(short, long)]
    size: Option<usize>,

    /// Minimum obstacles before the ball may exit
    #[arg(long)]
    min: Option<usize>,

    /// Maximum obstacles
    #[arg(long)]
    max: Option<usize>,

    /// Comma-separated obstacle kinds (bumper,tunnel,teleporter,activated_bumper,directional_bumper)
    #[arg(short, long, value_delimiter = ',')]
    kinds: Option<Vec<String>>,

    /// RNG seed for a reproducible board
    #[arg(long)]
    seed: Option<u64>,

    /// Attempts before giving up (default 500)
    #[arg(long)]
    attempts: Option<u32>,

    /// Print the board as JSON instead of text
    #[arg(long)]
    json: bool,
}

impl CliArgs {
    fn to_config(&self) -> Result<BoardConfig> {
        let mut config = match (&self.config, self.level) {
            (Some(path), _) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                BoardConfig::from_json(&json)?
            }
            (None, Some(level)) => BoardConfig::for_level(level)?,
            (None, None) => BoardConfig::default(),
        };

        if let Some(size) = self.size {
            config.size = size;
        }
        if let Some(min) = self.min {
            config.min_objects = min;
            config.max_objects = config.max_objects.max(min);
        }
        if let Some(max) = self.max {
            config.max_objects = max;
        }
        if let Some(names) = &self.kinds {
            let mut kinds = Vec::with_capacity(names.len());
            for name in names {
                match CellKind::from_str(name.trim()) {
                    Some(kind) => kinds.push(kind),
                    None => bail!("unknown obstacle kind '{name}'"),
                }
            }
            config.allowed_kinds = kinds;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(attempts) = self.attempts {
            config.max_attempts = attempts;
        }

        config.validate()?;
        Ok(config)
    }
}

fn run() -> Result<()> {
    let args = CliArgs::parse();
    let config = args.to_config()?;
    log::debug!("Config: {config:?}");

    let mut generator = Generator::new(config)?;
    let board = generator.generate()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&board)?);
    } else {
        print!("{board}");
        println!(
            "{} objects, {} attempt(s), seed {}",
            board.objects_placed(),
            board.attempts(),
            generator.seed().map_or_else(|| "-".to_string(), |s| s.to_string())
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    log::info!("Pinball Panic starting...");
    run()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("pinball-panic").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_level_with_overrides() {
        let config = parse(&["--level", "4", "--seed", "9", "--attempts", "20", "--min", "5"])
            .to_config()
            .unwrap();
        assert_eq!(config.size, 6);
        assert_eq!(config.allowed_kinds, vec![CellKind::Bumper, CellKind::Tunnel]);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.max_attempts, 20);
        // min above the preset max drags max up with it
        assert_eq!((config.min_objects, config.max_objects), (5, 5));
    }

    #[test]
    fn test_kind_list() {
        let config = parse(&["-k", "bumper, directional_bumper", "-s", "7"])
            .to_config()
            .unwrap();
        assert_eq!(config.size, 7);
        assert_eq!(
            config.allowed_kinds,
            vec![CellKind::Bumper, CellKind::DirectionalBumper]
        );
    }

    #[test]
    fn test_bad_input_rejected() {
        assert!(parse(&["-k", "flipper"]).to_config().is_err());
        assert!(parse(&["--level", "12"]).to_config().is_err());
        assert!(parse(&["--size", "2"]).to_config().is_err());
        assert!(
            CliArgs::try_parse_from(["pinball-panic", "--level", "1", "--config", "a.json"])
                .is_err()
        );
    }
}
