//! Galley Shooter headless runner
//!
//! Runs a seeded session on autopilot and streams its events either to the
//! log or as JSON lines on stdout. A real front end would feed keyboard input
//! into `TickInput` and draw from the same event stream.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use galley_shooter::sim::{TickInput, World, tick};
use galley_shooter::{ConfigError, JsonLinesPresenter, LogPresenter, Presenter, Tuning, TuningPreset};

const DEFAULT_TICKS: u64 = 60 * 60 * 5;

#[derive(Parser)]
#[command(name = "galley-shooter")]
#[command(about = "Run a seeded headless Galley Shooter session on autopilot")]
struct Args {
    /// RNG seed; defaults to the current time
    #[arg(long)]
    seed: Option<u64>,
    /// Number of fixed ticks to simulate
    #[arg(long, default_value_t = DEFAULT_TICKS)]
    ticks: u64,
    /// Balance preset: classic or galley
    #[arg(long, value_parser = parse_preset, conflicts_with = "tuning")]
    preset: Option<TuningPreset>,
    /// JSON tuning file; absent fields keep the classic values
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Stream events as JSON lines on stdout instead of logging them
    #[arg(long)]
    json: bool,
}

fn parse_preset(s: &str) -> Result<TuningPreset, ConfigError> {
    TuningPreset::from_str(s).ok_or_else(|| ConfigError::UnknownPreset(s.to_string()))
}

/// Resolve the tuning and a description of where it came from
fn resolve_tuning(args: &Args) -> Result<(Tuning, String), ConfigError> {
    match &args.tuning {
        Some(path) => Ok((Tuning::load(path)?, format!("file={}", path.display()))),
        None => {
            let preset = args.preset.unwrap_or_default();
            Ok((
                Tuning::from_preset(preset),
                format!("preset={}", preset.as_str()),
            ))
        }
    }
}

fn run(args: &Args, tuning: Tuning, source: &str) {
    let seed = args.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    });

    let mut world = World::new(seed, tuning);
    log::info!(
        "Galley Shooter (headless) seed={} {} ticks={}",
        world.seed(),
        source,
        args.ticks
    );

    let mut presenter: Box<dyn Presenter> = if args.json {
        Box::new(JsonLinesPresenter::new(std::io::stdout().lock()))
    } else {
        Box::new(LogPresenter)
    };

    let mut input = TickInput {
        autopilot: true,
        ..Default::default()
    };
    presenter.present_all(&world.drain_events());
    for _ in 0..args.ticks {
        let events = tick(&mut world, &input);
        presenter.present_all(&events);
        input.clear_edges();
    }

    log::info!(
        "Finished after {} ticks: score={} level={} phase={:?} health={}",
        world.state.time_ticks,
        world.state.score,
        world.state.level.number(),
        world.state.phase,
        world.state.health
    );
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    match resolve_tuning(&args) {
        Ok((tuning, source)) => run(&args, tuning, &source),
        Err(e) => {
            log::error!("{}", e);
            eprintln!("galley-shooter: {e}");
            std::process::exit(2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["galley-shooter"]).unwrap();
        assert_eq!(args.seed, None);
        assert_eq!(args.ticks, DEFAULT_TICKS);
        assert!(!args.json);
        let (tuning, source) = resolve_tuning(&args).unwrap();
        assert_eq!(tuning, Tuning::default());
        assert_eq!(source, "preset=Classic");
    }

    #[test]
    fn test_args_preset_and_flags() {
        let args = Args::try_parse_from([
            "galley-shooter",
            "--seed",
            "7",
            "--ticks",
            "120",
            "--preset",
            "GALLEY",
            "--json",
        ])
        .unwrap();
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.ticks, 120);
        assert!(args.json);
        let (tuning, _) = resolve_tuning(&args).unwrap();
        assert_eq!(tuning, Tuning::from_preset(TuningPreset::Galley));
    }

    #[test]
    fn test_args_rejected() {
        assert!(Args::try_parse_from(["galley-shooter", "--seed", "abc"]).is_err());
        assert!(Args::try_parse_from(["galley-shooter", "--preset", "arcade"]).is_err());
        assert!(
            Args::try_parse_from(["galley-shooter", "--preset", "galley", "--tuning", "t.json"])
                .is_err()
        );
    }

    #[test]
    fn test_missing_tuning_file_is_io_error() {
        let args = Args::try_parse_from(["galley-shooter", "--tuning", "/no/such/tuning.json"])
            .unwrap();
        assert!(matches!(resolve_tuning(&args), Err(ConfigError::Io(_))));
    }
}
