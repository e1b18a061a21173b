mod replay;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use motion_core::registry::{self, DEFAULT_EXERCISE};
use motion_core::{CalibrationPhase, CountDirection, MotionSession, SessionConfig, SessionEvent};
use motion_store::BaselineStore;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "motion", about = "Exercise repetition engine CLI")]
struct Cli {
    /// Session config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the known exercises
    Exercises,

    /// Replay a JSON Lines pose stream through a session
    Replay {
        /// Pose stream file
        file: PathBuf,

        /// Exercise to count
        #[arg(long, default_value = DEFAULT_EXERCISE)]
        exercise: String,

        /// Frame rate used to stamp lines without `t_ms`
        #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..))]
        fps: u32,

        /// Use the exercise's default baseline instead of calibrating
        #[arg(long, conflicts_with = "recalibrate")]
        skip_calibration: bool,

        /// Ignore any stored baseline and calibrate from the stream
        #[arg(long)]
        recalibrate: bool,

        /// Print every event as a JSON line
        #[arg(long)]
        json: bool,
    },

    /// Print per-frame joint angles of a pose stream
    Angles {
        /// Pose stream file
        file: PathBuf,

        /// Frame rate used to stamp lines without `t_ms`
        #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..))]
        fps: u32,
    },

    /// Inspect or clear stored baselines
    Baseline {
        #[command(subcommand)]
        action: BaselineAction,
    },
}

#[derive(Subcommand)]
enum BaselineAction {
    /// Show stored baselines
    Show {
        /// Only this exercise
        #[arg(long)]
        exercise: Option<String>,
    },
    /// Delete stored baselines
    Clear {
        /// Only this exercise
        #[arg(long)]
        exercise: Option<String>,
    },
}

fn open_store() -> Result<BaselineStore> {
    let base_dir = std::env::var("MOTION_DATA_DIR").ok().map(PathBuf::from);
    BaselineStore::open_default(base_dir.as_deref()).context("failed to open baseline store")
}

fn load_config(path: Option<&Path>) -> Result<SessionConfig> {
    let Some(path) = path else {
        return Ok(SessionConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: SessionConfig = toml::from_str(&text)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    config.validate()?;
    tracing::debug!(?config, "loaded session config");
    Ok(config)
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Exercises => cmd_exercises(),
        Commands::Replay {
            file,
            exercise,
            fps,
            skip_calibration,
            recalibrate,
            json,
        } => cmd_replay(
            &cli,
            file,
            exercise,
            *fps,
            ReplayMode::from_flags(*skip_calibration, *recalibrate),
            *json,
        ),
        Commands::Angles { file, fps } => cmd_angles(file, *fps),
        Commands::Baseline { action } => match action {
            BaselineAction::Show { exercise } => cmd_baseline_show(exercise.as_deref()),
            BaselineAction::Clear { exercise } => cmd_baseline_clear(exercise.as_deref()),
        },
    }
}

fn cmd_exercises() -> Result<()> {
    println!(
        "{:<10} {:<14} {:>8} {:>8} {:>8}  direction",
        "id", "name", "default", "target", "reset"
    );
    for def in registry::all() {
        let direction = match def.count_direction {
            CountDirection::Increasing => "increasing",
            CountDirection::Decreasing => "decreasing",
        };
        println!(
            "{:<10} {:<14} {:>8} {:>+8} {:>+8}  {direction}",
            def.id, def.name, def.default_baseline_angle, def.target_delta, def.reset_delta
        );
    }
    Ok(())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ReplayMode {
    /// Use the stored baseline, calibrating only when none exists.
    Stored,
    Skip,
    Recalibrate,
}

impl ReplayMode {
    fn from_flags(skip: bool, recalibrate: bool) -> Self {
        match (skip, recalibrate) {
            (true, _) => ReplayMode::Skip,
            (false, true) => ReplayMode::Recalibrate,
            (false, false) => ReplayMode::Stored,
        }
    }
}

#[derive(Serialize)]
struct StampedEvent<'a> {
    t_ms: u64,
    #[serde(flatten)]
    event: &'a SessionEvent,
}

#[derive(Serialize)]
struct ReplaySummary {
    event: &'static str,
    exercise: &'static str,
    reps: u32,
    baseline: Option<i32>,
}

fn cmd_replay(
    cli: &Cli,
    file: &Path,
    exercise_id: &str,
    fps: u32,
    mode: ReplayMode,
    json: bool,
) -> Result<()> {
    let exercise = registry::lookup(exercise_id)?;
    let config = load_config(cli.config.as_deref())?;
    let frames = replay::read_stream(file, fps)?;
    let store = open_store()?;

    let stored = match mode {
        ReplayMode::Stored => store
            .load(exercise.id)
            .context("failed to load stored baseline")?
            .map(|b| b.baseline_angle),
        ReplayMode::Skip | ReplayMode::Recalibrate => None,
    };

    let mut session = MotionSession::new(config, exercise.id, stored)?;
    let mut events = Vec::new();
    if mode == ReplayMode::Skip {
        events.extend(session.skip_calibration().into_iter().map(|e| (0, e)));
    }
    let calibrate = session.calibration().phase() != CalibrationPhase::Completed;
    tracing::info!(
        session = %session.id(),
        exercise = exercise.id,
        frames = frames.len(),
        calibrate,
        "replaying stream"
    );
    events.extend(replay::run(&mut session, &frames, calibrate));

    if json {
        for (t_ms, event) in &events {
            println!("{}", serde_json::to_string(&StampedEvent { t_ms: *t_ms, event })?);
        }
    } else {
        print_events(&events);
    }

    let calibration = session.calibration();
    if let Some(baseline) = calibration.baseline()
        && !calibration.loaded_from_store()
    {
        store
            .save(exercise.id, baseline)
            .context("failed to save baseline")?;
    }

    if json {
        let summary = ReplaySummary {
            event: "summary",
            exercise: exercise.id,
            reps: session.count(),
            baseline: session.baseline(),
        };
        println!("{}", serde_json::to_string(&summary)?);
    } else {
        println!("reps: {}", session.count());
        match session.baseline() {
            Some(b) => println!("baseline: {b}"),
            None => println!("baseline: none"),
        }
    }
    Ok(())
}

/// Human-readable rendering: calibration steps, counts and quality changes.
fn print_events(events: &[(u64, SessionEvent)]) {
    let mut last_quality: Option<&'static str> = None;
    for (t_ms, event) in events {
        let at = *t_ms as f64 / 1000.0;
        match event {
            SessionEvent::Quality(flags) => {
                let message = flags.message();
                if last_quality != Some(message) {
                    println!("[{at:>8.3}s] quality: {message}");
                    last_quality = Some(message);
                }
            }
            SessionEvent::Calibration(snap) => match snap.state {
                CalibrationPhase::Idle => println!("[{at:>8.3}s] calibration cleared"),
                CalibrationPhase::Calibrating => println!(
                    "[{at:>8.3}s] calibrating: {}s left, {} samples",
                    snap.countdown, snap.sample_count
                ),
                CalibrationPhase::Completed => {
                    if let Some(b) = snap.baseline_angle {
                        println!("[{at:>8.3}s] calibrated: baseline {b}");
                    }
                }
            },
            SessionEvent::RepCount { count: 0 } => println!("[{at:>8.3}s] count reset"),
            SessionEvent::RepCount { count } => println!("[{at:>8.3}s] rep {count}"),
            SessionEvent::Angles(_) | SessionEvent::ExerciseAngle { .. } => {}
        }
    }
}

fn cmd_angles(file: &Path, fps: u32) -> Result<()> {
    let frames = replay::read_stream(file, fps)?;
    for tf in &frames {
        match tf.frame.as_ref().and_then(motion_core::joint_angles) {
            Some(a) => println!(
                "{:>8} ms  elbow {}/{}  shoulder {}/{}  knee {}/{}",
                tf.t_ms,
                a.left_elbow,
                a.right_elbow,
                a.left_shoulder,
                a.right_shoulder,
                a.left_knee,
                a.right_knee
            ),
            None => println!("{:>8} ms  no pose", tf.t_ms),
        }
    }
    Ok(())
}

fn cmd_baseline_show(exercise: Option<&str>) -> Result<()> {
    let store = open_store()?;
    let baselines = match exercise {
        Some(id) => {
            let def = registry::lookup(id)?;
            store.load(def.id)?.into_iter().collect()
        }
        None => store.list()?,
    };

    if baselines.is_empty() {
        println!("no stored baselines");
        return Ok(());
    }
    for b in &baselines {
        println!(
            "{:<10} {:>4}  (saved {})",
            b.exercise_id, b.baseline_angle, b.saved_at
        );
    }
    Ok(())
}

fn cmd_baseline_clear(exercise: Option<&str>) -> Result<()> {
    let store = open_store()?;
    match exercise {
        Some(id) => {
            let def = registry::lookup(id)?;
            if store.clear(def.id)? {
                println!("cleared baseline for {}", def.id);
            } else {
                println!("no stored baseline for {}", def.id);
            }
        }
        None => {
            let n = store.clear_all()?;
            println!("cleared {n} baselines");
        }
    }
    Ok(())
}
