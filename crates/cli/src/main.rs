use anyhow::{bail, Context, Result};
use chaosgame::api::{
    points_per_cycle, BatchPlan, ChaosGameRunner, ChaosGameSettings, IterativeGenerator, Rect,
    RunnerCfg, VertexSelectionStrategy,
};
use chaosgame::cfg::DEFAULT_MAX_TICK_FREQUENCY;
use clap::{Args, Parser, Subcommand};
use rand::{rngs::StdRng, SeedableRng};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing_subscriber::fmt::SubscriberBuilder;

mod output;
mod provenance;

use output::{write_points, PointsDoc};
use provenance::{current_git_rev, write_sidecar, Payload};

/// Interval at which `run` drains the accumulation buffer, roughly one frame.
const FLUSH_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Parser)]
#[command(name = "chaosgame")]
#[command(about = "Run the Chaos Game and write the generated points as JSON")]
struct Cmd {
    /// Fixed RNG seed; omit to draw from OS entropy
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Generate in real time at a fixed rate for a wall-clock duration
    Run {
        #[command(flatten)]
        game: GameArgs,
        /// Points per second
        #[arg(long, default_value_t = 1000)]
        rate: u32,
        /// Wall-clock duration in seconds
        #[arg(long, default_value_t = 1.0)]
        seconds: f64,
        /// Cap on scheduler ticks per second
        #[arg(long, default_value_t = DEFAULT_MAX_TICK_FREQUENCY)]
        max_tick_frequency: u32,
        #[arg(long)]
        out: PathBuf,
    },
    /// Generate a fixed number of points synchronously
    Sample {
        #[command(flatten)]
        game: GameArgs,
        #[arg(long)]
        count: usize,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print the per-tick batch plan for a rate
    Plan {
        #[arg(long)]
        rate: u32,
        #[arg(long, default_value_t = DEFAULT_MAX_TICK_FREQUENCY)]
        max_tick_frequency: u32,
    },
    /// Print a small provenance JSON block
    Report,
}

/// Game settings: an optional JSON file, overridden by individual flags.
#[derive(Args, Debug, Default)]
struct GameArgs {
    /// JSON file with `polygonVertexCount`, `distanceFactor`, `vertexSelectionStrategy`
    #[arg(long)]
    settings: Option<PathBuf>,
    #[arg(long)]
    vertices: Option<usize>,
    #[arg(long)]
    distance_factor: Option<f64>,
    /// random | non-repeating | not-n-places-away:N | not-adjacent-if-previous-two-identical
    #[arg(long)]
    strategy: Option<VertexSelectionStrategy>,
}

impl GameArgs {
    fn resolve(&self) -> Result<ChaosGameSettings> {
        let mut settings = match &self.settings {
            Some(path) => {
                let bytes = std::fs::read(path)
                    .with_context(|| format!("reading settings {}", path.display()))?;
                serde_json::from_slice::<ChaosGameSettings>(&bytes)
                    .with_context(|| format!("parsing settings {}", path.display()))?
            }
            None => ChaosGameSettings::default(),
        };
        if let Some(n) = self.vertices {
            settings.polygon_vertex_count = n;
        }
        if let Some(f) = self.distance_factor {
            settings.distance_factor = f;
        }
        if let Some(strategy) = self.strategy {
            settings.vertex_selection_strategy = strategy;
        }
        settings.validate()?;
        Ok(settings)
    }
}

fn main() -> Result<()> {
    SubscriberBuilder::default()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Run {
            game,
            rate,
            seconds,
            max_tick_frequency,
            out,
        } => {
            let settings = game.resolve()?;
            run(settings, rate, seconds, max_tick_frequency, cmd.seed, &out)
        }
        Action::Sample { game, count, out } => {
            let settings = game.resolve()?;
            sample(settings, count, cmd.seed, &out)
        }
        Action::Plan {
            rate,
            max_tick_frequency,
        } => plan(rate, max_tick_frequency),
        Action::Report => report(),
    }
}

fn run(
    settings: ChaosGameSettings,
    rate: u32,
    seconds: f64,
    max_tick_frequency: u32,
    seed: Option<u64>,
    out: &Path,
) -> Result<()> {
    let duration = Duration::try_from_secs_f64(seconds).with_context(|| {
        format!("--seconds must be a finite non-negative number, got {seconds}")
    })?;
    let Some(deadline) = Instant::now().checked_add(duration) else {
        bail!("--seconds is too large, got {seconds}");
    };
    let cfg = RunnerCfg {
        rate,
        max_tick_frequency,
        seed,
        ..RunnerCfg::default()
    };
    let mut runner = ChaosGameRunner::new(settings, cfg)?;
    tracing::info!(strategy = %settings.vertex_selection_strategy, rate, seconds, "run");

    let mut points = Vec::new();
    runner.start()?;
    while Instant::now() < deadline {
        std::thread::sleep(FLUSH_INTERVAL.min(deadline.saturating_duration_since(Instant::now())));
        let flushed = runner.flush_accumulated_points();
        tracing::trace!(n = flushed.len(), "flush");
        points.extend(flushed);
    }
    runner.stop();
    points.extend(runner.flush_accumulated_points());
    tracing::info!(iteration = runner.iteration(), "run finished");

    let doc = PointsDoc::new(
        settings,
        Some(rate),
        runner.polygon(),
        runner.initial_point(),
        &points,
    );
    write_points(out, &doc)?;
    let payload = Payload::new(
        "run",
        json!({
            "settings": settings,
            "rate": rate,
            "seconds": seconds,
            "max_tick_frequency": max_tick_frequency,
            "iteration": doc.iteration
        }),
    )
    .with_seed(seed);
    write_sidecar(out, payload)?;
    Ok(())
}

fn sample(settings: ChaosGameSettings, count: usize, seed: Option<u64>, out: &Path) -> Result<()> {
    tracing::info!(strategy = %settings.vertex_selection_strategy, count, "sample");
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut generator = settings.make_generator(&Rect::unit(), rng)?;
    let points = generator.generate_batch(count);
    let doc = PointsDoc::new(
        settings,
        None,
        generator.polygon(),
        generator.initial_point(),
        &points,
    );
    write_points(out, &doc)?;
    let payload = Payload::new("sample", json!({ "settings": settings, "count": count }))
        .with_seed(seed);
    write_sidecar(out, payload)?;
    Ok(())
}

fn plan(rate: u32, max_tick_frequency: u32) -> Result<()> {
    let plan = BatchPlan::new(rate, max_tick_frequency)?;
    let obj = json!({
        "rate": plan.rate(),
        "maxTickFrequency": plan.max_tick_frequency(),
        "tickFrequency": plan.tick_frequency(),
        "tickIntervalSecs": plan.tick_interval().as_secs_f64(),
        "baseBatchSize": plan.base_batch_size(),
        "remainder": plan.remainder(),
        "pointsPerCycle": points_per_cycle(&plan),
        "cycle": plan.cycle().collect::<Vec<_>>()
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

fn report() -> Result<()> {
    let obj = json!({
        "code_rev": current_git_rev(),
        "engine_version": chaosgame::VERSION,
        "strategies": VertexSelectionStrategy::ALL
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tempfile::tempdir;

    #[test]
    fn flags_override_settings_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"polygonVertexCount": 5, "distanceFactor": 0.4}"#,
        )
        .unwrap();
        let args = GameArgs {
            settings: Some(path),
            distance_factor: Some(0.6),
            strategy: Some(VertexSelectionStrategy::NonRepeating),
            ..GameArgs::default()
        };
        let s = args.resolve().unwrap();
        assert_eq!(s.polygon_vertex_count, 5);
        assert_eq!(s.distance_factor, 0.6);
        assert_eq!(s.vertex_selection_strategy, VertexSelectionStrategy::NonRepeating);
    }

    #[test]
    fn invalid_flags_are_rejected() {
        let args = GameArgs {
            vertices: Some(2),
            ..GameArgs::default()
        };
        assert!(args.resolve().is_err());
        let args = GameArgs {
            distance_factor: Some(1.5),
            ..GameArgs::default()
        };
        assert!(args.resolve().is_err());
    }

    #[test]
    fn strategy_flag_parses_kebab_case() {
        let cmd = Cmd::try_parse_from([
            "chaosgame",
            "sample",
            "--count",
            "3",
            "--out",
            "p.json",
            "--strategy",
            "not-n-places-away:2",
        ])
        .unwrap();
        match cmd.action {
            Action::Sample { game, .. } => assert_eq!(
                game.strategy,
                Some(VertexSelectionStrategy::NotNPlacesAway { n: 2 })
            ),
            _ => panic!("expected sample"),
        }
    }

    #[test]
    fn sample_writes_points_and_sidecar() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("nested/points.json");
        sample(ChaosGameSettings::default(), 50, Some(3), &out).unwrap();

        let doc: Value = serde_json::from_slice(&std::fs::read(&out).unwrap()).unwrap();
        assert_eq!(doc["iteration"], 50);
        assert_eq!(doc["points"].as_array().unwrap().len(), 50);
        assert_eq!(doc["polygon"].as_array().unwrap().len(), 3);
        assert_eq!(doc["settings"]["polygonVertexCount"], 3);
        assert!(doc.get("rate").is_none());

        let sidecar = dir.path().join("nested/points.provenance.json");
        let prov: Value = serde_json::from_slice(&std::fs::read(sidecar).unwrap()).unwrap();
        assert_eq!(prov["command"], "sample");
        assert_eq!(prov["seed"], 3);
    }

    #[test]
    fn sample_is_reproducible_with_seed() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.json");
        let b = dir.path().join("b.json");
        sample(ChaosGameSettings::default(), 100, Some(11), &a).unwrap();
        sample(ChaosGameSettings::default(), 100, Some(11), &b).unwrap();
        let pa: Value = serde_json::from_slice(&std::fs::read(a).unwrap()).unwrap();
        let pb: Value = serde_json::from_slice(&std::fs::read(b).unwrap()).unwrap();
        assert_eq!(pa["points"], pb["points"]);
    }

    #[test]
    fn run_collects_every_point() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("run.json");
        run(ChaosGameSettings::default(), 600, 0.1, 60, Some(5), &out).unwrap();
        let doc: Value = serde_json::from_slice(&std::fs::read(&out).unwrap()).unwrap();
        let n = doc["points"].as_array().unwrap().len();
        assert_eq!(doc["iteration"].as_u64().unwrap() as usize, n);
        // first tick fires immediately
        assert!(n >= 10);
        assert_eq!(doc["rate"], 600);
    }

    #[test]
    fn run_rejects_unrepresentable_durations() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("run.json");
        for seconds in [-1.0, f64::NAN, f64::INFINITY, 1e30, 1e19] {
            assert!(
                run(ChaosGameSettings::default(), 10, seconds, 60, None, &out).is_err(),
                "seconds = {seconds}"
            );
        }
        assert!(!out.exists());
    }
}
