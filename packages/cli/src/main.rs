#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Truck trajectory simulator.
//!
//! ```text
//! truck_sim metros
//! truck_sim generate [--from NAME --to NAME] [--count N] [--speed KMH]
//!                    [--seed N] [--classify] [--window N] [--output PATH]
//! ```
//!
//! Both commands accept `--config PATH`; without it the embedded default
//! configuration is used. Log output goes through `indicatif-log-bridge`
//! (via [`truck_sim_cli_utils::init_logger`]) so log lines and progress
//! bars never fight for the terminal.

mod config;
mod report;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use rand::SeedableRng;
use rand::rngs::StdRng;
use truck_sim_classifier::config::create_classifier;
use truck_sim_cli_utils::{IndicatifProgress, MultiProgress};
use truck_sim_router::config::RouterConfig;
use truck_sim_router::create_router;
use truck_sim_trajectory::generator::{TrajectoryGenerator, random_avg_speed};
use truck_sim_trajectory::registry::MetroRegistry;
use truck_sim_trajectory_models::RouterBackend;

use crate::config::AppConfig;
use crate::report::TrajectoryReport;

#[derive(Parser)]
#[command(
    name = "truck_sim",
    about = "Simulate per-minute truck trajectories between US metro areas"
)]
struct Cli {
    /// TOML configuration file (defaults to the embedded configuration)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the registered metro areas
    Metros,
    /// Generate trajectories and print them as JSON
    Generate(GenerateArgs),
}

#[derive(Args)]
struct GenerateArgs {
    /// Start metro (requires --to)
    #[arg(long, requires = "to")]
    from: Option<String>,

    /// End metro (requires --from)
    #[arg(long, requires = "from")]
    to: Option<String>,

    /// Number of trajectories to generate
    #[arg(long, default_value = "1")]
    count: u32,

    /// Average speed in km/h (random in [70, 95) when omitted)
    #[arg(long)]
    speed: Option<f64>,

    /// Seed for metro pair and speed selection
    #[arg(long)]
    seed: Option<u64>,

    /// Attach a state label to every trajectory point
    #[arg(long)]
    classify: bool,

    /// Rolling mean window (overrides `speeds.rolling_window`)
    #[arg(long)]
    window: Option<usize>,

    /// Routing backend (overrides `router.type`)
    #[arg(long, value_enum)]
    router: Option<BackendArg>,

    /// Routing service base URL (overrides `router.base_url`)
    #[arg(long)]
    router_url: Option<String>,

    /// Write the JSON here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum BackendArg {
    Osrm,
    Valhalla,
}

impl From<BackendArg> for RouterBackend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Osrm => Self::Osrm,
            BackendArg::Valhalla => Self::Valhalla,
        }
    }
}

impl GenerateArgs {
    /// `base` with the command-line overrides applied.
    fn router_config(&self, base: &RouterConfig) -> RouterConfig {
        let mut config = base.clone();
        if let Some(backend) = self.router {
            config = config.with_backend(backend.into());
        }
        if let Some(url) = &self.router_url {
            config.set_base_url(url.clone());
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = truck_sim_cli_utils::init_logger();
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Metros => {
            let registry = MetroRegistry::load(&config.metros_file)?;
            for name in registry.names() {
                println!("{name}");
            }
            println!("\n{} metro(s)", registry.len());
        }
        Commands::Generate(args) => generate(&config, &args, &multi).await?,
    }

    Ok(())
}

async fn generate(
    config: &AppConfig,
    args: &GenerateArgs,
    multi: &MultiProgress,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(speed) = args.speed
        && !(speed.is_finite() && speed > 0.0)
    {
        return Err(format!("--speed must be a positive number, got {speed}").into());
    }
    let window = args.window.unwrap_or(config.speeds.rolling_window);
    if window == 0 {
        return Err("--window must be at least 1".into());
    }

    let registry = MetroRegistry::load(&config.metros_file)?;
    let router = create_router(&args.router_config(&config.router))?;
    let generator = TrajectoryGenerator::new(registry, router);
    let classifier = if args.classify {
        Some(create_classifier(&config.classifier)?)
    } else {
        None
    };

    let mut rng = args
        .seed
        .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

    let steps = IndicatifProgress::steps_bar(multi, "Trajectories", u64::from(args.count));
    let mut reports = Vec::new();

    for _ in 0..args.count {
        let (start, end) = match (&args.from, &args.to) {
            (Some(from), Some(to)) => (from.clone(), to.clone()),
            _ => {
                let (start, end) = generator
                    .registry()
                    .random_pair(&mut rng)
                    .ok_or("at least two metros are needed to pick a random pair")?;
                (start.to_string(), end.to_string())
            }
        };
        let speed = args.speed.unwrap_or_else(|| random_avg_speed(&mut rng));

        steps.set_message(format!("{start} -> {end}"));
        let trajectory = generator.generate(&start, &end, speed).await?;
        log::info!(
            "{start} -> {end}: {:.1} km, {} min ({:?})",
            trajectory.distance_km(),
            trajectory.duration_minutes(),
            trajectory.route_source()
        );

        let mut report = TrajectoryReport::new(trajectory, window);
        if let Some(classifier) = &classifier {
            let progress = IndicatifProgress::batch_bar(multi, &format!("States {start} -> {end}"));
            let states = classifier
                .classify_batch(report.trajectory.route_points(), progress.as_ref())
                .await;
            report = report.with_states(states);
        }
        reports.push(report);
        steps.inc(1);
    }
    steps.finish(format!("Generated {} trajectories", reports.len()));

    let json = serde_json::to_string_pretty(&reports)?;
    if let Some(path) = &args.output {
        std::fs::write(path, json)?;
        log::info!("Wrote {} trajectories to {}", reports.len(), path.display());
    } else {
        println!("{json}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("truck_sim").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn generate_defaults() {
        let cli = parse(&["generate"]);
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.count, 1);
        assert!(!args.classify);
        assert!(args.from.is_none() && args.to.is_none());
    }

    #[test]
    fn from_requires_to() {
        let result =
            Cli::try_parse_from(["truck_sim", "generate", "--from", "Philadelphia"]);
        assert!(result.is_err());
    }

    #[test]
    fn config_flag_is_global() {
        let cli = parse(&["metros", "--config", "custom.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
    }

    #[test]
    fn router_overrides_apply() {
        let cli = parse(&[
            "generate",
            "--router",
            "valhalla",
            "--router-url",
            "http://localhost:8002",
        ]);
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        let config = args.router_config(&RouterConfig::default());
        assert_eq!(config.backend(), RouterBackend::Valhalla);
        assert_eq!(config.base_url(), "http://localhost:8002");
    }

    #[test]
    fn no_overrides_keep_config() {
        let cli = parse(&["generate", "--count", "3", "--seed", "7"]);
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.count, 3);
        assert_eq!(args.seed, Some(7));
        assert_eq!(
            args.router_config(&RouterConfig::default()),
            RouterConfig::default()
        );
    }
}
