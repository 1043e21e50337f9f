use agent_chat::{ChatMode, ChatSession};
use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use flight_plan::{areas, create_dispatcher, FunctionCall, PathRequest, Pattern, ZoneQuery};
use intent_parser::IntentParser;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

mod config;
use config::TwinConfig;

#[derive(Parser, Debug)]
#[command(
    name = "twin",
    version,
    about = "Urban thermal twin flight planner",
    disable_help_subcommand = true
)]
struct Cli {
    /// JSON config file (defaults are used when it does not exist)
    #[arg(long, global = true, default_value = "twin.json")]
    config: PathBuf,

    /// Seed for reproducible draws (overrides the config file)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum PatternArg {
    Circle,
    Grid,
    Spiral,
    Line,
}

impl From<PatternArg> for Pattern {
    fn from(p: PatternArg) -> Self {
        match p {
            PatternArg::Circle => Pattern::Circle,
            PatternArg::Grid => Pattern::Grid,
            PatternArg::Spiral => Pattern::Spiral,
            PatternArg::Line => Pattern::Line,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a config file with default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// List the named campus areas
    Areas,
    /// Parse a request and print the resulting function call
    Parse {
        /// Request text
        #[arg(required = true, trailing_var_arg = true)]
        text: Vec<String>,
    },
    /// Generate a flight path for one UAV
    Plan {
        /// UAV id, e.g. UAV-01
        #[arg(long)]
        uav: String,
        /// Area slug, e.g. parking_area
        #[arg(long)]
        area: String,
        #[arg(long, default_value_t = 10)]
        waypoints: u32,
        /// Altitude in meters
        #[arg(long, default_value_t = 100.0)]
        altitude: f64,
        #[arg(long, value_enum, default_value_t = PatternArg::Circle)]
        pattern: PatternArg,
    },
    /// Thermal risk assessment for a zone
    Analyze {
        /// Zone display name
        #[arg(long)]
        zone: String,
        /// Measured temperature in Celsius; drawn at random when omitted
        #[arg(long)]
        temperature: Option<f64>,
    },
    /// Interactive chat on stdin (local parser)
    Chat,
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_tracing();
    let cli = Cli::parse();

    if let Commands::Init { force } = cli.command {
        return init_config(&cli.config, cli.seed, force);
    }

    let mut cfg = TwinConfig::load(&cli.config)?;
    if cli.seed.is_some() {
        cfg.seed = cli.seed;
    }

    match cli.command {
        Commands::Init { .. } => {}
        Commands::Areas => {
            for area in areas::all() {
                println!(
                    "{:<16} {:<16} ({:>5.1}, {:>5.1})",
                    area.slug, area.name, area.x, area.y
                );
            }
        }
        Commands::Parse { text } => {
            let parser = IntentParser::new(cfg.intent)?;
            let intent = parser.parse(&text.join(" "));
            println!("{}", serde_json::to_string_pretty(&intent.to_json())?);
        }
        Commands::Plan {
            uav,
            area,
            waypoints,
            altitude,
            pattern,
        } => {
            let mut dispatcher = create_dispatcher(cfg.planner, cfg.seed)?;
            let request = PathRequest::new(&uav, &area)
                .with_waypoints(waypoints)
                .with_altitude(altitude)
                .with_pattern(pattern.into());
            let result = dispatcher.execute(&FunctionCall::GenerateFlightPath(request));
            println!("{}", serde_json::to_string_pretty(&result)?);
            if !result.success {
                bail!("{}", result.message);
            }
        }
        Commands::Analyze { zone, temperature } => {
            let mut dispatcher = create_dispatcher(cfg.planner, cfg.seed)?;
            let query = ZoneQuery {
                temperature,
                ..ZoneQuery::new(&zone)
            };
            let result = dispatcher.execute(&FunctionCall::AnalyzeThermalZone(query));
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Chat => run_chat(cfg).await?,
    }

    Ok(())
}

fn init_config(path: &Path, seed: Option<u64>, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    let cfg = TwinConfig {
        seed,
        ..TwinConfig::default()
    };
    cfg.save(path)?;
    info!(path = %path.display(), "config written");
    println!("Wrote {}", path.display());
    Ok(())
}

async fn run_chat(cfg: TwinConfig) -> Result<()> {
    let parser = IntentParser::new(cfg.intent)?;
    let dispatcher = create_dispatcher(cfg.planner, cfg.seed)?;
    let mut session = ChatSession::local(parser, dispatcher);

    info!(mode = %session.mode(), "chat session started");
    println!("Thermal twin chat. Commands: :paths, :clear, :mode, :quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "" => continue,
            ":quit" | ":q" => break,
            ":paths" => {
                let snapshot = session.dispatcher().registry().snapshot();
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            }
            ":clear" => {
                let result = session.dispatcher_mut().clear_all();
                println!("{}", result.message);
            }
            ":mode" => println!("{}", session.mode()),
            text => {
                let reply = session.send(text).await;
                if let Some(notice) = &reply.notice {
                    println!("[{}] {}", ChatMode::Local, notice);
                }
                println!("{}", reply.text);
                if let Some(path) = reply.action.as_ref().and_then(|a| a.data.as_ref()) {
                    for wp in &path.waypoints {
                        println!(
                            "  {:<6} x={:>5.1} y={:>5.1} alt={:>6.1}m",
                            wp.id, wp.x, wp.y, wp.altitude
                        );
                    }
                }
            }
        }
    }
    Ok(())
}

fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_loadable_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("twin.json");
        init_config(&path, Some(3), false).unwrap();
        let cfg = TwinConfig::load(&path).unwrap();
        assert_eq!(cfg.seed, Some(3));
        assert_eq!(cfg.planner.max_waypoints, 200);

        assert!(init_config(&path, None, false).is_err());
        init_config(&path, None, true).unwrap();
        assert!(TwinConfig::load(&path).unwrap().seed.is_none());
    }
}
