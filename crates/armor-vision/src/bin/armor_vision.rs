//! armor-vision CLI: run the targeting pipeline over image files.

use std::io::Write;
use std::path::{Path, PathBuf};

use armor_vision::{load_frame, ArmorPipeline, DebugCanvas, PipelineConfig};
use clap::{Args, Parser, Subcommand};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "armor-vision")]
#[command(about = "Detect armor plates from light bars and emit targeting decisions")]
#[command(version)]
struct Cli {
    /// Log level for stderr output (off, error, warn, info, debug, trace).
    /// With tracing enabled, `RUST_LOG` overrides it.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Emit tracing spans as JSON lines.
    #[cfg(feature = "tracing")]
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Track over a sequence of frames, printing one JSON report per frame.
    Track(TrackArgs),

    /// Print or write the default pipeline configuration.
    DefaultConfig {
        /// Write to this file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Args)]
struct TrackArgs {
    /// Pipeline configuration (JSON). Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for annotated frames.
    #[arg(long)]
    debug_dir: Option<PathBuf>,

    /// Frames in playback order.
    #[arg(required = true)]
    frames: Vec<PathBuf>,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    match cli.command {
        Commands::Track(args) => run_track(&args),
        Commands::DefaultConfig { out } => run_default_config(out.as_deref()),
    }
}

#[cfg(feature = "tracing")]
fn init_logging(cli: &Cli) {
    use armor_vision::core::{init_tracing, parse_level_filter};
    let _ = tracing_log::LogTracer::init();
    init_tracing(cli.json_logs, parse_level_filter(&cli.log_level));
}

#[cfg(not(feature = "tracing"))]
fn init_logging(cli: &Cli) {
    use armor_vision::core::{init_with_level, parse_level_filter};
    let _ = init_with_level(parse_level_filter(&cli.log_level));
}

fn run_track(args: &TrackArgs) -> CliResult<()> {
    let mut pipeline = match &args.config {
        Some(path) => ArmorPipeline::from_config_file(path)?,
        None => ArmorPipeline::from_config(&PipelineConfig::default())?,
    };

    if let Some(dir) = &args.debug_dir {
        std::fs::create_dir_all(dir)?;
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for (index, path) in args.frames.iter().enumerate() {
        let frame = load_frame(path)?;
        let mut canvas = args
            .debug_dir
            .as_ref()
            .map(|_| DebugCanvas::new(frame.clone()));

        let report = pipeline.process_frame(&frame, canvas.as_mut())?;
        writeln!(out, "{}", serde_json::to_string(&report)?)?;

        if let (Some(dir), Some(canvas)) = (&args.debug_dir, canvas) {
            let target = dir.join(format!("frame_{index:05}.png"));
            canvas.into_image().save(&target)?;
            log::info!("wrote {}", target.display());
        }
    }
    Ok(())
}

fn run_default_config(out: Option<&Path>) -> CliResult<()> {
    let config = PipelineConfig::default();
    match out {
        Some(path) => {
            config.write_json(path)?;
            log::info!("wrote default config to {}", path.display());
        }
        None => println!("{}", config.to_json_pretty()?),
    }
    Ok(())
}
