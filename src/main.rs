mod canvas;
mod color;
mod config;
mod error;
mod forest;
mod grove;
mod help;
mod logging;
mod random;
mod settings;
mod shapes;
mod terminal;
mod tree;

use clap::{Args, Parser, Subcommand};
use config::{GroveConfig, PrintConfig};
use error::Result;
use settings::{GroveSettings, Settings};

#[derive(Parser)]
#[command(name = "canopy")]
#[command(author = "Terminal Art Generator")]
#[command(version)]
#[command(about = "Terminal generative art: a forest of procedurally grown trees")]
#[command(long_about = None)]
struct Cli {
    /// Log at debug level (see the log file under the cache directory)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every subcommand that grows trees
#[derive(Args)]
struct TreeArgs {
    /// Animation step delay in seconds
    #[arg(short, long)]
    time: Option<f32>,

    /// Random seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,

    /// Trees kept before the oldest is removed
    #[arg(short = 'n', long)]
    max_trees: Option<usize>,

    /// Trunk growth per frame, in world units
    #[arg(long)]
    growth_speed: Option<f32>,

    /// Length multiplier per branch generation (0-1)
    #[arg(long)]
    branch_factor: Option<f32>,

    /// Chance that an outer branch bears fruit (0-1)
    #[arg(long)]
    fruit_probability: Option<f32>,

    /// World units spanning the terminal height (smaller = bigger trees)
    #[arg(long)]
    world_height: Option<f32>,
}

impl TreeArgs {
    fn overrides(&self) -> GroveSettings {
        GroveSettings {
            time_step: self.time,
            max_trees: self.max_trees,
            growth_speed: self.growth_speed,
            branch_factor: self.branch_factor,
            fruit_probability: self.fruit_probability,
            world_height: self.world_height,
        }
    }

    fn resolve(&self, settings: &Settings) -> Result<GroveConfig> {
        GroveConfig::resolve(&self.overrides(), &settings.grove, self.seed)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Grow an animated forest; click to plant trees
    Grove {
        #[command(flatten)]
        tree: TreeArgs,
    },

    /// Grow trees off-screen and print the result to stdout
    Print {
        #[command(flatten)]
        tree: TreeArgs,

        /// Frames to grow before printing (default: until fully grown)
        #[arg(long)]
        ticks: Option<u32>,

        /// Extra randomly placed trees
        #[arg(long, default_value = "0")]
        trees: usize,

        /// Output width in columns (default: terminal width)
        #[arg(long)]
        width: Option<u16>,

        /// Output height in rows (default: terminal height)
        #[arg(long)]
        height: Option<u16>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = logging::init(cli.verbose) {
        tracing::debug!(path = %path.display(), "logging initialized");
    }
    let settings = Settings::load();

    match cli.command {
        Commands::Grove { tree } => {
            let config = tree.resolve(&settings)?;
            grove::run(&config)?;
        }
        Commands::Print {
            tree,
            ticks,
            trees,
            width,
            height,
        } => {
            let config = PrintConfig {
                grove: tree.resolve(&settings)?,
                ticks,
                extra_trees: trees,
                width,
                height,
            };
            grove::print(&config)?;
        }
    }

    Ok(())
}
