mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    coach::CoachSubcommand, config::ConfigSubcommand, goal::GoalSubcommand,
    tactic::TacticSubcommand, vision::VisionSubcommand, week::WeekSubcommand,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "catalyst",
    about = "12-Week Year execution tracker: vision, goals, tactics and weekly scores",
    version,
    propagate_version = true
)]
struct Cli {
    /// Data root (default: nearest directory with .catalyst/, else $HOME)
    #[arg(long, global = true, env = "CATALYST_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create .catalyst/ with a default config and a fresh 12-week cycle
    Init,

    /// Show the dashboard: current week, scores, streak, goal progress
    Status,

    /// Show, edit or refine the vision
    Vision {
        #[command(subcommand)]
        subcommand: VisionSubcommand,
    },

    /// Manage goals (at most three per cycle)
    Goal {
        #[command(subcommand)]
        subcommand: GoalSubcommand,
    },

    /// Manage the tactics of a goal
    Tactic {
        #[command(subcommand)]
        subcommand: TacticSubcommand,
    },

    /// Weekly execution: completions and reflections
    Week {
        #[command(subcommand)]
        subcommand: WeekSubcommand,
    },

    /// Print the weekly accountability meeting agenda
    Wam {
        /// Week to review (default: the week before the current one)
        #[arg(long, short = 'w')]
        week: Option<u32>,
    },

    /// Ask the coach for a critique or a recovery plan
    Coach {
        #[command(subcommand)]
        subcommand: CoachSubcommand,
    },

    /// Export a recurring daily time block as an iCalendar file
    Calendar {
        /// Block kind: strategic, buffer or breakout (default from config)
        #[arg(long)]
        kind: Option<String>,
        /// Start hour in UTC, 0-23 (default from config)
        #[arg(long)]
        hour: Option<u32>,
        /// Output file (default: <kind>_blocks.ics in the current directory)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Show or validate the configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Run the HTTP API server
    Ui {
        /// Port to listen on (0 = OS-assigned)
        #[arg(long, default_value = "3412")]
        port: u16,

        /// Open the dashboard summary in a browser
        #[arg(long)]
        open: bool,

        /// Keep the cycle in memory only; nothing is written
        #[arg(long)]
        ephemeral: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Ui { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = root::resolve_root(cli.root.as_deref()).and_then(|root| match cli.command {
        Commands::Init => cmd::init::run(&root, cli.json),
        Commands::Status => cmd::status::run(&root, cli.json),
        Commands::Vision { subcommand } => cmd::vision::run(&root, subcommand, cli.json),
        Commands::Goal { subcommand } => cmd::goal::run(&root, subcommand, cli.json),
        Commands::Tactic { subcommand } => cmd::tactic::run(&root, subcommand, cli.json),
        Commands::Week { subcommand } => cmd::week::run(&root, subcommand, cli.json),
        Commands::Wam { week } => cmd::wam::run(&root, week, cli.json),
        Commands::Coach { subcommand } => cmd::coach::run(&root, subcommand, cli.json),
        Commands::Calendar { kind, hour, output } => {
            cmd::calendar::run(&root, kind.as_deref(), hour, output, cli.json)
        }
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
        Commands::Ui {
            port,
            open,
            ephemeral,
        } => cmd::ui::run(&root, port, open, ephemeral),
    });

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
