use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use petkeeper::config::Config;

mod cli;

use cli::claim::ClaimTarget;

#[derive(Parser)]
#[command(name = "petkeeper")]
#[command(about = "Petkeeper - virtual pet care engine")]
#[command(version)]
struct Cli {
    /// Player id to act as
    #[arg(short, long, global = true, default_value_t = 1)]
    user: i64,

    /// Path to the config file (defaults to ~/.petkeeper/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the SQLite database (overrides storage.database_path)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default ~/.petkeeper/config.toml
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },

    /// Show the pet after applying pending decay
    State,

    /// Perform a care action: feed, wash, play, heal, chat, sleep, clean
    Act { action: String },

    /// Use an item from the inventory
    Use { item: String },

    /// Report a finished minigame round
    Minigame {
        game_type: String,
        /// 0-5, 3 or more counts as a win
        score: u32,
        elapsed_ms: u64,
        /// classic or scene3d
        #[arg(long, default_value = "classic")]
        mode: String,
    },

    /// Claim a reward
    Claim {
        #[command(subcommand)]
        target: ClaimTarget,
    },

    /// Buy one unit of a shop item
    Buy { item: String },

    /// Show the shop priced for the pet's level
    Shop {
        /// Only items that are unlocked and affordable
        #[arg(long)]
        affordable: bool,
    },

    /// Show the inventory
    Inventory,

    /// Show today's tasks and reward flags
    Daily,

    /// Show the active live event
    Event,

    /// Show quest progress
    Quests,

    /// Show achievement progress
    Achievements,

    /// Show the login streak
    Streak,

    /// Show recent activity
    History {
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,
    },

    /// Show or change notification preferences
    Prefs {
        #[arg(long)]
        soft_nudges: Option<bool>,
        #[arg(long)]
        daily_report: Option<bool>,
    },

    /// Apply pending decay to every pet once
    DecayAll,

    /// Run decay, nudge and daily report sweeps until Ctrl-C
    Scheduler,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli).await {
        if let Some(body) = cli::user_error_json(&err) {
            cli::print_json(&body)?;
            std::process::exit(2);
        }
        return Err(err);
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    if let Commands::Init { force } = cli.command {
        return cli::init::init_command(cli.config, force).await;
    }

    let config = Config::load(cli.config.as_deref())?;
    let service = cli::open_service(&config, cli.db.as_deref())?;
    let user = cli.user;

    match cli.command {
        Commands::Init { .. } => {}
        Commands::State => cli::pet::state_command(&service, user).await?,
        Commands::Act { action } => cli::pet::act_command(&service, user, &action).await?,
        Commands::Use { item } => cli::pet::use_command(&service, user, &item).await?,
        Commands::Minigame {
            game_type,
            score,
            elapsed_ms,
            mode,
        } => {
            cli::pet::minigame_command(&service, user, game_type, score, elapsed_ms, &mode).await?
        }
        Commands::Claim { target } => cli::claim::claim_command(&service, user, target).await?,
        Commands::Buy { item } => cli::pet::buy_command(&service, user, &item).await?,
        Commands::Shop { affordable } => {
            cli::views::shop_command(&service, user, affordable).await?
        }
        Commands::Inventory => cli::views::inventory_command(&service, user).await?,
        Commands::Daily => cli::views::daily_command(&service, user).await?,
        Commands::Event => cli::views::event_command(&service, user).await?,
        Commands::Quests => cli::views::quests_command(&service, user).await?,
        Commands::Achievements => cli::views::achievements_command(&service, user).await?,
        Commands::Streak => cli::views::streak_command(&service, user).await?,
        Commands::History { limit } => cli::views::history_command(&service, user, limit).await?,
        Commands::Prefs {
            soft_nudges,
            daily_report,
        } => cli::views::prefs_command(&service, user, soft_nudges, daily_report).await?,
        Commands::DecayAll => cli::scheduler::decay_all_command(&service).await?,
        Commands::Scheduler => {
            cli::scheduler::scheduler_command(service, &config.scheduler).await?
        }
    }

    Ok(())
}
