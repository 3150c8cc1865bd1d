use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Args as ClapArgs, Parser, Subcommand};

use crate::constants::limits;
use crate::upstream::{Cluster, Platform};

fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Red.on_default())
}

fn parse_platform(raw: &str) -> Result<Platform, String> {
    raw.parse::<Platform>().map_err(|e| e.to_string())
}

fn parse_cluster(raw: &str) -> Result<Cluster, String> {
    raw.parse::<Cluster>().map_err(|e| e.to_string())
}

/// Player profile aggregator for the League of Legends developer API
///
/// Resolves a Riot id or global player id, finds the shard the player lives on,
/// and prints aggregated views as JSON. Every command prints one JSON envelope
/// on stdout: the view on success, or `{ "error": ... }` on failure.
///
/// The upstream credential is read from `RIOT_API_KEY` or the config file.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(styles = get_styles())]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// List current configuration settings
    #[arg(long = "list-config", short = 'l', help_heading = "Configuration")]
    pub list_config: bool,

    /// Also write logs to stderr. Logs always go to the log file.
    #[arg(long = "debug", global = true, help_heading = "Debug")]
    pub debug: bool,

    /// Specify a custom log file path. If not provided, logs will be written to the default location.
    #[arg(long = "log-file", global = true, help_heading = "Debug")]
    pub log_file: Option<String>,
}

/// Who to look up and where.
#[derive(ClapArgs, Debug, Clone)]
pub struct PlayerArgs {
    /// Riot id in the form `Name#Tag`
    #[arg(long = "riot-id", conflicts_with = "puuid", required_unless_present = "puuid")]
    pub riot_id: Option<String>,

    /// Global player id (puuid)
    #[arg(long)]
    pub puuid: Option<String>,

    /// Platform hint, either a code (`la1`) or an alias (`lan`, `euw`)
    #[arg(long, value_parser = parse_platform)]
    pub platform: Option<Platform>,

    /// Regional cluster for account and match lookups (`americas`, `europe`, `asia`)
    #[arg(long, value_parser = parse_cluster)]
    pub cluster: Option<Cluster>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Find which shard a player lives on
    Locate {
        #[command(flatten)]
        player: PlayerArgs,

        /// Include every probe attempt in the output
        #[arg(long)]
        trace: bool,
    },

    /// Profile overview: summoner, rank, top mastery and a recent match summary
    Overview {
        #[command(flatten)]
        player: PlayerArgs,

        /// Number of recent matches to summarize (1-20)
        #[arg(long, default_value_t = limits::OVERVIEW_DEFAULT_MATCHES)]
        count: usize,
    },

    /// Champions played recently, by recency and by frequency
    Recent {
        #[command(flatten)]
        player: PlayerArgs,

        /// Number of matches to inspect (1-50)
        #[arg(long, default_value_t = limits::RECENT_DEFAULT_MATCHES)]
        count: usize,

        /// Comma-separated queue ids, e.g. `420,440`
        #[arg(long, value_delimiter = ',')]
        queues: Vec<u32>,
    },

    /// Per-champion statistics over recent matches
    ChampionStats {
        #[command(flatten)]
        player: PlayerArgs,

        /// Number of matches to inspect
        #[arg(long, default_value_t = limits::CHAMPION_STATS_DEFAULT_MATCHES)]
        count: usize,

        /// Comma-separated queue ids, e.g. `420,440`
        #[arg(long, value_delimiter = ',')]
        queues: Vec<u32>,
    },

    /// Champion mastery on one platform
    Mastery {
        #[command(flatten)]
        player: PlayerArgs,

        /// Number of entries in the top list (1-50)
        #[arg(long, default_value_t = limits::MASTERY_DEFAULT_TOP)]
        top: usize,
    },

    /// The game the player is in right now, if any
    Live {
        #[command(flatten)]
        player: PlayerArgs,
    },

    /// One match, raw or summarized for a participant
    Match {
        /// Match id, e.g. `LA1_1234567890`
        match_id: String,

        /// Summarize the match from this participant's point of view
        #[arg(long)]
        puuid: Option<String>,

        /// Platform hint used to pick the cluster
        #[arg(long, value_parser = parse_platform)]
        platform: Option<Platform>,

        #[arg(long, value_parser = parse_cluster)]
        cluster: Option<Cluster>,
    },

    /// Gold, creep score, skills, items and objectives over the course of a match
    Timeline {
        match_id: String,

        #[arg(long, value_parser = parse_platform)]
        platform: Option<Platform>,

        #[arg(long, value_parser = parse_cluster)]
        cluster: Option<Cluster>,
    },
}
