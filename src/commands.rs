use crate::aggregate::{AppContext, PlayerQuery, Report};
use crate::boundary::Envelope;
use crate::cli::{Command, PlayerArgs};
use crate::config::Config;
use crate::error::AppError;
use crate::resolver::{IdentityRouting, PlayerRef};
use crate::upstream::{Cluster, Platform};
use tracing::info;

/// Builds a lookup from the player options of a subcommand.
pub fn player_query(args: &PlayerArgs) -> Result<PlayerQuery, AppError> {
    let player = match (&args.riot_id, &args.puuid) {
        (Some(riot_id), _) => PlayerRef::riot_id(riot_id)?,
        (None, Some(puuid)) => PlayerRef::global_id(puuid)?,
        (None, None) => {
            return Err(AppError::validation("either --riot-id or --puuid is required"));
        }
    };
    Ok(PlayerQuery {
        player,
        platform: args.platform,
        cluster: args.cluster,
    })
}

/// Cluster for match-scoped commands: explicit cluster, then the platform hint.
pub fn match_cluster(platform: Option<Platform>, cluster: Option<Cluster>) -> Cluster {
    IdentityRouting {
        cluster,
        platform_hint: platform,
    }
    .cluster()
}

/// Runs one subcommand and converts its result into an envelope.
///
/// Never fails: every error is already folded into the envelope body.
pub async fn execute(ctx: &AppContext, command: &Command) -> Envelope {
    let aggregator = ctx.aggregator();
    info!("Running {} command", command_name(command));

    match command {
        Command::Locate { player, trace } => match player_query(player) {
            Ok(query) => Envelope::from_outcome(
                aggregator
                    .locate(&query, *trace)
                    .await
                    .map(|outcome| outcome.map(Report::complete)),
            ),
            Err(e) => Envelope::error(&e),
        },
        Command::Overview { player, count } => match player_query(player) {
            Ok(query) => Envelope::from_outcome(aggregator.overview(&query, *count).await),
            Err(e) => Envelope::error(&e),
        },
        Command::Recent {
            player,
            count,
            queues,
        } => match player_query(player) {
            Ok(query) => {
                Envelope::from_report(aggregator.recent_champions(&query, *count, queues).await)
            }
            Err(e) => Envelope::error(&e),
        },
        Command::ChampionStats {
            player,
            count,
            queues,
        } => match player_query(player) {
            Ok(query) => {
                Envelope::from_report(aggregator.champion_stats(&query, *count, queues).await)
            }
            Err(e) => Envelope::error(&e),
        },
        Command::Mastery { player, top } => match player_query(player) {
            Ok(query) => Envelope::from_report(aggregator.mastery(&query, *top).await),
            Err(e) => Envelope::error(&e),
        },
        Command::Live { player } => match player_query(player) {
            Ok(query) => Envelope::from_outcome(
                aggregator
                    .live_game(&query)
                    .await
                    .map(|outcome| outcome.map(Report::complete)),
            ),
            Err(e) => Envelope::error(&e),
        },
        Command::Match {
            match_id,
            puuid,
            platform,
            cluster,
        } => Envelope::from_report(
            aggregator
                .match_summary(
                    match_cluster(*platform, *cluster),
                    match_id,
                    puuid.as_deref(),
                )
                .await
                .map(Report::complete),
        ),
        Command::Timeline {
            match_id,
            platform,
            cluster,
        } => Envelope::from_report(
            aggregator
                .timeline(match_cluster(*platform, *cluster), match_id)
                .await
                .map(Report::complete),
        ),
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Locate { .. } => "locate",
        Command::Overview { .. } => "overview",
        Command::Recent { .. } => "recent",
        Command::ChampionStats { .. } => "champion-stats",
        Command::Mastery { .. } => "mastery",
        Command::Live { .. } => "live",
        Command::Match { .. } => "match",
        Command::Timeline { .. } => "timeline",
    }
}

/// Prints the envelope body as pretty JSON on stdout.
pub fn print_envelope(envelope: &Envelope) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(&envelope.body)?;
    println!("{rendered}");
    Ok(())
}

/// Handles the --list-config command.
pub async fn handle_list_config_command() -> Result<(), AppError> {
    Config::display().await
}
