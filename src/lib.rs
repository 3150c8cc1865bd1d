//! Player profile aggregator for the League of Legends developer API
//!
//! This library resolves a player from a Riot id or a global player id, finds
//! the platform shard that player lives on, and composes rate-limited upstream
//! calls into aggregated views: profile overview, recent champions, champion
//! statistics, mastery, live game, match summary and timeline.
//!
//! # Examples
//!
//! ```rust,no_run
//! use rift_aggregator::aggregate::{AppContext, PlayerQuery};
//! use rift_aggregator::boundary::Envelope;
//! use rift_aggregator::config::Config;
//! use rift_aggregator::error::AppError;
//! use rift_aggregator::resolver::PlayerRef;
//! use rift_aggregator::upstream::Platform;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     // Reads the config file and RIOT_API_KEY
//!     let config = Config::load().await?;
//!     let ctx = AppContext::new(&config)?;
//!
//!     let query = PlayerQuery::new(PlayerRef::riot_id("Example#123")?).on_platform(Platform::La1);
//!     let report = ctx.aggregator().recent_champions(&query, 10, &[420, 440]).await;
//!
//!     let envelope = Envelope::from_report(report);
//!     println!("{}", serde_json::to_string_pretty(&envelope.body)?);
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod boundary;
pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod models;
pub mod resolver;
pub mod scheduler;
pub mod testing_utils;
pub mod upstream;

// Re-export commonly used types for convenience
pub use aggregate::{AppContext, Aggregator, PlayerQuery, Report};
pub use boundary::Envelope;
pub use config::Config;
pub use error::AppError;
pub use resolver::{Outcome, PlayerRef};
pub use scheduler::{QueueClass, Scheduler, SchedulerConfig};
pub use upstream::{Cluster, GameApi, Platform};

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
