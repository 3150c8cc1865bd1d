//! Champion mastery listing for one platform

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tracing::instrument;

use super::{Aggregator, PlayerQuery, Report};
use crate::constants::limits;
use crate::error::AppError;
use crate::models::MasteryEntry;
use crate::upstream::Platform;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MasteryCard {
    pub champion_id: u32,
    pub level: u32,
    pub points: u64,
    pub last_played_at: i64,
    /// RFC 3339 rendering of `last_played_at`, absent when out of range
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_played: Option<String>,
}

impl From<MasteryEntry> for MasteryCard {
    fn from(entry: MasteryEntry) -> Self {
        Self {
            champion_id: entry.champion_id,
            level: entry.champion_level,
            points: entry.champion_points,
            last_played_at: entry.last_play_time,
            last_played: format_millis(entry.last_play_time),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MasteryView {
    pub platform: Platform,
    pub global_id: String,
    pub total: usize,
    pub top: usize,
    pub items: Vec<MasteryCard>,
}

fn format_millis(millis: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|at| at.to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// Highest mastery points first, truncated to `top`.
pub fn top_masteries(mut entries: Vec<MasteryEntry>, top: usize) -> Vec<MasteryCard> {
    entries.sort_by(|a, b| b.champion_points.cmp(&a.champion_points));
    entries.into_iter().take(top).map(MasteryCard::from).collect()
}

impl Aggregator<'_> {
    /// Masteries on the requested platform, or the default one.
    ///
    /// Mastery is read from one platform directly without probing, so a player
    /// with no profile there simply has an empty list.
    #[instrument(skip(self))]
    pub async fn mastery(
        &self,
        query: &PlayerQuery,
        top: usize,
    ) -> Result<Report<MasteryView>, AppError> {
        if !(1..=limits::MASTERY_MAX_TOP).contains(&top) {
            return Err(AppError::validation(format!(
                "top must be between 1 and {}",
                limits::MASTERY_MAX_TOP
            )));
        }
        let platform = query.platform.unwrap_or(self.default_platform());
        let global_id = self.global_id(query).await?;

        let entries = self.api().masteries(platform, &global_id).await?;
        let total = entries.len();
        Ok(Report::complete(MasteryView {
            platform,
            global_id,
            total,
            top,
            items: top_masteries(entries, top),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(champion_id: u32, points: u64) -> MasteryEntry {
        MasteryEntry {
            champion_id,
            champion_level: 7,
            champion_points: points,
            last_play_time: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_sorted_by_points_and_truncated() {
        let cards = top_masteries(vec![entry(1, 100), entry(2, 900), entry(3, 500)], 2);
        let ids: Vec<u32> = cards.iter().map(|c| c.champion_id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_last_played_rendered_as_rfc3339() {
        let card = MasteryCard::from(entry(1, 1));
        assert_eq!(card.last_played.as_deref(), Some("2023-11-14T22:13:20Z"));
        assert_eq!(card.last_played_at, 1_700_000_000_000);
    }
}
