//! Derived per-match statistics and the rounding conventions used by the views

/// Kill/death/assist ratio. With zero deaths the ratio is the kill-plus-assist sum.
pub fn kda(kills: u32, deaths: u32, assists: u32) -> f64 {
    let takedowns = f64::from(kills) + f64::from(assists);
    if deaths == 0 {
        takedowns
    } else {
        takedowns / f64::from(deaths)
    }
}

/// Rounds half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Win percentage in the 0..=100 range; zero games is 0.
pub fn win_percentage(wins: u32, games: u32) -> f64 {
    if games == 0 {
        return 0.0;
    }
    f64::from(wins) / f64::from(games) * 100.0
}

/// Win rate rounded to one decimal (recent champions, overview summary).
pub fn win_rate_one_decimal(wins: u32, games: u32) -> f64 {
    round_to(win_percentage(wins, games), 1)
}

/// Win rate rounded to the nearest whole percent (champion stats).
pub fn win_rate_whole(wins: u32, games: u32) -> u32 {
    win_percentage(wins, games).round() as u32
}

/// Creep score per minute; a zero-length window counts as one minute.
pub fn cs_per_minute(creep_score: u32, minutes: f64) -> f64 {
    let minutes = if minutes > 0.0 { minutes } else { 1.0 };
    f64::from(creep_score) / minutes
}
