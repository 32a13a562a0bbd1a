// When to run the daily recommendations: the roster's games on a date and a
// cron line that fires shortly before the first one.

use crate::dataset::{roster_player_id, roster_team, team_games_on};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use dugout_baseball::context::Dataset;
use dugout_core::data::{RosterEntry, ScheduledGame};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct RosterGame<'a> {
    pub game: &'a ScheduledGame,
    /// Rostered hitters playing in the game, in roster order.
    pub players: Vec<String>,
}

/// The roster's games on `date`, earliest start first.
pub fn roster_games<'a>(
    data: &'a Dataset,
    roster: &[RosterEntry],
    date: NaiveDate,
) -> Vec<RosterGame<'a>> {
    let mut by_game: BTreeMap<u64, RosterGame<'a>> = BTreeMap::new();
    for entry in roster.iter().filter(|e| !e.is_pitcher()) {
        let player_id = roster_player_id(data, entry);
        let team = roster_team(data, entry, player_id);
        for game in team_games_on(data, &team, date) {
            by_game
                .entry(game.game_pk)
                .or_insert_with(|| RosterGame {
                    game,
                    players: Vec::new(),
                })
                .players
                .push(entry.player_name.clone());
        }
    }
    let mut games: Vec<RosterGame<'a>> = by_game.into_values().collect();
    games.sort_by_key(|g| (g.game.game_datetime.is_none(), g.game.game_datetime, g.game.game_pk));
    games
}

/// `lead_minutes` before the earliest known first pitch.
pub fn suggested_run_time(games: &[RosterGame<'_>], lead_minutes: i64) -> Option<DateTime<Utc>> {
    games
        .iter()
        .filter_map(|g| g.game.game_datetime)
        .min()
        .map(|first| first - Duration::minutes(lead_minutes))
}

/// Crontab entry for a one-off run at `time` (local wall-clock).
pub fn cron_line(time: NaiveDateTime, command: &str) -> String {
    format!("{}  {command}", time.format("%M %H %d %m *"))
}
