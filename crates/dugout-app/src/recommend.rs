// Daily sit/start recommendations for the fantasy roster.

use crate::dataset::{
    data_dir, load_dataset_through, local_start_time, output_dir, roster_player_id, roster_team,
    team_games_on, weight_store,
};
use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use dugout_baseball::combiner::combine;
use dugout_baseball::context::Dataset;
use dugout_baseball::factors::score_all;
use dugout_baseball::recommend::{
    recommendations_path, write_recommendations, Recommendation, RecommendationRow,
};
use dugout_core::config::{Config, RecommendConfig};
use dugout_core::data::roster::load_latest_roster;
use dugout_core::data::{RosterEntry, ScheduledGame};
use dugout_core::weights::WeightStore;
use std::path::PathBuf;
use tracing::{info, warn};

/// Score one player in one game and label the result.
pub(crate) fn score_player_game(
    data: &Dataset,
    store: &WeightStore,
    thresholds: &RecommendConfig,
    entry: &RosterEntry,
    player_id: u64,
    team: &str,
    game: &ScheduledGame,
) -> Option<RecommendationRow> {
    let ctx = data.context_for_scheduled(
        player_id,
        &entry.player_name,
        team,
        game,
        entry.injury_status(),
    )?;
    let scores = score_all(&ctx, data);
    let (weights, source) = store.weights_for(&entry.player_name);
    let final_score = combine(&scores, &weights);
    Some(RecommendationRow {
        date: game.game_date,
        player_name: entry.player_name.clone(),
        fantasy_team: entry.fantasy_team.clone(),
        mlb_team: entry.mlb_team.clone(),
        position: entry.position.clone(),
        game_pk: game.game_pk,
        opponent: ctx.opponent.clone(),
        game_time: local_start_time(game),
        final_score,
        recommendation: Recommendation::classify(final_score, thresholds),
        weight_source: source.label().to_string(),
        scores,
        weights,
    })
}

pub(crate) fn sort_by_score(rows: &mut [RecommendationRow]) {
    rows.sort_by(|a, b| {
        b.final_score
            .total_cmp(&a.final_score)
            .then_with(|| a.player_name.cmp(&b.player_name))
    });
}

/// Rows for every rostered hitter with a game on `date`, best first.
/// Doubleheaders give one row per game.
pub fn build_recommendations(
    data: &Dataset,
    roster: &[RosterEntry],
    store: &WeightStore,
    thresholds: &RecommendConfig,
    date: NaiveDate,
) -> Vec<RecommendationRow> {
    let mut rows = Vec::new();
    for entry in roster.iter().filter(|e| !e.is_pitcher()) {
        let Some(player_id) = roster_player_id(data, entry) else {
            warn!("{} is not in the player directory, skipping", entry.player_name);
            continue;
        };
        let team = roster_team(data, entry, Some(player_id));
        let games = team_games_on(data, &team, date);
        if games.is_empty() {
            info!("{} ({team}) has no game on {date}", entry.player_name);
            continue;
        }
        for game in games {
            if let Some(row) =
                score_player_game(data, store, thresholds, entry, player_id, &team, game)
            {
                rows.push(row);
            }
        }
    }
    sort_by_score(&mut rows);
    rows
}

/// Score the latest roster for `date` and write the recommendations CSV.
pub fn run_recommendations(
    config: &Config,
    date: NaiveDate,
    now: NaiveDateTime,
) -> Result<(PathBuf, Vec<RecommendationRow>)> {
    let (roster_path, roster) = load_latest_roster(&data_dir(config))?;
    info!("using roster {}", roster_path.display());
    let data = load_dataset_through(config, date)?;
    let store = weight_store(config);

    let rows = build_recommendations(&data, &roster, &store, &config.recommend, date);
    if rows.is_empty() {
        warn!("no rostered hitters have a game on {date}");
    }
    let path = recommendations_path(&output_dir(config), now);
    write_recommendations(&path, &rows)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("wrote {} recommendations to {}", rows.len(), path.display());
    Ok((path, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use dugout_core::factor::Factor;
    use dugout_core::weights::FactorWeights;

    #[test]
    fn rostered_hitters_with_games_are_scored() {
        let data = sample_dataset();
        let roster = vec![
            roster_entry("Aaron Judge", "NYY", "OF", ""),
            roster_entry("Gerrit Cole", "NYY", "SP", ""),
            roster_entry("Nobody Known", "NYY", "OF", ""),
            roster_entry("Kris Bryant", "COL", "1B", ""),
        ];
        let store = WeightStore::default();
        let rows = build_recommendations(
            &data,
            &roster,
            &store,
            &RecommendConfig::default(),
            d("2024-06-01"),
        );
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.player_name, "Aaron Judge");
        assert_eq!(row.opponent, "Boston Red Sox");
        assert_eq!(row.weight_source, "global");
        assert_eq!(
            row.recommendation,
            Recommendation::classify(row.final_score, &RecommendConfig::default())
        );
    }

    #[test]
    fn shared_name_uses_the_rostered_team() {
        let mut inputs = sample_inputs();
        inputs
            .players
            .push(player(10, "Will Smith", "Kansas City Royals", "P"));
        inputs
            .players
            .push(player(11, "Will Smith", "New York Yankees", "C"));
        let data = Dataset::build(inputs);
        let roster = vec![roster_entry("Will Smith", "NYY", "C", "")];
        let rows = build_recommendations(
            &data,
            &roster,
            &WeightStore::default(),
            &RecommendConfig::default(),
            d("2024-06-01"),
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].mlb_team, "NYY");
        assert_eq!(rows[0].opponent, "Boston Red Sox");
    }

    #[test]
    fn player_overrides_and_injuries_flow_through() {
        let data = sample_dataset();
        let mut store = WeightStore::default();
        let mut only_injury = FactorWeights::from_array([0.0; Factor::COUNT]);
        only_injury.set(Factor::Injury, 1.0);
        store.set_player("aaron judge", only_injury);

        let roster = vec![roster_entry("Aaron Judge", "NYY", "OF", "IL10")];
        let rows = build_recommendations(
            &data,
            &roster,
            &store,
            &RecommendConfig::default(),
            d("2024-06-01"),
        );
        assert_eq!(rows[0].weight_source, "player");
        assert!((rows[0].final_score + 0.8).abs() < 1e-9);
        assert_eq!(rows[0].recommendation, Recommendation::StrongSit);
    }
}
