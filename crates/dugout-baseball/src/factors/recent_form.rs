// Recent form: rolling windows, hot/cold streaks and trend.

use super::FactorReading;
use crate::context::{Dataset, GameContext};
use crate::stats::BattingLine;
use chrono::{Datelike, Duration, NaiveDate};
use dugout_core::data::GameLog;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Improving,
    Stable,
    Declining,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Trend::Improving => "improving",
            Trend::Stable => "stable",
            Trend::Declining => "declining",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormRating {
    VeryHot,
    Hot,
    Average,
    Cold,
    VeryCold,
}

impl fmt::Display for FormRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FormRating::VeryHot => "Very Hot",
            FormRating::Hot => "Hot",
            FormRating::Average => "Average",
            FormRating::Cold => "Cold",
            FormRating::VeryCold => "Very Cold",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormReport {
    pub last_7: BattingLine,
    pub last_14: BattingLine,
    pub last_30: BattingLine,
    pub season: BattingLine,
    pub hit_streak: usize,
    pub hitless_ab: usize,
    pub is_hot: bool,
    pub is_cold: bool,
    pub score: f64,
    pub trend: Trend,
    pub rating: FormRating,
}

/// Longest run of games with a hit among the 10 most recent.
fn longest_hit_streak(recent_first: &[&GameLog]) -> usize {
    let mut run = 0;
    let mut best = 0;
    for log in recent_first.iter().take(10) {
        if log.h > 0 {
            run += 1;
            best = best.max(run);
        } else {
            run = 0;
        }
    }
    best
}

/// Longest run of hitless at-bats over the 15 most recent games, treating
/// each game's hits as its first at-bats.
fn longest_hitless_run(recent_first: &[&GameLog]) -> usize {
    let mut run = 0;
    let mut best = 0;
    for log in recent_first.iter().take(15) {
        for i in 0..log.ab {
            if i < log.h {
                run = 0;
            } else {
                run += 1;
                best = best.max(run);
            }
        }
    }
    best
}

fn window(history: &[GameLog], date: NaiveDate, days: i64) -> BattingLine {
    let cutoff = date - Duration::days(days);
    BattingLine::from_logs(history.iter().filter(|l| l.game_date >= cutoff))
}

pub fn form_rating(score: f64, is_hot: bool, is_cold: bool) -> FormRating {
    if is_hot || score >= 0.5 {
        FormRating::VeryHot
    } else if score >= 0.2 {
        FormRating::Hot
    } else if score >= -0.2 {
        FormRating::Average
    } else if is_cold || score <= -0.5 {
        FormRating::VeryCold
    } else {
        FormRating::Cold
    }
}

/// Form as of `date` from the player's history before it. `None` without
/// any history.
pub fn form_report(history: &[GameLog], date: NaiveDate) -> Option<FormReport> {
    if history.is_empty() {
        return None;
    }
    let recent_first: Vec<&GameLog> = history.iter().rev().collect();

    let last_7 = window(history, date, 7);
    let last_14 = window(history, date, 14);
    let last_30 = window(history, date, 30);
    let this_year =
        BattingLine::from_logs(history.iter().filter(|l| l.game_date.year() == date.year()));
    let season = if this_year.games > 0 {
        this_year
    } else {
        BattingLine::from_logs(history)
    };

    let last_7_games = BattingLine::from_logs(recent_first.iter().take(7).copied());
    let hit_streak = longest_hit_streak(&recent_first);
    let hitless_ab = longest_hitless_run(&recent_first);
    let is_hot = history.len() >= 5
        && (hit_streak >= 5 || (last_7_games.avg() >= 0.350 && last_7_games.ab >= 20));
    let is_cold = history.len() >= 5
        && (hitless_ab >= 10 || (last_7_games.avg() < 0.150 && last_7_games.ab >= 20));

    let score = if last_7.games == 0 || season.ops() == 0.0 {
        0.0
    } else {
        (((last_7.ops() - season.ops()) / season.ops()) / 0.5).clamp(-1.0, 1.0)
    };

    let (o7, o14, o30) = (last_7.ops(), last_14.ops(), last_30.ops());
    let trend = if o7 > o14 && o14 > o30 {
        Trend::Improving
    } else if o7 < o14 && o14 < o30 {
        Trend::Declining
    } else {
        Trend::Stable
    };

    Some(FormReport {
        last_7,
        last_14,
        last_30,
        season,
        hit_streak,
        hitless_ab,
        is_hot,
        is_cold,
        score,
        trend,
        rating: form_rating(score, is_hot, is_cold),
    })
}

pub fn analyze(ctx: &GameContext, data: &Dataset) -> FactorReading {
    match form_report(data.history_before(ctx.player_id, ctx.date), ctx.date) {
        Some(report) => FactorReading::new(
            report.score,
            format!(
                "{} ({}): {:.3} OPS last 7 days vs {:.3} season",
                report.rating,
                report.trend,
                report.last_7.ops(),
                report.season.ops()
            ),
        ),
        None => FactorReading::neutral("no recent games"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    #[test]
    fn hot_streak_from_consecutive_hits() {
        // Season: 20 games 0-for-4 early, then 6 straight games with a hit.
        let mut logs = daily_logs("2024-04-01", &[(4, 0); 20]);
        logs.extend(daily_logs("2024-05-20", &[(4, 1); 6]));
        let report = form_report(&logs, d("2024-05-26")).unwrap();
        assert_eq!(report.hit_streak, 6);
        assert!(report.is_hot);
        assert_eq!(report.rating, FormRating::VeryHot);
        assert!(report.score > 0.0);
    }

    #[test]
    fn cold_from_hitless_at_bats() {
        let mut logs = daily_logs("2024-04-01", &[(4, 2); 10]);
        logs.extend(daily_logs("2024-04-11", &[(4, 1), (4, 0), (4, 0), (4, 0)]));
        let report = form_report(&logs, d("2024-04-15")).unwrap();
        // Three 0-for-4 games, then the hit leading off 04-11 ends the run.
        assert_eq!(report.hitless_ab, 12);
        assert!(report.is_cold);
    }

    #[test]
    fn score_compares_week_to_season() {
        // Season .270 with no power, last week .500, rising through the
        // 30- and 14-day windows.
        let mut logs = daily_logs("2024-04-01", &[(4, 1); 20]);
        logs.push(log("2024-05-05", 4, 0));
        logs.push(log("2024-05-17", 4, 1));
        logs.extend(daily_logs("2024-05-25", &[(4, 2); 3]));
        let report = form_report(&logs, d("2024-05-28")).unwrap();
        assert_close(report.score, 1.0);
        assert_eq!(report.trend, Trend::Improving);
    }

    #[test]
    fn empty_week_is_neutral() {
        let logs = daily_logs("2024-04-01", &[(4, 1); 10]);
        let report = form_report(&logs, d("2024-05-28")).unwrap();
        assert_eq!(report.score, 0.0);
        assert_eq!(report.trend, Trend::Stable);
        assert!(form_report(&[], d("2024-05-28")).is_none());
    }

    #[test]
    fn ratings() {
        assert_eq!(form_rating(0.0, true, false), FormRating::VeryHot);
        assert_eq!(form_rating(0.3, false, false), FormRating::Hot);
        assert_eq!(form_rating(0.0, false, false), FormRating::Average);
        assert_eq!(form_rating(-0.3, false, false), FormRating::Cold);
        assert_eq!(form_rating(-0.3, false, true), FormRating::VeryCold);
        assert_eq!(form_rating(-0.6, false, false), FormRating::VeryCold);
    }
}
