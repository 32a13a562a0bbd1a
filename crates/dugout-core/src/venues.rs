// Static ballpark and team reference tables.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Roof {
    Open,
    Retractable,
    Dome,
}

/// Run environment a park is known for, used when there is not enough
/// history to measure one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParkClass {
    Hitter,
    Neutral,
    Pitcher,
}

#[derive(Debug, Clone, Copy)]
pub struct Venue {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub team: &'static str,
    pub latitude: f64,
    pub longitude: f64,
    /// Direction from the pitcher's mound to home plate, degrees.
    pub orientation: f64,
    pub roof: Roof,
    pub class: ParkClass,
}

#[derive(Debug, Clone, Copy)]
pub struct Team {
    pub abbreviation: &'static str,
    pub name: &'static str,
    pub aliases: &'static [&'static str],
}

#[allow(clippy::too_many_arguments)]
const fn venue(
    name: &'static str,
    aliases: &'static [&'static str],
    team: &'static str,
    latitude: f64,
    longitude: f64,
    orientation: f64,
    roof: Roof,
    class: ParkClass,
) -> Venue {
    Venue {
        name,
        aliases,
        team,
        latitude,
        longitude,
        orientation,
        roof,
        class,
    }
}

use ParkClass::{Hitter, Neutral, Pitcher};
use Roof::{Dome, Open, Retractable};

pub const VENUES: &[Venue] = &[
    venue("Chase Field", &[], "AZ", 33.4455, -112.0667, 20.0, Retractable, Neutral),
    venue("Truist Park", &[], "ATL", 33.8907, -84.4677, 15.0, Open, Neutral),
    venue("Oriole Park at Camden Yards", &["Camden Yards"], "BAL", 39.2839, -76.6217, 54.0, Open, Neutral),
    venue("Fenway Park", &[], "BOS", 42.3467, -71.0972, 287.0, Open, Hitter),
    venue("Wrigley Field", &[], "CHC", 41.9484, -87.6553, 190.0, Open, Neutral),
    venue("Guaranteed Rate Field", &["Rate Field"], "CWS", 41.8299, -87.6338, 18.0, Open, Neutral),
    venue("Great American Ball Park", &[], "CIN", 39.0979, -84.5082, 235.0, Open, Hitter),
    venue("Progressive Field", &[], "CLE", 41.4962, -81.6852, 95.0, Open, Neutral),
    venue("Coors Field", &[], "COL", 39.7559, -104.9942, 5.0, Open, Hitter),
    venue("Comerica Park", &[], "DET", 42.3390, -83.0485, 55.0, Open, Neutral),
    venue("Minute Maid Park", &["Daikin Park"], "HOU", 29.7573, -95.3555, 350.0, Retractable, Neutral),
    venue("Kauffman Stadium", &[], "KC", 39.0517, -94.4803, 80.0, Open, Neutral),
    venue("Angel Stadium", &["Angel Stadium of Anaheim"], "LAA", 33.8003, -117.8827, 210.0, Open, Neutral),
    venue("Dodger Stadium", &[], "LAD", 34.0739, -118.2400, 330.0, Open, Neutral),
    venue("loanDepot park", &[], "MIA", 25.7781, -80.2197, 235.0, Retractable, Pitcher),
    venue("American Family Field", &[], "MIL", 43.0280, -87.9712, 205.0, Retractable, Neutral),
    venue("Target Field", &[], "MIN", 44.9817, -93.2776, 235.0, Open, Neutral),
    venue("Citi Field", &[], "NYM", 40.7571, -73.8458, 45.0, Open, Neutral),
    venue("Yankee Stadium", &[], "NYY", 40.8296, -73.9262, 282.0, Open, Neutral),
    venue("Oakland Coliseum", &["Oakland-Alameda County Coliseum", "RingCentral Coliseum"], "ATH", 37.7516, -122.2005, 325.0, Open, Neutral),
    venue("Sutter Health Park", &[], "ATH", 38.5804, -121.5139, 45.0, Open, Neutral),
    venue("Citizens Bank Park", &[], "PHI", 39.9061, -75.1665, 5.0, Open, Neutral),
    venue("PNC Park", &[], "PIT", 40.4469, -80.0057, 325.0, Open, Neutral),
    venue("Petco Park", &[], "SD", 32.7076, -117.1570, 320.0, Open, Pitcher),
    venue("Oracle Park", &[], "SF", 37.7786, -122.3893, 310.0, Open, Pitcher),
    venue("T-Mobile Park", &[], "SEA", 47.5914, -122.3325, 47.0, Retractable, Neutral),
    venue("Busch Stadium", &[], "STL", 38.6226, -90.1928, 240.0, Open, Neutral),
    venue("Tropicana Field", &[], "TB", 27.7682, -82.6534, 5.0, Dome, Neutral),
    venue("Globe Life Field", &[], "TEX", 32.7473, -97.0847, 355.0, Retractable, Neutral),
    venue("Rogers Centre", &[], "TOR", 43.6414, -79.3894, 198.0, Retractable, Neutral),
    venue("Nationals Park", &[], "WSH", 38.8730, -77.0074, 325.0, Open, Neutral),
];

pub const TEAMS: &[Team] = &[
    Team { abbreviation: "AZ", name: "Arizona Diamondbacks", aliases: &["ARI"] },
    Team { abbreviation: "ATL", name: "Atlanta Braves", aliases: &[] },
    Team { abbreviation: "BAL", name: "Baltimore Orioles", aliases: &[] },
    Team { abbreviation: "BOS", name: "Boston Red Sox", aliases: &[] },
    Team { abbreviation: "CHC", name: "Chicago Cubs", aliases: &[] },
    Team { abbreviation: "CWS", name: "Chicago White Sox", aliases: &["CHW"] },
    Team { abbreviation: "CIN", name: "Cincinnati Reds", aliases: &[] },
    Team { abbreviation: "CLE", name: "Cleveland Guardians", aliases: &["Cleveland Indians"] },
    Team { abbreviation: "COL", name: "Colorado Rockies", aliases: &[] },
    Team { abbreviation: "DET", name: "Detroit Tigers", aliases: &[] },
    Team { abbreviation: "HOU", name: "Houston Astros", aliases: &[] },
    Team { abbreviation: "KC", name: "Kansas City Royals", aliases: &["KCR"] },
    Team { abbreviation: "LAA", name: "Los Angeles Angels", aliases: &[] },
    Team { abbreviation: "LAD", name: "Los Angeles Dodgers", aliases: &[] },
    Team { abbreviation: "MIA", name: "Miami Marlins", aliases: &[] },
    Team { abbreviation: "MIL", name: "Milwaukee Brewers", aliases: &[] },
    Team { abbreviation: "MIN", name: "Minnesota Twins", aliases: &[] },
    Team { abbreviation: "NYM", name: "New York Mets", aliases: &[] },
    Team { abbreviation: "NYY", name: "New York Yankees", aliases: &[] },
    Team { abbreviation: "ATH", name: "Oakland Athletics", aliases: &["OAK", "Athletics"] },
    Team { abbreviation: "PHI", name: "Philadelphia Phillies", aliases: &[] },
    Team { abbreviation: "PIT", name: "Pittsburgh Pirates", aliases: &[] },
    Team { abbreviation: "SD", name: "San Diego Padres", aliases: &["SDP"] },
    Team { abbreviation: "SF", name: "San Francisco Giants", aliases: &["SFG"] },
    Team { abbreviation: "SEA", name: "Seattle Mariners", aliases: &[] },
    Team { abbreviation: "STL", name: "St. Louis Cardinals", aliases: &[] },
    Team { abbreviation: "TB", name: "Tampa Bay Rays", aliases: &["TBR"] },
    Team { abbreviation: "TEX", name: "Texas Rangers", aliases: &[] },
    Team { abbreviation: "TOR", name: "Toronto Blue Jays", aliases: &[] },
    Team { abbreviation: "WSH", name: "Washington Nationals", aliases: &["WAS", "WSN"] },
];

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

pub fn find_venue(name: &str) -> Option<&'static Venue> {
    let name = name.trim();
    VENUES.iter().find(|v| {
        v.name.eq_ignore_ascii_case(name) || v.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    })
}

/// Look up a team by abbreviation, full name or alias.
pub fn find_team(name_or_abbrev: &str) -> Option<&'static Team> {
    let s = name_or_abbrev.trim();
    TEAMS.iter().find(|t| {
        t.abbreviation.eq_ignore_ascii_case(s)
            || t.name.eq_ignore_ascii_case(s)
            || t.aliases.iter().any(|a| a.eq_ignore_ascii_case(s))
    })
}

/// Whether two team references (names or abbreviations) denote the same club.
pub fn same_team(a: &str, b: &str) -> bool {
    if a.trim().eq_ignore_ascii_case(b.trim()) {
        return true;
    }
    match (find_team(a), find_team(b)) {
        (Some(x), Some(y)) => x.abbreviation == y.abbreviation,
        _ => false,
    }
}
