//! Testing helpers.

use assert_float_eq::*;
use chrono::NaiveDate;

use crate::data::{Match, MatchTable};

pub fn assert_slice_f64_near(expected: &[f64], actual: &[f64], distance: u32) {
    assert_eq!(
        expected.len(),
        actual.len(),
        "lengths do not match: {} ≠ {}",
        expected.len(),
        actual.len()
    );
    for (index, &expected) in expected.iter().enumerate() {
        let actual = actual[index];
        if actual != expected {
            assert_f64_near!(expected, actual, distance);
        }
    }
}

pub fn assert_slice_f64_relative(expected: &[f64], actual: &[f64], epsilon: f64) {
    assert_eq!(
        expected.len(),
        actual.len(),
        "lengths do not match: {} ≠ {}",
        expected.len(),
        actual.len()
    );
    for (index, &expected) in expected.iter().enumerate() {
        let actual = actual[index];
        if actual != expected {
            assert_float_relative_eq!(expected, actual, epsilon);
        }
    }
}

/// A played match on the `day`-th day after 1 August 2024 in season `2425`.
pub fn fixture_match(day: u32, home: &str, away: &str, home_goals: u8, away_goals: u8) -> Match {
    seasonal_match("2425", day, home, away, home_goals, away_goals)
}

pub fn seasonal_match(
    season: &str,
    day: u32,
    home: &str,
    away: &str,
    home_goals: u8,
    away_goals: u8,
) -> Match {
    let start_year = 2000 + season[..2].parse::<i32>().unwrap();
    let date = NaiveDate::from_ymd_opt(start_year, 8, 1).unwrap() + chrono::Days::new(day as u64);
    Match {
        date,
        season: season.into(),
        home_team: home.into(),
        away_team: away.into(),
        home_goals,
        away_goals,
    }
}

/// A small double round-robin between three clubs. Home sides score 12 goals in 6 matches (2.0
/// per match), away sides score 6 (1.0 per match).
pub fn round_robin_table() -> MatchTable {
    MatchTable::try_from(vec![
        fixture_match(0, "Lyon", "Nantes", 3, 0),
        fixture_match(1, "Nantes", "Lille", 1, 1),
        fixture_match(2, "Lille", "Lyon", 2, 2),
        fixture_match(7, "Nantes", "Lyon", 0, 1),
        fixture_match(8, "Lille", "Nantes", 2, 0),
        fixture_match(9, "Lyon", "Lille", 4, 2),
    ])
    .unwrap()
}
