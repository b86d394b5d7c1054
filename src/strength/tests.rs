use super::*;
use crate::testing::{fixture_match, round_robin_table};
use assert_float_eq::*;

#[test]
pub fn league_averages() {
    let averages = LeagueAverages::compute(&round_robin_table()).unwrap();
    assert_eq!(6, averages.matches);
    assert_float_absolute_eq!(2.0, averages.avg_goals_home);
    assert_float_absolute_eq!(1.0, averages.avg_goals_away);
    assert_eq!(2.0, averages.avg_goals(Side::Home));
}

#[test]
pub fn empty_table() {
    assert_eq!(
        Err(InsufficientDataError::EmptyTable),
        LeagueAverages::compute(&MatchTable::default())
    );
    assert!(matches!(
        StrengthTable::estimate(&MatchTable::default(), 0.0),
        Err(InsufficientDataError::EmptyTable)
    ));
}

#[test]
pub fn single_home_match() {
    // league avg_goals_home = (3 + 0) / 2 = 1.5
    let table = MatchTable::try_from(vec![
        fixture_match(0, "Brest", "Metz", 3, 1),
        fixture_match(1, "Metz", "Brest", 0, 2),
    ])
    .unwrap();
    let strength = estimate(&table, "Brest", 0.0).unwrap();
    assert_float_absolute_eq!(2.0, strength.attack_home);
    assert_float_absolute_eq!(1.0 / 1.5, strength.defense_home);
    assert_float_absolute_eq!(2.0 / 1.5, strength.attack_away);
    assert_eq!(MIN_STRENGTH, strength.defense_away);
}

#[test]
pub fn round_robin_strengths() {
    let strengths = StrengthTable::estimate(&round_robin_table(), 0.0).unwrap();
    assert_eq!(vec!["Lille", "Lyon", "Nantes"], strengths.teams());

    let lyon = strengths.get("Lyon").unwrap();
    assert_float_absolute_eq!(1.75, lyon.attack_home);
    assert_float_absolute_eq!(1.0, lyon.defense_home);
    assert_float_absolute_eq!(1.5, lyon.attack_away);
    assert_float_absolute_eq!(0.5, lyon.defense_away);

    let nantes = strengths.get("Nantes").unwrap();
    assert_float_absolute_eq!(0.25, nantes.attack_home);
    assert_float_absolute_eq!(1.0, nantes.defense_home);
    assert_eq!(MIN_STRENGTH, nantes.attack_away);
    assert_float_absolute_eq!(1.25, nantes.defense_away);

    let lille = strengths.get("Lille").unwrap();
    assert_float_absolute_eq!(1.0, lille.attack(Side::Home));
    assert_float_absolute_eq!(1.0, lille.defense(Side::Home));
    assert_float_absolute_eq!(1.5, lille.attack(Side::Away));
    assert_float_absolute_eq!(1.25, lille.defense(Side::Away));

    assert_eq!(
        Some(&VenueRecord {
            matches: 2,
            scored: 7,
            conceded: 2
        }),
        strengths.record("Lyon", Side::Home)
    );
}

#[test]
pub fn strengths_are_positive() {
    let strengths = StrengthTable::estimate(&round_robin_table(), 0.0).unwrap();
    for team in strengths.teams() {
        let strength = strengths.get(team).unwrap();
        for venue in [Side::Home, Side::Away] {
            assert!(strength.attack(venue) >= MIN_STRENGTH);
            assert!(strength.defense(venue) >= MIN_STRENGTH);
        }
    }
}

#[test]
pub fn smoothing_pulls_toward_average() {
    let strengths = StrengthTable::estimate(&round_robin_table(), 2.0).unwrap();
    let lyon = strengths.get("Lyon").unwrap();
    // (7 + 2 × 2.0) / (2 + 2) = 2.75 goals per match, against a league average of 2.0
    assert_float_absolute_eq!(1.375, lyon.attack_home);
    assert!(lyon.attack_home > 1.0 && lyon.attack_home < 1.75);

    let nantes = strengths.get("Nantes").unwrap();
    // (0 + 2 × 1.0) / (2 + 2) = 0.5
    assert_float_absolute_eq!(0.5, nantes.attack_away);
}

#[test]
pub fn unknown_team() {
    let strengths = StrengthTable::estimate(&round_robin_table(), 0.0).unwrap();
    assert_eq!(
        Err(InsufficientDataError::UnknownTeam {
            team: "Monaco".into()
        }),
        strengths.get("Monaco")
    );
    assert_eq!(TeamStrength::neutral(), strengths.get_or_neutral("Monaco"));
}

#[test]
pub fn missing_venue() {
    let table = MatchTable::try_from(vec![
        fixture_match(0, "Brest", "Metz", 2, 1),
        fixture_match(1, "Lens", "Metz", 1, 1),
    ])
    .unwrap();
    let strengths = StrengthTable::estimate(&table, 0.0).unwrap();
    assert_eq!(
        Err(InsufficientDataError::NoVenueHistory {
            team: "Brest".into(),
            venue: Side::Away
        }),
        strengths.get("Brest")
    );
    assert_eq!(
        Err(InsufficientDataError::NoVenueHistory {
            team: "Metz".into(),
            venue: Side::Home
        }),
        strengths.get("Metz")
    );

    let brest = strengths.get_or_neutral("Brest");
    // league avg_goals_home = 1.5
    assert_float_absolute_eq!(2.0 / 1.5, brest.attack_home);
    assert_eq!(1.0, brest.attack_away);
    assert_eq!(1.0, brest.defense_away);
}

#[test]
pub fn goalless_league_is_neutral() {
    let table = MatchTable::try_from(vec![
        fixture_match(0, "Brest", "Metz", 0, 0),
        fixture_match(1, "Metz", "Brest", 0, 0),
    ])
    .unwrap();
    let strength = estimate(&table, "Metz", 0.0).unwrap();
    assert_eq!(TeamStrength::neutral(), strength);
}
