//! Historical match data: the immutable [MatchTable] snapshot and its ingestion from
//! provider CSV files.

use std::io;
use std::io::BufRead;
use std::path::Path;

use chrono::NaiveDate;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;
use thiserror::Error;
use tracing::{debug, info};

use crate::csv::CsvReader;
use crate::domain::{MatchResult, Score, Side};
use crate::error::DataValidationError;

pub const UNKNOWN_SEASON: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Match {
    pub date: NaiveDate,
    pub season: String,
    pub home_team: String,
    pub away_team: String,
    pub home_goals: u8,
    pub away_goals: u8,
}
impl Match {
    pub fn score(&self) -> Score {
        Score::new(self.home_goals, self.away_goals)
    }

    pub fn result(&self) -> MatchResult {
        self.score().result()
    }

    pub fn total_goals(&self) -> u16 {
        self.score().total()
    }

    pub fn team(&self, side: Side) -> &str {
        match side {
            Side::Home => &self.home_team,
            Side::Away => &self.away_team,
        }
    }

    pub fn goals(&self, side: Side) -> u8 {
        match side {
            Side::Home => self.home_goals,
            Side::Away => self.away_goals,
        }
    }

    /// The side `team` played on, if it played in this match.
    pub fn side_of(&self, team: &str) -> Option<Side> {
        if self.home_team == team {
            Some(Side::Home)
        } else if self.away_team == team {
            Some(Side::Away)
        } else {
            None
        }
    }

    fn validate(&self, row: usize) -> Result<(), DataValidationError> {
        if self.home_team.trim().is_empty() || self.away_team.trim().is_empty() {
            return Err(DataValidationError::EmptyTeamName { row });
        }
        if self.home_team == self.away_team {
            return Err(DataValidationError::SameTeam {
                row,
                team: self.home_team.clone(),
            });
        }
        Ok(())
    }

    /// Identifies a match across overlapping data files.
    fn key(&self) -> (&str, NaiveDate, &str, &str) {
        (&self.season, self.date, &self.home_team, &self.away_team)
    }
}

/// A validated, date-ordered snapshot of played matches. Never mutated once built; filtering
/// produces a new snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchTable {
    matches: Vec<Match>,
}
impl MatchTable {
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Distinct season tags, in ascending order.
    pub fn seasons(&self) -> Vec<&str> {
        let mut seasons = self
            .matches
            .iter()
            .map(|m| m.season.as_str())
            .collect::<Vec<_>>();
        seasons.sort();
        seasons.dedup();
        seasons
    }

    /// Distinct team names, in ascending order.
    pub fn teams(&self) -> Vec<&str> {
        let mut teams = self
            .matches
            .iter()
            .flat_map(|m| [m.home_team.as_str(), m.away_team.as_str()])
            .collect::<Vec<_>>();
        teams.sort();
        teams.dedup();
        teams
    }

    pub fn filter(&self, mut predicate: impl FnMut(&Match) -> bool) -> MatchTable {
        MatchTable {
            matches: self.matches.iter().filter(|m| predicate(m)).cloned().collect(),
        }
    }

    /// Restricts the table to the given seasons. An empty selection retains every season.
    pub fn filter_seasons<S: AsRef<str>>(&self, seasons: &[S]) -> MatchTable {
        if seasons.is_empty() {
            return self.clone();
        }
        self.filter(|m| seasons.iter().any(|season| season.as_ref() == m.season))
    }

    /// Splits into the oldest `at` matches and the remainder.
    pub fn split_at(&self, at: usize) -> (MatchTable, MatchTable) {
        let (older, newer) = self.matches.split_at(at.min(self.matches.len()));
        (
            MatchTable {
                matches: older.to_vec(),
            },
            MatchTable {
                matches: newer.to_vec(),
            },
        )
    }

    /// Combines two snapshots. Where both contain the same match (season, date and teams), the
    /// record from `other` wins.
    pub fn merge(&self, other: &MatchTable) -> MatchTable {
        let mut index = FxHashMap::default();
        let mut matches: Vec<Match> = Vec::with_capacity(self.len() + other.len());
        for m in self.matches.iter().chain(other.matches.iter()) {
            let key = (m.season.clone(), m.date, m.home_team.clone(), m.away_team.clone());
            match index.get(&key) {
                Some(&position) => matches[position] = m.clone(),
                None => {
                    index.insert(key, matches.len());
                    matches.push(m.clone());
                }
            }
        }
        Self::sorted(matches)
    }

    fn sorted(mut matches: Vec<Match>) -> MatchTable {
        matches.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.key().cmp(&b.key())));
        MatchTable { matches }
    }
}

impl TryFrom<Vec<Match>> for MatchTable {
    type Error = DataValidationError;

    fn try_from(matches: Vec<Match>) -> Result<Self, Self::Error> {
        for (row, m) in matches.iter().enumerate() {
            m.validate(row)?;
        }
        Ok(Self::sorted(matches))
    }
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Invalid(#[from] DataValidationError),
}

/// Columns understood by the ingestion layer, with the header aliases used by providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum Column {
    Date,
    HomeTeam,
    AwayTeam,
    HomeGoals,
    AwayGoals,
    Season,
}
impl Column {
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Column::Date => &["Date", "date"],
            Column::HomeTeam => &["HomeTeam", "Home", "Home Team", "home_team"],
            Column::AwayTeam => &["AwayTeam", "Away", "Away Team", "away_team"],
            Column::HomeGoals => &["FTHG", "HG", "home_goals"],
            Column::AwayGoals => &["FTAG", "AG", "away_goals"],
            Column::Season => &["Season", "season"],
        }
    }

    pub fn name(&self) -> &'static str {
        self.aliases()[0]
    }

    fn is_required(&self) -> bool {
        !matches!(self, Column::Season)
    }
}

struct HeaderIndex {
    positions: FxHashMap<usize, usize>,
}
impl HeaderIndex {
    fn resolve(header: &[String]) -> Result<Self, DataValidationError> {
        let mut positions = FxHashMap::default();
        for column in Column::iter() {
            let position = header
                .iter()
                .position(|name| column.aliases().contains(&name.as_str()));
            match position {
                Some(position) => {
                    positions.insert(column as usize, position);
                }
                None if column.is_required() => {
                    return Err(DataValidationError::MissingColumn {
                        column: column.name(),
                        aliases: column.aliases().join("|"),
                    })
                }
                None => {}
            }
        }
        Ok(Self { positions })
    }

    fn get<'a>(&self, fields: &'a [String], column: Column) -> Option<&'a str> {
        self.positions
            .get(&(column as usize))
            .and_then(|&position| fields.get(position))
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    fn require<'a>(
        &self,
        fields: &'a [String],
        column: Column,
        row: usize,
    ) -> Result<&'a str, DataValidationError> {
        self.get(fields, column)
            .ok_or(DataValidationError::MissingValue {
                row,
                column: column.name(),
            })
    }
}

fn parse_goals(value: &str, column: Column, row: usize) -> Result<u8, DataValidationError> {
    // providers occasionally render integral counts as floats, e.g. "2.0"
    let parsed = value
        .parse::<i64>()
        .ok()
        .or_else(|| {
            value
                .parse::<f64>()
                .ok()
                .filter(|goals| goals.fract() == 0.0 && goals.is_finite())
                .map(|goals| goals as i64)
        });
    match parsed {
        Some(goals) if (0..=u8::MAX as i64).contains(&goals) => Ok(goals as u8),
        _ => Err(DataValidationError::InvalidGoals {
            row,
            column: column.name(),
            value: value.into(),
        }),
    }
}

/// Parses `dd/mm/yy`, `dd/mm/yyyy` or ISO `yyyy-mm-dd`.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    // two-digit years first: "%Y" would otherwise read "25" as the year 25
    ["%d/%m/%y", "%d/%m/%Y", "%Y-%m-%d"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

/// Reads matches from CSV rows. The first row is the header. Rows are numbered from 1, counting
/// the header as row 0.
pub fn read_rows<I>(mut rows: I, default_season: &str) -> Result<MatchTable, IngestError>
where
    I: Iterator<Item = Result<Vec<String>, io::Error>>,
{
    let header = match rows.next() {
        Some(header) => header?,
        None => return Ok(MatchTable::default()),
    };
    let index = HeaderIndex::resolve(&header)?;

    let mut matches = vec![];
    for (row, fields) in rows.enumerate() {
        let fields = fields?;
        let row = row + 1;
        let raw_date = index.require(&fields, Column::Date, row)?;
        let date = parse_date(raw_date).ok_or_else(|| DataValidationError::InvalidDate {
            row,
            value: raw_date.into(),
        })?;
        let home_goals = parse_goals(
            index.require(&fields, Column::HomeGoals, row)?,
            Column::HomeGoals,
            row,
        )?;
        let away_goals = parse_goals(
            index.require(&fields, Column::AwayGoals, row)?,
            Column::AwayGoals,
            row,
        )?;
        let m = Match {
            date,
            season: index
                .get(&fields, Column::Season)
                .unwrap_or(default_season)
                .into(),
            home_team: index.require(&fields, Column::HomeTeam, row)?.into(),
            away_team: index.require(&fields, Column::AwayTeam, row)?.into(),
            home_goals,
            away_goals,
        };
        m.validate(row)?;
        matches.push(m);
    }
    debug!("read {} matches", matches.len());
    Ok(MatchTable::sorted(matches))
}

pub fn read<R: BufRead>(reader: R, default_season: &str) -> Result<MatchTable, IngestError> {
    read_rows(CsvReader::wrap(reader), default_season)
}

/// The season tag encoded in a provider file name, e.g. `F1_2425.csv` → `2425`.
pub fn season_from_path(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| stem.rsplit_once('_'))
        .map(|(_, season)| season.to_string())
        .unwrap_or_else(|| UNKNOWN_SEASON.into())
}

pub fn read_from_file(path: impl AsRef<Path>) -> Result<MatchTable, IngestError> {
    let path = path.as_ref();
    let season = season_from_path(path);
    let table = read_rows(CsvReader::open(path)?, &season)?;
    info!(
        "loaded {} matches from {} (season {season})",
        table.len(),
        path.display()
    );
    Ok(table)
}

pub fn read_from_files<P: AsRef<Path>>(paths: &[P]) -> Result<MatchTable, IngestError> {
    let mut table = MatchTable::default();
    for path in paths {
        table = table.merge(&read_from_file(path)?);
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixture_match;

    const SAMPLE: &str = "\
Div,Date,HomeTeam,AwayTeam,FTHG,FTAG,FTR
F1,02/01/25,TeamC,TeamA,0,0,D
F1,01/01/25,TeamA,TeamB,2,1,H
";

    #[test]
    fn read_sample() {
        let table = read(SAMPLE.as_bytes(), "2425").unwrap();
        assert_eq!(2, table.len());
        let first = &table.matches()[0];
        assert_eq!(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(), first.date);
        assert_eq!("TeamA", first.home_team);
        assert_eq!(MatchResult::Home, first.result());
        assert_eq!(3, first.result().points(Side::Home));
        assert_eq!("2425", first.season);
        assert_eq!(vec!["TeamA", "TeamB", "TeamC"], table.teams());
    }

    #[test]
    fn read_aliases_and_season_column() {
        let csv = "Season,Date,Home,Away,HG,AG\n2324,2023-08-12,Lens,Nice,2.0,0\n";
        let table = read(csv.as_bytes(), UNKNOWN_SEASON).unwrap();
        let m = &table.matches()[0];
        assert_eq!("2324", m.season);
        assert_eq!(2, m.home_goals);
        assert_eq!(NaiveDate::from_ymd_opt(2023, 8, 12).unwrap(), m.date);
    }

    #[test]
    fn reject_negative_goals() {
        let csv = "Date,HomeTeam,AwayTeam,FTHG,FTAG\n01/01/25,A,B,-1,0\n";
        let err = read(csv.as_bytes(), "2425").unwrap_err();
        assert!(matches!(
            err,
            IngestError::Invalid(DataValidationError::InvalidGoals { row: 1, column: "FTHG", .. })
        ));
    }

    #[test]
    fn reject_missing_goals() {
        let csv = "Date,HomeTeam,AwayTeam,FTHG,FTAG\n01/01/25,A,B,1,0\n02/01/25,C,D,,0\n";
        let err = read(csv.as_bytes(), "2425").unwrap_err();
        assert!(matches!(
            err,
            IngestError::Invalid(DataValidationError::MissingValue { row: 2, column: "FTHG" })
        ));
    }

    #[test]
    fn reject_missing_column() {
        let csv = "Date,HomeTeam,AwayTeam,FTHG\n01/01/25,A,B,1\n";
        let err = read(csv.as_bytes(), "2425").unwrap_err();
        assert!(matches!(
            err,
            IngestError::Invalid(DataValidationError::MissingColumn { column: "FTAG", .. })
        ));
    }

    #[test]
    fn reject_bad_date_and_same_team() {
        let csv = "Date,HomeTeam,AwayTeam,FTHG,FTAG\nyesterday,A,B,1,0\n";
        assert!(matches!(
            read(csv.as_bytes(), "2425").unwrap_err(),
            IngestError::Invalid(DataValidationError::InvalidDate { row: 1, .. })
        ));
        let csv = "Date,HomeTeam,AwayTeam,FTHG,FTAG\n01/01/25,A,A,1,0\n";
        assert!(matches!(
            read(csv.as_bytes(), "2425").unwrap_err(),
            IngestError::Invalid(DataValidationError::SameTeam { row: 1, .. })
        ));
    }

    #[test]
    fn read_latin1_team_name() {
        let csv = b"Date,HomeTeam,AwayTeam,FTHG,FTAG\n01/01/25,N\xEEmes,Lyon,1,0\n02/01/25,Lens,Lille,2,2\n";
        let table = read(&csv[..], "2425").unwrap();
        assert_eq!(2, table.len());
        let first = &table.matches()[0];
        assert_eq!("N\u{fffd}mes", first.home_team);
        assert_eq!("Lyon", first.away_team);
        assert_eq!(MatchResult::Home, first.result());
    }

    #[test]
    fn empty_input() {
        assert!(read("".as_bytes(), "2425").unwrap().is_empty());
    }

    #[test]
    fn parse_dates() {
        assert_eq!(NaiveDate::from_ymd_opt(2025, 1, 2), parse_date("02/01/25"));
        assert_eq!(NaiveDate::from_ymd_opt(2025, 1, 2), parse_date("02/01/2025"));
        assert_eq!(NaiveDate::from_ymd_opt(2025, 1, 2), parse_date("2025-01-02"));
        assert_eq!(None, parse_date("2025/01/02"));
    }

    #[test]
    fn season_from_file_name() {
        assert_eq!("2425", season_from_path(Path::new("data/raw/F1_2425.csv")));
        assert_eq!(UNKNOWN_SEASON, season_from_path(Path::new("matches.csv")));
    }

    #[test]
    fn table_orders_by_date_and_validates() {
        let table = MatchTable::try_from(vec![
            fixture_match(5, "A", "B", 1, 0),
            fixture_match(1, "B", "A", 2, 2),
        ])
        .unwrap();
        assert_eq!("B", table.matches()[0].home_team);
        assert_eq!(
            Err(DataValidationError::EmptyTeamName { row: 0 }),
            MatchTable::try_from(vec![fixture_match(0, "", "B", 0, 0)])
        );
    }

    #[test]
    fn merge_deduplicates() {
        let older = MatchTable::try_from(vec![
            fixture_match(0, "A", "B", 1, 0),
            fixture_match(1, "B", "C", 0, 0),
        ])
        .unwrap();
        let newer = MatchTable::try_from(vec![
            fixture_match(1, "B", "C", 3, 1),
            fixture_match(2, "C", "A", 2, 2),
        ])
        .unwrap();
        let merged = older.merge(&newer);
        assert_eq!(3, merged.len());
        assert_eq!(3, merged.matches()[1].home_goals);
    }

    #[test]
    fn filter_and_split() {
        let table = MatchTable::try_from(vec![
            crate::testing::seasonal_match("2324", 0, "A", "B", 1, 0),
            crate::testing::seasonal_match("2425", 0, "B", "A", 1, 1),
            crate::testing::seasonal_match("2425", 3, "A", "B", 0, 2),
        ])
        .unwrap();
        assert_eq!(vec!["2324", "2425"], table.seasons());
        assert_eq!(2, table.filter_seasons(&["2425"]).len());
        assert_eq!(3, table.filter_seasons::<&str>(&[]).len());
        let (train, test) = table.split_at(2);
        assert_eq!(2, train.len());
        assert_eq!(1, test.len());
        assert_eq!("2324", train.matches()[0].season);
        let (all, none) = table.split_at(10);
        assert_eq!(3, all.len());
        assert!(none.is_empty());
    }
}
