use stanza::style::{HAlign, Header, MinWidth, Separator, Styles};
use stanza::table::{Cell, Col, Row, Table};

use crate::evaluate::Evaluation;
use crate::h2h::HeadToHead;
use crate::market::{Markets, ProbableScore};
use crate::scoregrid::ScoreMatrix;
use crate::standings::{Form, Standing};
use crate::strength::StrengthTable;

fn fair_price(probability: f64) -> String {
    if probability > 0.0 {
        format!("{:.3}", 1.0 / probability)
    } else {
        "∞".into()
    }
}

fn probability_row(market: &str, selection: String, probability: f64) -> Row {
    Row::new(
        Styles::default(),
        vec![
            market.into(),
            selection.into(),
            Cell::new(
                Styles::default().with(HAlign::Right),
                format!("{probability:.6}").into(),
            ),
            Cell::new(
                Styles::default().with(HAlign::Right),
                fair_price(probability).into(),
            ),
        ],
    )
}

pub fn tabulate_markets(markets: &Markets, home_team: &str, away_team: &str) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(12))),
            Col::new(Styles::default().with(MinWidth(20))),
            Col::new(Styles::default().with(MinWidth(12))),
            Col::new(Styles::default().with(MinWidth(10))),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec![
                "Market".into(),
                "Selection".into(),
                "Probability".into(),
                "Fair price".into(),
            ],
        ));

    let result = &markets.result;
    table.push_row(probability_row("1X2", home_team.into(), result.p_home_win));
    table.push_row(probability_row("", "Draw".into(), result.p_draw));
    table.push_row(probability_row("", away_team.into(), result.p_away_win));

    let chance = &markets.double_chance;
    table.push_row(probability_row("Double", "1X".into(), chance.home_or_draw));
    table.push_row(probability_row("", "X2".into(), chance.draw_or_away));
    table.push_row(probability_row("", "12".into(), chance.home_or_away));

    for over_under in &markets.goal_lines {
        table.push_row(probability_row(
            "Goals",
            format!("Over {over_under}"),
            over_under.over,
        ));
        table.push_row(probability_row(
            "",
            format!("Under {over_under}"),
            over_under.under,
        ));
    }

    let btts = &markets.both_teams_to_score;
    table.push_row(probability_row("BTTS", "Yes".into(), btts.yes));
    table.push_row(probability_row("", "No".into(), btts.no));
    table
}

pub fn tabulate_probable_scores(scores: &[ProbableScore]) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(6)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Centred)),
            Col::new(Styles::default().with(MinWidth(12)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(10)).with(HAlign::Right)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec![
                "Rank".into(),
                "Score".into(),
                "Probability".into(),
                "Fair price".into(),
            ],
        ));
    table.push_rows(scores.iter().enumerate().map(|(index, probable)| {
        Row::new(
            Styles::default(),
            vec![
                format!("{}", index + 1).into(),
                probable.score.to_string().into(),
                format!("{:.6}", probable.probability).into(),
                fair_price(probable.probability).into(),
            ],
        )
    }));
    table
}

/// Home goals down the rows, away goals across the columns.
pub fn tabulate_scoregrid(matrix: &ScoreMatrix) -> Table {
    let grid = matrix.grid();
    let mut table = Table::default()
        .with_cols({
            let mut cols = vec![Col::new(
                Styles::default()
                    .with(Separator(true))
                    .with(MinWidth(5))
                    .with(HAlign::Centred),
            )];
            for _ in 0..grid.cols() {
                cols.push(Col::new(
                    Styles::default().with(MinWidth(8)).with(HAlign::Right),
                ));
            }
            cols
        })
        .with_row({
            let mut header_cells = vec!["H \\ A".into()];
            for away_goals in 0..grid.cols() {
                header_cells.push(format!("{away_goals}").into());
            }
            Row::new(
                Styles::default().with(Header(true)).with(Separator(true)),
                header_cells,
            )
        });
    for home_goals in 0..grid.rows() {
        let mut row_cells = vec![format!("{home_goals}").into()];
        for prob in grid.row_slice(home_goals) {
            row_cells.push(format!("{prob:.4}").into());
        }
        table.push_row(Row::new(Styles::default(), row_cells));
    }
    table
}

pub fn tabulate_strengths(strengths: &StrengthTable) -> Table {
    let mut table = Table::default()
        .with_cols({
            let mut cols = vec![Col::new(Styles::default().with(MinWidth(20)))];
            for _ in 0..4 {
                cols.push(Col::new(
                    Styles::default().with(MinWidth(12)).with(HAlign::Right),
                ));
            }
            cols
        })
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec![
                "Team".into(),
                "Attack (H)".into(),
                "Defence (H)".into(),
                "Attack (A)".into(),
                "Defence (A)".into(),
            ],
        ));
    for team in strengths.teams() {
        let strength = strengths.get_or_neutral(team);
        table.push_row(Row::new(
            Styles::default(),
            vec![
                team.into(),
                format!("{:.3}", strength.attack_home).into(),
                format!("{:.3}", strength.defense_home).into(),
                format!("{:.3}", strength.attack_away).into(),
                format!("{:.3}", strength.defense_away).into(),
            ],
        ));
    }
    table
}

pub fn tabulate_head_to_head(h2h: &HeadToHead) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(12))),
            Col::new(Styles::default().with(MinWidth(20))),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Centred)),
            Col::new(Styles::default().with(MinWidth(20))),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec!["Date".into(), "Home".into(), "Score".into(), "Away".into()],
        ));
    table.push_rows(h2h.recent.iter().map(|m| {
        Row::new(
            Styles::default(),
            vec![
                m.date.format("%Y-%m-%d").to_string().into(),
                m.home_team.clone().into(),
                m.score().to_string().into(),
                m.away_team.clone().into(),
            ],
        )
    }));
    table
}

pub fn tabulate_standings(standings: &[Standing], forms: &[Form]) -> Table {
    let mut table = Table::default()
        .with_cols({
            let mut cols = vec![
                Col::new(Styles::default().with(MinWidth(5)).with(HAlign::Right)),
                Col::new(Styles::default().with(MinWidth(20))),
            ];
            for _ in 0..8 {
                cols.push(Col::new(
                    Styles::default().with(MinWidth(5)).with(HAlign::Right),
                ));
            }
            cols.push(Col::new(Styles::default().with(MinWidth(12))));
            cols
        })
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec![
                "Rank".into(),
                "Team".into(),
                "P".into(),
                "W".into(),
                "D".into(),
                "L".into(),
                "GF".into(),
                "GA".into(),
                "GD".into(),
                "Pts".into(),
                "Form".into(),
            ],
        ));
    table.push_rows(standings.iter().enumerate().map(|(index, standing)| {
        let form = forms
            .iter()
            .find(|form| form.team == standing.team)
            .map(ToString::to_string)
            .unwrap_or_default();
        Row::new(
            Styles::default(),
            vec![
                format!("{}", index + 1).into(),
                standing.team.clone().into(),
                format!("{}", standing.played).into(),
                format!("{}", standing.wins).into(),
                format!("{}", standing.draws).into(),
                format!("{}", standing.losses).into(),
                format!("{}", standing.goals_for).into(),
                format!("{}", standing.goals_against).into(),
                format!("{:+}", standing.goal_difference()).into(),
                format!("{}", standing.points).into(),
                form.into(),
            ],
        )
    }));
    table
}

pub fn tabulate_evaluation(evaluation: &Evaluation) -> Table {
    Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(12))),
            Col::new(Styles::default().with(MinWidth(16)).with(HAlign::Right)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec!["Metric".into(), "Value".into()],
        ))
        .with_row(Row::new(
            Styles::default(),
            vec!["Split".into(), evaluation.split.to_string().into()],
        ))
        .with_row(Row::new(
            Styles::default(),
            vec!["Trained on".into(), format!("{}", evaluation.n_train).into()],
        ))
        .with_row(Row::new(
            Styles::default(),
            vec!["Tested on".into(), format!("{}", evaluation.n_test).into()],
        ))
        .with_row(Row::new(
            Styles::default(),
            vec!["Skipped".into(), format!("{}", evaluation.n_skipped).into()],
        ))
        .with_row(Row::new(
            Styles::default(),
            vec!["Accuracy".into(), format!("{:.4}", evaluation.accuracy).into()],
        ))
        .with_row(Row::new(
            Styles::default(),
            vec!["Log-loss".into(), format!("{:.4}", evaluation.log_loss).into()],
        ))
}
