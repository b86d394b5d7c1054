use super::*;
use crate::poisson::univariate;
use assert_float_eq::*;

fn build(lambda_home: f64, lambda_away: f64, max_goals: u8) -> ScoreMatrix {
    ScoreMatrix::from_expected_goals(
        &ExpectedGoals::new(lambda_home, lambda_away).unwrap(),
        max_goals,
    )
}

#[test]
pub fn cells_sum_to_one() {
    for (lambda_home, lambda_away) in [(0.2, 0.1), (1.5, 1.0), (2.8, 0.4), (4.5, 3.9)] {
        for max_goals in [3, 5, 7, 10, 20] {
            let matrix = build(lambda_home, lambda_away, max_goals);
            assert_float_absolute_eq!(1.0, matrix.grid().flatten().sum(), 1e-9);
            assert!(matrix.grid().flatten().iter().all(|&prob| (0.0..=1.0).contains(&prob)));
        }
    }
}

#[test]
pub fn nil_all_before_and_after_renormalisation() {
    let raw = univariate(0, 1.5) * univariate(0, 1.0);
    assert_float_absolute_eq!(0.0821, raw, 1e-4);

    let matrix = build(1.5, 1.0, 7);
    let renormalised = matrix.prob(&Score::nil_all());
    assert!(renormalised > raw);
    assert!((renormalised - raw) / raw < 0.001);
    assert_float_relative_eq!(raw / (1.0 - matrix.truncated_mass()), renormalised, 1e-12);
}

#[test]
pub fn truncated_mass() {
    let matrix = build(1.5, 1.0, 7);
    let retained = (0..=7).map(|k| univariate(k, 1.5)).sum::<f64>()
        * (0..=7).map(|k| univariate(k, 1.0)).sum::<f64>();
    assert_float_relative_eq!(1.0 - retained, matrix.truncated_mass(), 1e-6);
    assert!(matrix.truncated_mass() > 0.0);
    assert!(matrix.truncated_mass() < 1e-3);

    let wide = build(1.5, 1.0, 20);
    assert!(wide.truncated_mass() < matrix.truncated_mass());
}

#[test]
pub fn dimensions() {
    let matrix = build(1.2, 0.8, 5);
    assert_eq!(5, matrix.max_goals());
    assert_eq!(6, matrix.grid().rows());
    assert_eq!(6, matrix.grid().cols());
    assert_eq!(36, matrix.scores().count());
    assert_eq!(0.0, matrix.prob(&Score::new(6, 0)));
    assert_eq!(0.0, matrix.prob(&Score::new(0, 6)));
    assert!(matrix.prob(&Score::new(5, 5)) > 0.0);
}

#[test]
pub fn equal_rates_give_symmetric_grid() {
    let matrix = build(1.3, 1.3, 7);
    for home in 0..=7u8 {
        for away in 0..=7u8 {
            assert_eq!(
                matrix.prob(&Score::new(home, away)),
                matrix.prob(&Score::new(away, home))
            );
        }
    }
}

#[test]
pub fn expectations_approach_rates() {
    let (home, away) = build(1.5, 1.0, 20).expectations();
    assert_float_absolute_eq!(1.5, home, 1e-9);
    assert_float_absolute_eq!(1.0, away, 1e-9);

    // truncation shaves the tail, which lowers the mean slightly
    let (home, away) = build(1.5, 1.0, 3).expectations();
    assert!(home < 1.5);
    assert!(away < 1.0);
}

#[test]
pub fn independent_cells() {
    let matrix = build(2.1, 0.7, 10);
    let scale = 1.0 - matrix.truncated_mass();
    for (score, prob) in matrix.scores() {
        let expected = univariate(score.home, 2.1) * univariate(score.away, 0.7) / scale;
        assert_float_relative_eq!(expected, prob, 1e-9);
    }
}

#[test]
pub fn large_rates_pile_mass_on_the_boundary() {
    let matrix = build(500.0, 500.0, 7);
    assert_float_absolute_eq!(1.0, matrix.grid().flatten().sum(), 1e-9);
    assert!(matrix.grid().flatten().iter().all(|prob| prob.is_finite()));
    assert_eq!(1.0, matrix.truncated_mass());

    // p(6)/p(7) = 7/500 on each side
    let top = matrix.prob(&Score::new(7, 7));
    assert_float_relative_eq!(1.0 / (1.0 + 7.0 / 500.0), top.sqrt(), 1e-3);
    assert!(top > 0.95);
    assert_float_relative_eq!(7.0 / 500.0, matrix.prob(&Score::new(6, 7)) / top, 1e-9);
}

#[test]
pub fn normalise_explicit_grid() {
    let mut grid = Matrix::square(2);
    grid[0].copy_from_slice(&[0.2, 0.1]);
    grid[1].copy_from_slice(&[0.3, 0.2]);
    let matrix = ScoreMatrix::normalised(grid);
    assert_float_absolute_eq!(0.25, matrix.prob(&Score::new(0, 0)));
    assert_float_absolute_eq!(0.375, matrix.prob(&Score::new(1, 0)));
    assert_float_absolute_eq!(0.2, matrix.truncated_mass());
}

#[test]
#[should_panic = "cannot normalise a score grid of mass 0"]
pub fn normalise_empty_grid_panics() {
    ScoreMatrix::normalised(Matrix::square(3));
}

#[test]
pub fn serialize_grid() {
    let mut grid = Matrix::square(2);
    grid[0].copy_from_slice(&[0.5, 0.0]);
    grid[1].copy_from_slice(&[0.0, 0.5]);
    let json = serde_json::to_value(ScoreMatrix::normalised(grid)).unwrap();
    assert_eq!(
        serde_json::json!({"grid": [[0.5, 0.0], [0.0, 0.5]], "truncated_mass": 0.0}),
        json
    );
}
