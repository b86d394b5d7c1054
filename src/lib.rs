//! Football match outcome prediction from historical results. Teams are rated by home and away
//! attack and defence strengths relative to league-average scoring; a fixture's expected goals
//! parametrise independent Poisson distributions, from which a joint score matrix and the
//! usual betting markets (1X2, correct score, over/under, both teams to score) are derived.

pub mod config;
pub mod csv;
pub mod data;
pub mod domain;
pub mod error;
pub mod evaluate;
pub mod h2h;
pub mod linear;
pub mod market;
pub mod model;
pub mod poisson;
pub mod print;
pub mod probs;
pub mod scoregrid;
pub mod standings;
pub mod strength;
pub mod xg;

#[cfg(test)]
pub(crate) mod testing;

#[doc = include_str!("../README.md")]
#[cfg(doc)]
fn readme() {}
