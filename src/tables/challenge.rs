//! # Challenge Ratings
//!
//! The challenge rating table mapping CR tokens to their ordering rank and
//! experience value.

use crate::{WarbandError, WarbandResult};
use serde::{Deserialize, Serialize};

/// A resolved challenge rating.
///
/// # Examples
///
/// ```
/// use warband::ChallengeRating;
///
/// let cr = ChallengeRating::lookup("1/4").unwrap();
/// assert_eq!(cr.numeric, 0.25);
/// assert_eq!(cr.exp, 50);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChallengeRating {
    /// Display token, e.g. `"1/2"`
    pub string: &'static str,
    /// Numeric rank used for ordering and range filters
    pub numeric: f64,
    /// Experience awarded per creature
    pub exp: u64,
}

impl ChallengeRating {
    const fn new(string: &'static str, numeric: f64, exp: u64) -> Self {
        Self {
            string,
            numeric,
            exp,
        }
    }

    /// Resolves a CR token against the table.
    pub fn lookup(token: &str) -> WarbandResult<ChallengeRating> {
        CHALLENGE_RATINGS
            .iter()
            .find(|cr| cr.string == token.trim())
            .copied()
            .ok_or_else(|| WarbandError::UnknownChallengeRating(token.to_string()))
    }

    /// All challenge ratings in ascending order.
    pub fn all() -> &'static [ChallengeRating] {
        &CHALLENGE_RATINGS
    }
}

impl<'de> Deserialize<'de> for ChallengeRating {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let token = String::deserialize(deserializer)?;
        ChallengeRating::lookup(&token).map_err(serde::de::Error::custom)
    }
}

static CHALLENGE_RATINGS: [ChallengeRating; 34] = [
    ChallengeRating::new("0", 0.0, 10),
    ChallengeRating::new("1/8", 0.125, 25),
    ChallengeRating::new("1/4", 0.25, 50),
    ChallengeRating::new("1/2", 0.5, 100),
    ChallengeRating::new("1", 1.0, 200),
    ChallengeRating::new("2", 2.0, 450),
    ChallengeRating::new("3", 3.0, 700),
    ChallengeRating::new("4", 4.0, 1100),
    ChallengeRating::new("5", 5.0, 1800),
    ChallengeRating::new("6", 6.0, 2300),
    ChallengeRating::new("7", 7.0, 2900),
    ChallengeRating::new("8", 8.0, 3900),
    ChallengeRating::new("9", 9.0, 5000),
    ChallengeRating::new("10", 10.0, 5900),
    ChallengeRating::new("11", 11.0, 7200),
    ChallengeRating::new("12", 12.0, 8400),
    ChallengeRating::new("13", 13.0, 10000),
    ChallengeRating::new("14", 14.0, 11500),
    ChallengeRating::new("15", 15.0, 13000),
    ChallengeRating::new("16", 16.0, 15000),
    ChallengeRating::new("17", 17.0, 18000),
    ChallengeRating::new("18", 18.0, 20000),
    ChallengeRating::new("19", 19.0, 22000),
    ChallengeRating::new("20", 20.0, 25000),
    ChallengeRating::new("21", 21.0, 33000),
    ChallengeRating::new("22", 22.0, 41000),
    ChallengeRating::new("23", 23.0, 50000),
    ChallengeRating::new("24", 24.0, 62000),
    ChallengeRating::new("25", 25.0, 75000),
    ChallengeRating::new("26", 26.0, 90000),
    ChallengeRating::new("27", 27.0, 105000),
    ChallengeRating::new("28", 28.0, 120000),
    ChallengeRating::new("29", 29.0, 135000),
    ChallengeRating::new("30", 30.0, 155000),
];
