//! Exact fractions for ordering rate metrics.
//!
//! Rates built from different counting lines can be equal as fractions yet
//! differ in their last `f64` bit (OPS sums two fractions). Ranking and
//! comparison order on these instead, so equal rates tie.

use std::cmp::Ordering;

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};

use crate::models::RawStats;

/// A non-negative fraction with a non-zero denominator.
#[derive(Debug, Clone)]
pub struct Fraction {
    num: BigUint,
    den: BigUint,
}

impl Fraction {
    /// `num / den`, or zero when `den` is zero.
    pub fn new(num: impl Into<BigUint>, den: impl Into<BigUint>) -> Self {
        let den = den.into();
        if den.is_zero() {
            return Self::zero();
        }
        Self {
            num: num.into(),
            den,
        }
    }

    pub fn whole(n: impl Into<BigUint>) -> Self {
        Self {
            num: n.into(),
            den: BigUint::from(1u32),
        }
    }

    pub fn zero() -> Self {
        Self::whole(0u32)
    }

    pub fn plus(&self, other: &Fraction) -> Fraction {
        Fraction {
            num: &self.num * &other.den + &other.num * &self.den,
            den: &self.den * &other.den,
        }
    }

    /// Nearest `f64`. Equal fractions map to the same value while both
    /// parts fit in 53 bits.
    pub fn to_f64(&self) -> f64 {
        let num = self.num.to_f64().unwrap_or(f64::INFINITY);
        let den = self.den.to_f64().unwrap_or(f64::INFINITY);
        num / den
    }
}

impl PartialEq for Fraction {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Fraction {}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fraction {
    fn cmp(&self, other: &Self) -> Ordering {
        (&self.num * &other.den).cmp(&(&other.num * &self.den))
    }
}

pub fn batting_avg(raw: &RawStats) -> Fraction {
    Fraction::new(raw.hits, raw.at_bats)
}

/// On-base plus slugging, with each half zero on an empty denominator.
pub fn ops(raw: &RawStats) -> Fraction {
    let hits = raw.hits as u64;
    let walks = raw.walks as u64;
    let at_bats = raw.at_bats as u64;
    let total_bases = hits + raw.doubles as u64 + 2 * raw.triples as u64 + 3 * raw.home_runs as u64;

    let on_base = Fraction::new(hits + walks, at_bats + walks);
    let slugging = Fraction::new(total_bases, at_bats);
    on_base.plus(&slugging)
}

pub fn power_speed_number(raw: &RawStats) -> Fraction {
    let home_runs = raw.home_runs as u64;
    let stolen_bases = raw.stolen_bases as u64;
    Fraction::new(
        2 * home_runs as u128 * stolen_bases as u128,
        home_runs + stolen_bases,
    )
}

/// Walks per strikeout; the walk count itself when there are no strikeouts.
pub fn walk_to_strikeout_ratio(raw: &RawStats) -> Fraction {
    if raw.strikeouts == 0 {
        Fraction::whole(raw.walks)
    } else {
        Fraction::new(raw.walks, raw.strikeouts)
    }
}
