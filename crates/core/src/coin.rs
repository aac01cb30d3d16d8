//! Multi-denomination coin arithmetic.
//!
//! A [`Coins`] value is a denom-sorted set of [`Coin`]s. Arithmetic is
//! signed and never fails: subtracting more than is held simply yields a
//! negative amount, and callers decide whether that is acceptable by checking
//! [`Coins::is_not_negative`]. Amounts are arbitrary precision so balances
//! can never overflow on any node.

use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors returned when parsing coins from text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoinParseError {
    #[error("invalid coin expression: {0:?}")]
    InvalidExpression(String),
    #[error("invalid denom: {0:?}")]
    InvalidDenom(String),
}

/// A single amount of one denomination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    #[serde(with = "amount_serde")]
    pub amount: BigInt,
}

// Amounts travel as decimal strings so JSON consumers never lose precision.
mod amount_serde {
    use num_bigint::BigInt;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::str::FromStr;

    pub fn serialize<S>(amount: &BigInt, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&amount.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BigInt, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        BigInt::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: impl Into<BigInt>) -> Self {
        Self {
            denom: denom.into(),
            amount: amount.into(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.amount.is_positive()
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

impl FromStr for Coin {
    type Err = CoinParseError;

    /// Parse `"100mycoin"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| CoinParseError::InvalidExpression(s.to_string()))?;
        let (amount, denom) = s.split_at(split);
        if amount.is_empty() {
            return Err(CoinParseError::InvalidExpression(s.to_string()));
        }
        if !is_valid_denom(denom) {
            return Err(CoinParseError::InvalidDenom(denom.to_string()));
        }
        let amount = BigInt::from_str(amount)
            .map_err(|_| CoinParseError::InvalidExpression(s.to_string()))?;
        Ok(Coin::new(denom, amount))
    }
}

/// A denom is a lowercase letter followed by 2 to 15 lowercase letters or digits.
pub fn is_valid_denom(denom: &str) -> bool {
    let bytes = denom.as_bytes();
    if !(3..=16).contains(&bytes.len()) || !bytes[0].is_ascii_lowercase() {
        return false;
    }
    bytes[1..]
        .iter()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
}

/// A denom-sorted set of coins.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Coins(Vec<Coin>);

impl Coins {
    /// Build a coin set, sorting by denom and summing duplicate denoms.
    pub fn new(coins: Vec<Coin>) -> Self {
        Self::from_map(coins.into_iter().fold(BTreeMap::new(), |mut acc, coin| {
            *acc.entry(coin.denom).or_insert_with(BigInt::zero) += coin.amount;
            acc
        }))
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// A set holding exactly one denom.
    pub fn single(denom: impl Into<String>, amount: impl Into<BigInt>) -> Self {
        Self(vec![Coin::new(denom, amount)])
    }

    fn from_map(map: BTreeMap<String, BigInt>) -> Self {
        Self(
            map.into_iter()
                .map(|(denom, amount)| Coin { denom, amount })
                .collect(),
        )
    }

    fn to_map(&self) -> BTreeMap<String, BigInt> {
        self.0
            .iter()
            .map(|c| (c.denom.clone(), c.amount.clone()))
            .collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Coin> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Amount held of `denom`, zero when absent.
    pub fn amount_of(&self, denom: &str) -> BigInt {
        self.0
            .iter()
            .find(|c| c.denom == denom)
            .map(|c| c.amount.clone())
            .unwrap_or_else(BigInt::zero)
    }

    /// Per-denom sum. Every denom present in either operand is kept, even
    /// when the sum is zero.
    pub fn plus(&self, other: &Coins) -> Coins {
        let mut map = self.to_map();
        for coin in &other.0 {
            *map.entry(coin.denom.clone()).or_insert_with(BigInt::zero) += &coin.amount;
        }
        Self::from_map(map)
    }

    /// Per-denom difference; a denom missing from `other` counts as zero.
    pub fn minus(&self, other: &Coins) -> Coins {
        self.plus(&other.negative())
    }

    pub fn negative(&self) -> Coins {
        Self(
            self.0
                .iter()
                .map(|c| Coin::new(c.denom.clone(), -&c.amount))
                .collect(),
        )
    }

    /// True when no amount is below zero. The empty set is not negative.
    pub fn is_not_negative(&self) -> bool {
        self.0.iter().all(|c| !c.amount.is_negative())
    }

    /// True when `self` holds at least `other` in every denom of `other`.
    pub fn is_gte(&self, other: &Coins) -> bool {
        self.minus(other).is_not_negative()
    }

    /// True when every amount is zero (the empty set included).
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(Coin::is_zero)
    }

    /// True when the set is non-empty and every amount is strictly positive.
    pub fn is_positive(&self) -> bool {
        !self.0.is_empty() && self.0.iter().all(Coin::is_positive)
    }

    /// Structural validity of a user-supplied set: well-formed denoms,
    /// strictly ascending denom order (which also rules out duplicates) and
    /// no zero or negative amounts.
    pub fn is_valid(&self) -> bool {
        self.0.iter().all(|c| is_valid_denom(&c.denom) && c.is_positive())
            && self.0.windows(2).all(|w| w[0].denom < w[1].denom)
    }

    /// Drop every zero entry.
    pub fn without_zeros(&self) -> Coins {
        Self(self.0.iter().filter(|c| !c.is_zero()).cloned().collect())
    }

    /// Clamp every negative amount to zero, dropping it from the set.
    pub fn clamp_negative(&self) -> Coins {
        Self(self.0.iter().filter(|c| c.is_positive()).cloned().collect())
    }
}

impl From<Vec<Coin>> for Coins {
    fn from(coins: Vec<Coin>) -> Self {
        Self::new(coins)
    }
}

impl<'a> IntoIterator for &'a Coins {
    type Item = &'a Coin;
    type IntoIter = std::slice::Iter<'a, Coin>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(Coin::to_string).collect();
        write!(f, "{}", parts.join(","))
    }
}

impl FromStr for Coins {
    type Err = CoinParseError;

    /// Parse `"100mycoin,5stake"`. The empty string is the empty set.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(Coins::empty());
        }
        let coins = s
            .split(',')
            .map(Coin::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Coins::new(coins))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coins(s: &str) -> Coins {
        s.parse().unwrap()
    }

    #[test]
    fn test_new_sorts_and_merges() {
        let c = Coins::new(vec![
            Coin::new("stake", 5),
            Coin::new("mycoin", 10),
            Coin::new("stake", 2),
        ]);
        assert_eq!(c.to_string(), "10mycoin,7stake");
    }

    #[test]
    fn test_plus_and_minus() {
        let a = coins("100mycoin,5stake");
        let b = coins("40mycoin");

        assert_eq!(a.plus(&b), coins("140mycoin,5stake"));
        assert_eq!(a.minus(&b), coins("60mycoin,5stake"));

        // Denoms only in the subtrahend go negative.
        let diff = b.minus(&a);
        assert_eq!(diff.amount_of("mycoin"), BigInt::from(-60));
        assert_eq!(diff.amount_of("stake"), BigInt::from(-5));
        assert!(!diff.is_not_negative());
    }

    #[test]
    fn test_minus_keeps_zero_entries() {
        let a = coins("40mycoin");
        let diff = a.minus(&a);
        assert_eq!(diff.len(), 1);
        assert!(diff.is_zero());
        assert!(diff.without_zeros().is_empty());
    }

    #[test]
    fn test_is_gte() {
        let a = coins("100mycoin,5stake");
        assert!(a.is_gte(&coins("100mycoin")));
        assert!(a.is_gte(&Coins::empty()));
        assert!(!a.is_gte(&coins("101mycoin")));
        assert!(!a.is_gte(&coins("1atom")));
        assert!(Coins::empty().is_gte(&Coins::empty()));
    }

    #[test]
    fn test_amount_of_absent_is_zero() {
        assert!(coins("5stake").amount_of("mycoin").is_zero());
    }

    #[test]
    fn test_validity() {
        assert!(coins("1abc,2abd").is_valid());
        assert!(Coins::empty().is_valid());
        assert!(!Coins::empty().is_positive());

        // Unsorted raw input is caught.
        let unsorted: Coins =
            serde_json::from_str(r#"[{"denom":"stake","amount":"1"},{"denom":"atom","amount":"1"}]"#)
                .unwrap();
        assert!(!unsorted.is_valid());

        let zero: Coins = serde_json::from_str(r#"[{"denom":"atom","amount":"0"}]"#).unwrap();
        assert!(!zero.is_valid());
        assert!(!zero.is_positive());

        let bad_denom = Coins(vec![Coin::new("Atom", 1)]);
        assert!(!bad_denom.is_valid());
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "mycoin".parse::<Coin>(),
            Err(CoinParseError::InvalidExpression("mycoin".into()))
        );
        assert_eq!(
            "10X".parse::<Coin>(),
            Err(CoinParseError::InvalidDenom("X".into()))
        );
        assert!("100".parse::<Coin>().is_err());
    }

    #[test]
    fn test_large_amounts_do_not_overflow() {
        let big = coins("340282366920938463463374607431768211455mycoin");
        let sum = big.plus(&big);
        assert_eq!(
            sum.amount_of("mycoin").to_string(),
            "680564733841876926926749214863536422910"
        );
    }

    #[test]
    fn test_amount_serializes_as_string() {
        let json = serde_json::to_string(&coins("100mycoin")).unwrap();
        assert_eq!(json, r#"[{"denom":"mycoin","amount":"100"}]"#);

        let bytes = bincode::serialize(&coins("7stake")).unwrap();
        let back: Coins = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, coins("7stake"));
    }
}
