//! Date
//!
//! Match dates are calendar dates; the archive and the data-entry format
//! both carry them as `YYYY-MM-DD` strings.
use chrono::NaiveDate;
use serde::{self, Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Deserialize, Serialize, Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Date(#[serde(with = "serde_date")] NaiveDate);

impl Date {
    pub fn try_new(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or(DateError::OutOfRange(year, month, day))
    }

    pub fn mock() -> Self {
        Date(NaiveDate::from_ymd_opt(1632, 11, 6).expect("valid mock date"))
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for Date {
    type Err = DateError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Date)
            .map_err(|_| DateError::Parse(String::from(s)))
    }
}

#[derive(Error, Debug, Clone)]
pub enum DateError {
    #[error("could not parse date '{0}', expected YYYY-MM-DD")]
    Parse(String),
    #[error("date {0}-{1}-{2} out of range")]
    OutOfRange(i32, u32, u32),
}

mod serde_date {
    use chrono::NaiveDate;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = format!("{}", date.format("%Y-%m-%d"));
        serializer.serialize_str(&s)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display() {
        let date = Date::from_str("2024-03-17").unwrap();
        assert_eq!(format!("{}", date), "2024-03-17");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Date::from_str("17/03/2024").is_err());
    }

    #[test]
    fn ordering() {
        let earlier = Date::from_str("2024-03-17").unwrap();
        let later = Date::from_str("2024-04-01").unwrap();
        assert!(earlier < later);
    }
}
