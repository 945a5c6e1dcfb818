//! Week labels
//!
//! A match belongs to a week identified by a free-form label. Regular-season
//! weeks are called `Week <n>`; playoff rounds carry names like `Foci Four`
//! or `Super Ball`. Only regular weeks count towards season stat rollups and
//! standings.
use derive_more::{AsRef, Display, From, Into};
use serde::{Deserialize, Serialize};

/// Week labels designating a championship final.
pub const FINAL_WEEKS: &[&str] = &["Super Ball", "Muper Ball", "Nuper Ball", "Buper Ball"];

#[derive(
    Debug,
    Display,
    Deserialize,
    Serialize,
    Clone,
    AsRef,
    From,
    Into,
    Eq,
    PartialEq,
    Hash,
    Ord,
    PartialOrd,
)]
#[as_ref(forward)]
pub struct Week(pub String);

impl Week {
    pub fn new<S: AsRef<str>>(label: S) -> Self {
        Week(String::from(label.as_ref()))
    }

    /// Regular-season test: the label prefix decides, so `Week 1` and
    /// `Week 12` qualify while `Foci Four` does not.
    pub fn is_regular(&self) -> bool {
        self.0.starts_with("Week ")
    }

    /// Number of a `Week <n>` label, `None` for anything else.
    pub fn number(&self) -> Option<u32> {
        self.0.strip_prefix("Week ")?.parse().ok()
    }

    /// The label following this one, defined only for numbered weeks.
    pub fn next(&self) -> Option<Week> {
        self.number().map(|n| Week(format!("Week {}", n + 1)))
    }

    pub fn is_final(&self) -> bool {
        FINAL_WEEKS.contains(&self.0.as_str())
    }
}

impl From<&str> for Week {
    fn from(label: &str) -> Self {
        Week::new(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regular_weeks() {
        assert!(Week::from("Week 1").is_regular());
        assert!(Week::from("Week 12").is_regular());
        assert!(!Week::from("Foci Four").is_regular());
        assert!(!Week::from("Weekend").is_regular());
    }

    #[test]
    fn week_numbers() {
        assert_eq!(Week::from("Week 7").number(), Some(7));
        assert_eq!(Week::from("Week seven").number(), None);
        assert_eq!(Week::from("Super Ball").number(), None);
    }

    #[test]
    fn next_week() {
        assert_eq!(Week::from("Week 7").next(), Some(Week::from("Week 8")));
        assert_eq!(Week::from("Foci Four").next(), None);
    }

    #[test]
    fn finals() {
        assert!(Week::from("Super Ball").is_final());
        assert!(Week::from("Muper Ball").is_final());
        assert!(!Week::from("Week 9").is_final());
    }
}
