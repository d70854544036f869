use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};

/// A calendar month, displayed as `MM-YYYY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthLabel {
    pub year: i32,
    /// 1-based month number.
    pub month: u32,
}

impl MonthLabel {
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn preceding(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }
}

impl std::fmt::Display for MonthLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}-{}", self.month, self.year)
    }
}

impl Serialize for MonthLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The last three completed months before `today`, oldest first.
pub fn trailing_months(today: NaiveDate) -> [MonthLabel; 3] {
    let last = MonthLabel::containing(today).preceding();
    let middle = last.preceding();
    let oldest = middle.preceding();
    [oldest, middle, last]
}
