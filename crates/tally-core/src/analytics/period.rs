//! Period resolution
//!
//! Turns named period tokens and budget cycles into half-open date windows.
//! Every window is `[start, end)` over calendar dates; callers pass `today`
//! explicitly so results never depend on the wall clock.

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::BudgetPeriod;

/// A named reporting period relative to today
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Period {
    ThisMonth,
    LastMonth,
    ThisYear,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ThisMonth => "thisMonth",
            Self::LastMonth => "lastMonth",
            Self::ThisYear => "thisYear",
        }
    }

    /// Resolve this period against `today`
    pub fn window(&self, today: NaiveDate) -> Result<DateWindow> {
        match self {
            Self::ThisMonth => month_window(today),
            Self::LastMonth => {
                let this_month = month_start(today);
                Ok(DateWindow {
                    start: add_months(this_month, -1)?,
                    end: this_month,
                })
            }
            Self::ThisYear => {
                let start = NaiveDate::from_yo_opt(today.year(), 1)
                    .ok_or_else(|| out_of_range(today))?;
                let end = today.succ_opt().ok_or_else(|| out_of_range(today))?;
                Ok(DateWindow { start, end })
            }
        }
    }
}

impl std::str::FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "thisMonth" | "this-month" => Ok(Self::ThisMonth),
            "lastMonth" | "last-month" => Ok(Self::LastMonth),
            "thisYear" | "this-year" => Ok(Self::ThisYear),
            other => Err(Error::InvalidPeriod(other.to_string())),
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Half-open date range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    /// Exclusive
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }

    /// Last date inside the window (inclusive bound for SQL `<=` filters)
    pub fn last_day(&self) -> NaiveDate {
        self.end.pred_opt().unwrap_or(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Resolve a period token (`thisMonth`, `lastMonth`, `thisYear`) against `today`
pub fn resolve_period(token: &str, today: NaiveDate) -> Result<DateWindow> {
    let period: Period = token.parse()?;
    period.window(today)
}

/// The cycle window of a budget starting on `start`
///
/// Monthly and yearly cycles use calendar arithmetic, clamping to the end of
/// shorter months (Jan 31 + 1 month = Feb 28/29).
pub fn budget_window(period: BudgetPeriod, start: NaiveDate) -> Result<DateWindow> {
    let end = match period {
        BudgetPeriod::Weekly => start
            .checked_add_signed(Duration::days(7))
            .ok_or_else(|| out_of_range(start))?,
        BudgetPeriod::Monthly => add_months(start, 1)?,
        BudgetPeriod::Yearly => add_months(start, 12)?,
    };
    Ok(DateWindow { start, end })
}

/// The calendar month containing `date`
pub fn month_window(date: NaiveDate) -> Result<DateWindow> {
    let start = month_start(date);
    Ok(DateWindow {
        start,
        end: add_months(start, 1)?,
    })
}

/// First day of the month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

/// Shift `date` by a signed number of calendar months
pub fn add_months(date: NaiveDate, months: i32) -> Result<NaiveDate> {
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(months.unsigned_abs()))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    shifted.ok_or_else(|| out_of_range(date))
}

fn out_of_range(date: NaiveDate) -> Error {
    Error::InvalidInput(format!("date out of range: {}", date))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_this_month() {
        let w = resolve_period("thisMonth", d(2024, 3, 15)).unwrap();
        assert_eq!(w.start, d(2024, 3, 1));
        assert_eq!(w.end, d(2024, 4, 1));
        assert!(w.contains(d(2024, 3, 31)));
        assert!(!w.contains(d(2024, 4, 1)));
    }

    #[test]
    fn test_last_month_across_year_boundary() {
        let w = resolve_period("lastMonth", d(2024, 1, 10)).unwrap();
        assert_eq!(w.start, d(2023, 12, 1));
        assert_eq!(w.end, d(2024, 1, 1));
    }

    #[test]
    fn test_this_year_includes_today() {
        let w = resolve_period("thisYear", d(2024, 3, 15)).unwrap();
        assert_eq!(w.start, d(2024, 1, 1));
        assert!(w.contains(d(2024, 3, 15)));
        assert!(!w.contains(d(2024, 3, 16)));
    }

    #[test]
    fn test_kebab_case_tokens() {
        assert_eq!("this-month".parse::<Period>().unwrap(), Period::ThisMonth);
        assert_eq!("last-month".parse::<Period>().unwrap(), Period::LastMonth);
        assert_eq!("this-year".parse::<Period>().unwrap(), Period::ThisYear);
    }

    #[test]
    fn test_unknown_token_is_an_error() {
        let err = resolve_period("fortnight", d(2024, 3, 15)).unwrap_err();
        assert!(matches!(err, Error::InvalidPeriod(ref t) if t == "fortnight"));
    }

    #[test]
    fn test_budget_window_monthly_clamps() {
        let w = budget_window(BudgetPeriod::Monthly, d(2024, 1, 31)).unwrap();
        assert_eq!(w.end, d(2024, 2, 29));
    }

    #[test]
    fn test_budget_window_weekly_and_yearly() {
        let weekly = budget_window(BudgetPeriod::Weekly, d(2024, 3, 1)).unwrap();
        assert_eq!(weekly.end, d(2024, 3, 8));

        let yearly = budget_window(BudgetPeriod::Yearly, d(2024, 2, 29)).unwrap();
        assert_eq!(yearly.end, d(2025, 2, 28));
    }

    #[test]
    fn test_month_window_and_last_day() {
        let w = month_window(d(2023, 2, 14)).unwrap();
        assert_eq!(w.start, d(2023, 2, 1));
        assert_eq!(w.last_day(), d(2023, 2, 28));
    }
}
