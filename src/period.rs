//! Month and week window resolution for the calendar and dashboard queries.
//!
//! Pure calendar-date arithmetic on `NaiveDate`: windows are computed from
//! date components, so daylight-saving transitions cannot skew a bound.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Month or week display mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarView {
    Month,
    Week,
}

/// Paging direction for period navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Back,
    Forward,
}

/// Inclusive `[start, end]` date range backing a calendar or dashboard query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PeriodWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// First through last day of the given month (1-based, chrono style).
/// Returns `None` for an invalid month or a year outside chrono's range.
pub fn month_window(year: i32, month: u32) -> Option<PeriodWindow> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let first_of_next = match month {
        12 => NaiveDate::from_ymd_opt(year + 1, 1, 1)?,
        _ => NaiveDate::from_ymd_opt(year, month + 1, 1)?,
    };
    let end = first_of_next.pred_opt()?;
    Some(PeriodWindow { start, end })
}

/// Sunday-through-Saturday week containing the anchor date.
pub fn week_window(anchor: NaiveDate) -> PeriodWindow {
    let back = u64::from(anchor.weekday().num_days_from_sunday());
    let start = anchor.checked_sub_days(Days::new(back)).unwrap_or(NaiveDate::MIN);
    let end = start.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX);
    PeriodWindow { start, end }
}

/// Window for the given view anchored at `today`.
pub fn window_for(view: CalendarView, today: NaiveDate) -> Option<PeriodWindow> {
    match view {
        CalendarView::Month => month_window(today.year(), today.month()),
        CalendarView::Week => Some(week_window(today)),
    }
}

/// Steps a window to the next or previous period: months roll the year at
/// the December/January boundary, weeks shift both bounds by exactly 7 days.
pub fn advance(window: &PeriodWindow, view: CalendarView, direction: Direction) -> Option<PeriodWindow> {
    match view {
        CalendarView::Month => {
            let year = window.start.year();
            let month = window.start.month();
            let (year, month) = match (month, direction) {
                (12, Direction::Forward) => (year + 1, 1),
                (1, Direction::Back) => (year - 1, 12),
                (m, Direction::Forward) => (year, m + 1),
                (m, Direction::Back) => (year, m - 1),
            };
            month_window(year, month)
        }
        CalendarView::Week => {
            let shift = Days::new(7);
            let (start, end) = match direction {
                Direction::Forward => (
                    window.start.checked_add_days(shift)?,
                    window.end.checked_add_days(shift)?,
                ),
                Direction::Back => (
                    window.start.checked_sub_days(shift)?,
                    window.end.checked_sub_days(shift)?,
                ),
            };
            Some(PeriodWindow { start, end })
        }
    }
}
