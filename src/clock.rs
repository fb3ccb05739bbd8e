//! Source of "today" for date validation

use chrono::NaiveDate;

/// Provides the current local calendar date
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Wall clock of the running platform
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    /// Browser local date via `Date` (WASM only)
    #[cfg(target_arch = "wasm32")]
    fn today(&self) -> NaiveDate {
        let now = js_sys::Date::new_0();
        NaiveDate::from_ymd_opt(now.get_full_year() as i32, now.get_month() + 1, now.get_date())
            .unwrap_or_else(|| chrono::Utc::now().date_naive())
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// Always reports the same date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
