use crate::prelude::*;

pub fn now() -> DateTime {
  Utc::now().naive_utc()
}

pub fn days_ago(now: DateTime, days: i64) -> DateTime {
  now - TimeDelta::days(days)
}

/// Length of the unbroken run of active days ending at `today`.
/// An inactive `today` yields 0, the walk never looks further back than
/// `window` days.
pub fn active_streak(
  days: impl IntoIterator<Item = NaiveDate>,
  today: NaiveDate,
  window: i64,
) -> i64 {
  let active: std::collections::HashSet<NaiveDate> = days.into_iter().collect();

  (0..window)
    .take_while(|&offset| active.contains(&(today - TimeDelta::days(offset))))
    .count() as i64
}
