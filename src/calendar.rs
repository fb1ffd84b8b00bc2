//! Date math used by the hype quota and the post renderer.
//!
//! Nothing here reads the clock; every function takes `now`.

use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc,
};

/// Monday 00:00 of the week containing `now`, in `now`'s time zone.
pub fn week_start<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Tz> {
    let local = now.naive_local();
    let back = i64::from(local.weekday().num_days_from_monday());
    match (local.date() - Duration::days(back)).and_hms_opt(0, 0, 0) {
        Some(monday) => resolve_local(&now.timezone(), monday),
        None => now.clone(),
    }
}

// A skipped midnight (DST gap) starts the week at the first valid hour.
fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(at) | LocalResult::Ambiguous(at, _) => at,
        LocalResult::None => tz
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
            .unwrap_or_else(|| tz.from_utc_datetime(&naive)),
    }
}

/// Whether `at` falls in the calendar month and year of `now`, seen from `now`'s zone.
pub fn same_month<A: TimeZone, Tz: TimeZone>(at: &DateTime<A>, now: &DateTime<Tz>) -> bool {
    let at = at.with_timezone(&now.timezone());
    at.year() == now.year() && at.month() == now.month()
}

/// Short elapsed-time label for a post header.
pub fn time_ago<Tz: TimeZone>(then: &DateTime<Utc>, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let elapsed = now.with_timezone(&Utc).signed_duration_since(*then);
    if elapsed < Duration::minutes(1) {
        "just now".to_string()
    } else if elapsed < Duration::hours(1) {
        format!("{}m ago", elapsed.num_minutes())
    } else if elapsed < Duration::days(1) {
        format!("{}h ago", elapsed.num_hours())
    } else if elapsed < Duration::days(7) {
        format!("{}d ago", elapsed.num_days())
    } else {
        then.with_timezone(&now.timezone())
            .format("%b %-d, %Y")
            .to_string()
    }
}

/// Calendar days from `now` until `target`, negative once it has passed.
pub fn days_until<Tz: TimeZone>(target: &DateTime<Utc>, now: &DateTime<Tz>) -> i64 {
    let target = target.with_timezone(&now.timezone()).date_naive();
    target.signed_duration_since(now.date_naive()).num_days()
}

/// Completed years since `date`, counting the anniversary day itself.
pub fn years_since<Tz: TimeZone>(date: NaiveDate, now: &DateTime<Tz>) -> i32 {
    let today = now.date_naive();
    let mut years = today.year() - date.year();
    if (today.month(), today.day()) < (date.month(), date.day()) {
        years -= 1;
    }
    years
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, Weekday};

    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap()
    }

    #[test]
    fn week_starts_on_monday_midnight() {
        // 2026-10-15 is a Thursday
        let start = week_start(&at(2026, 10, 15, 18, 30));
        assert_eq!(start, at(2026, 10, 12, 0, 0));
        assert_eq!(start.weekday(), Weekday::Mon);
    }

    #[test]
    fn monday_midnight_is_its_own_week_start() {
        let monday = at(2026, 10, 12, 0, 0);
        assert_eq!(week_start(&monday), monday);
    }

    #[test]
    fn sunday_belongs_to_previous_monday() {
        assert_eq!(week_start(&at(2026, 10, 18, 23, 59)), at(2026, 10, 12, 0, 0));
    }

    #[test]
    fn week_start_uses_local_date() {
        // 23:30 UTC on Sunday is already Monday at +02:00
        let utc = Utc.with_ymd_and_hms(2026, 10, 18, 23, 30, 0).unwrap();
        let local = utc.with_timezone(&FixedOffset::east_opt(2 * 3600).unwrap());
        assert_eq!(week_start(&local), at(2026, 10, 19, 0, 0));
        assert_eq!(
            week_start(&utc),
            Utc.with_ymd_and_hms(2026, 10, 12, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn month_comparison_follows_zone_of_now() {
        let utc = Utc.with_ymd_and_hms(2026, 9, 30, 23, 0, 0).unwrap();
        assert!(same_month(&utc, &at(2026, 10, 5, 12, 0)));
        assert!(!same_month(&utc, &Utc.with_ymd_and_hms(2026, 10, 5, 12, 0, 0).unwrap()));
        assert!(!same_month(&at(2025, 10, 5, 12, 0), &at(2026, 10, 5, 12, 0)));
    }

    #[test]
    fn elapsed_labels() {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();
        let ago = |d: Duration| time_ago(&(now - d), &now);

        assert_eq!(ago(Duration::seconds(20)), "just now");
        assert_eq!(ago(Duration::minutes(5)), "5m ago");
        assert_eq!(ago(Duration::hours(3)), "3h ago");
        assert_eq!(ago(Duration::days(2)), "2d ago");
        assert_eq!(ago(Duration::days(30)), "Sep 16, 2026");
        assert_eq!(time_ago(&(now + Duration::hours(1)), &now), "just now");
    }

    #[test]
    fn countdown_and_anniversaries() {
        let now = at(2026, 10, 16, 9, 0);
        let release = Utc.with_ymd_and_hms(2026, 12, 18, 0, 0, 0).unwrap();
        assert_eq!(days_until(&release, &now), 63);
        assert_eq!(days_until(&Utc.with_ymd_and_hms(2026, 10, 15, 0, 0, 0).unwrap(), &now), -1);

        let born = NaiveDate::from_ymd_opt(1967, 10, 3).unwrap();
        assert_eq!(years_since(born, &now), 59);
        let later = NaiveDate::from_ymd_opt(1967, 10, 17).unwrap();
        assert_eq!(years_since(later, &now), 58);
        let today = NaiveDate::from_ymd_opt(2016, 10, 16).unwrap();
        assert_eq!(years_since(today, &now), 10);
    }
}
