use chrono::{DateTime, NaiveDate, Utc};

use crate::types::{EvaluationResult, Severity, Thresholds};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Classify one certificate against the thresholds at day resolution.
///
/// The rules are an ordered list, first match wins: already expired,
/// within `critical_days` (inclusive), within `warning_days` (exclusive),
/// otherwise OK.
pub fn evaluate(
    common_name: &str,
    not_after: DateTime<Utc>,
    thresholds: &Thresholds,
    today: NaiveDate,
) -> EvaluationResult {
    let expires_on = not_after.date_naive();
    let days_remaining = (expires_on - today).num_days();
    let date = expires_on.format(DATE_FORMAT);

    let (severity, message) = if expires_on < today {
        (
            Severity::Critical,
            Some(format!("{common_name} expired on {date}")),
        )
    } else if days_remaining <= i64::from(thresholds.critical_days) {
        (
            Severity::Critical,
            Some(format!(
                "{common_name} will expire on {date} - {days_remaining} day(s) left"
            )),
        )
    } else if days_remaining < i64::from(thresholds.warning_days) {
        (
            Severity::Warning,
            Some(format!(
                "{common_name} will expire on {date} - {days_remaining} day(s) left"
            )),
        )
    } else {
        (Severity::Ok, None)
    };

    EvaluationResult {
        common_name: common_name.to_string(),
        expires_on,
        severity,
        message,
        days_remaining,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 11, 10).unwrap()
    }

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn thresholds() -> Thresholds {
        Thresholds::new(30, 10)
    }

    #[test]
    fn expired_certificate_is_critical() {
        let r = evaluate("example.org", at(2020, 10, 2), &thresholds(), today());
        assert_eq!(r.severity, Severity::Critical);
        assert_eq!(
            r.message.as_deref(),
            Some("example.org expired on 2020-10-02")
        );
        assert_eq!(r.days_remaining, -39);
    }

    #[test]
    fn inside_critical_window_is_critical() {
        let r = evaluate("example2.org", at(2020, 11, 13), &thresholds(), today());
        assert_eq!(r.severity, Severity::Critical);
        assert_eq!(r.days_remaining, 3);
        assert_eq!(
            r.message.as_deref(),
            Some("example2.org will expire on 2020-11-13 - 3 day(s) left")
        );
    }

    #[test]
    fn inside_warning_window_is_warning() {
        let r = evaluate("example3.org", at(2020, 12, 1), &thresholds(), today());
        assert_eq!(r.severity, Severity::Warning);
        assert_eq!(r.days_remaining, 21);
        assert_eq!(
            r.message.as_deref(),
            Some("example3.org will expire on 2020-12-01 - 21 day(s) left")
        );
    }

    #[test]
    fn far_future_is_ok_without_message() {
        let r = evaluate("example4.org", at(2021, 6, 1), &thresholds(), today());
        assert_eq!(r.severity, Severity::Ok);
        assert_eq!(r.message, None);
        assert_eq!(r.days_remaining, 203);
    }

    #[test]
    fn expiring_today_is_critical_not_expired() {
        let r = evaluate("today.example", at(2020, 11, 10), &thresholds(), today());
        assert_eq!(r.severity, Severity::Critical);
        assert_eq!(r.days_remaining, 0);
        assert!(r.message.unwrap().contains("will expire on 2020-11-10 - 0 day(s) left"));
    }

    #[test]
    fn critical_boundary_is_inclusive() {
        let r = evaluate("edge", at(2020, 11, 20), &thresholds(), today());
        assert_eq!(r.days_remaining, 10);
        assert_eq!(r.severity, Severity::Critical);

        let r = evaluate("edge", at(2020, 11, 21), &thresholds(), today());
        assert_eq!(r.days_remaining, 11);
        assert_eq!(r.severity, Severity::Warning);
    }

    #[test]
    fn warning_boundary_is_exclusive() {
        let r = evaluate("edge", at(2020, 12, 9), &thresholds(), today());
        assert_eq!(r.days_remaining, 29);
        assert_eq!(r.severity, Severity::Warning);

        let r = evaluate("edge", at(2020, 12, 10), &thresholds(), today());
        assert_eq!(r.days_remaining, 30);
        assert_eq!(r.severity, Severity::Ok);
    }

    #[test]
    fn time_of_day_does_not_matter() {
        let late = Utc.with_ymd_and_hms(2020, 11, 9, 23, 59, 59).unwrap();
        let r = evaluate("late", late, &thresholds(), today());
        assert_eq!(r.severity, Severity::Critical);
        assert!(r.message.unwrap().contains("expired on 2020-11-09"));
    }

    #[test]
    fn inverted_thresholds_follow_rule_order() {
        let inverted = Thresholds::new(5, 20);
        let r = evaluate("inv", at(2020, 11, 25), &inverted, today());
        assert_eq!(r.days_remaining, 15);
        assert_eq!(r.severity, Severity::Critical);

        let r = evaluate("inv", at(2020, 12, 5), &inverted, today());
        assert_eq!(r.severity, Severity::Ok);
    }

    #[test]
    fn zero_thresholds_only_flag_today_and_past() {
        let zero = Thresholds::new(0, 0);
        assert_eq!(
            evaluate("z", at(2020, 11, 10), &zero, today()).severity,
            Severity::Critical
        );
        assert_eq!(
            evaluate("z", at(2020, 11, 11), &zero, today()).severity,
            Severity::Ok
        );
    }

    #[test]
    fn critical_evaluation_snapshot() {
        let r = evaluate("example2.org", at(2020, 11, 13), &thresholds(), today());
        insta::assert_json_snapshot!(r, @r###"
        {
          "common_name": "example2.org",
          "expires_on": "2020-11-13",
          "severity": "CRITICAL",
          "message": "example2.org will expire on 2020-11-13 - 3 day(s) left",
          "days_remaining": 3
        }
        "###);
    }
}
