use chrono::{DateTime, Utc};

/// Relative age of a timestamp for display, e.g. "5m ago".
pub fn age_display(at: DateTime<Utc>) -> String {
    age_display_at(at, Utc::now())
}

/// Relative age of `at` as seen from `now`.
pub fn age_display_at(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - at).num_minutes();
    if minutes < 1 {
        // Also covers clock skew
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1410 {
        // 30m past the hour rounds up; from 23h 30m on it reads as a day
        let hours = minutes / 60;
        if minutes % 60 >= 30 {
            format!("{}h ago", hours + 1)
        } else {
            format!("{}h ago", hours)
        }
    } else if minutes < 1440 {
        "1d ago".to_string()
    } else {
        let days = minutes / 1440;
        if (minutes % 1440) / 60 >= 12 {
            format!("{}d ago", days + 1)
        } else {
            format!("{}d ago", days)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_age_display_buckets() {
        let now = Utc::now();
        assert_eq!(age_display_at(now, now), "just now");
        assert_eq!(age_display_at(now - Duration::minutes(5), now), "5m ago");
        assert_eq!(age_display_at(now - Duration::minutes(89), now), "1h ago");
        assert_eq!(age_display_at(now - Duration::minutes(90), now), "2h ago");
        assert_eq!(age_display_at(now - Duration::hours(36), now), "2d ago");
        assert_eq!(age_display_at(now - Duration::hours(30), now), "1d ago");
    }

    #[test]
    fn test_age_display_rounds_into_days() {
        let now = Utc::now();
        assert_eq!(age_display_at(now - Duration::minutes(1409), now), "23h ago");
        assert_eq!(age_display_at(now - Duration::minutes(1410), now), "1d ago");
        assert_eq!(age_display_at(now - Duration::minutes(1439), now), "1d ago");
        assert_eq!(age_display_at(now - Duration::minutes(1440), now), "1d ago");
    }

    #[test]
    fn test_age_display_future_timestamp() {
        let now = Utc::now();
        assert_eq!(age_display_at(now + Duration::minutes(10), now), "just now");
    }
}
