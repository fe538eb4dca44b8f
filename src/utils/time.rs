use chrono::{DateTime, Duration, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Whether `at` falls within the last `days` days.
pub fn within_days(at: DateTime<Utc>, days: i64) -> bool {
    at > now() - Duration::days(days)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn within_days_window() {
        assert!(within_days(now() - Duration::days(29), 30));
        assert!(!within_days(now() - Duration::days(31), 30));
    }
}
