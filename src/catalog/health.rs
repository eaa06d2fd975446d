use serde::Serialize;

pub const MIN_SCORE: i32 = 0;
pub const MAX_SCORE: i32 = 100;
pub const DEFAULT_SCORE: i32 = 50;

/// A health score that is always within `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct HealthScore(i32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthRating {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl HealthScore {
    pub fn clamped(raw: i64) -> Self {
        Self(raw.clamp(MIN_SCORE as i64, MAX_SCORE as i64) as i32)
    }

    pub fn value(self) -> i32 {
        self.0
    }

    pub fn rating(self) -> HealthRating {
        match self.0 {
            80.. => HealthRating::Excellent,
            60..=79 => HealthRating::Good,
            40..=59 => HealthRating::Fair,
            _ => HealthRating::Poor,
        }
    }
}

impl Default for HealthScore {
    fn default() -> Self {
        Self(DEFAULT_SCORE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_into_range() {
        assert_eq!(HealthScore::clamped(-5).value(), 0);
        assert_eq!(HealthScore::clamped(140).value(), 100);
        assert_eq!(HealthScore::clamped(73).value(), 73);
        assert_eq!(HealthScore::clamped(i64::MAX).value(), 100);
    }

    #[test]
    fn rating_bands() {
        assert_eq!(HealthScore::clamped(100).rating(), HealthRating::Excellent);
        assert_eq!(HealthScore::clamped(80).rating(), HealthRating::Excellent);
        assert_eq!(HealthScore::clamped(79).rating(), HealthRating::Good);
        assert_eq!(HealthScore::clamped(60).rating(), HealthRating::Good);
        assert_eq!(HealthScore::clamped(59).rating(), HealthRating::Fair);
        assert_eq!(HealthScore::clamped(40).rating(), HealthRating::Fair);
        assert_eq!(HealthScore::clamped(39).rating(), HealthRating::Poor);
        assert_eq!(HealthScore::clamped(0).rating(), HealthRating::Poor);
    }

    #[test]
    fn defaults_to_fifty() {
        assert_eq!(HealthScore::default().value(), 50);
    }
}
