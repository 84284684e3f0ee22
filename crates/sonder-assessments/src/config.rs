use jiff::SignedDuration;

use crate::error::AssessmentError;

/// Engine tunables. Resolved once at startup and passed in.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// TTL applied when an issue request names none.
    pub default_link_ttl_days: i64,
    pub max_link_ttl_days: i64,
    /// Idle time after which an in-person session is abandoned on access.
    pub inactivity_threshold: SignedDuration,
    /// Bound on read-modify-write retries after a lost conditional write.
    pub max_write_attempts: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_link_ttl_days: 7,
            max_link_ttl_days: 30,
            inactivity_threshold: SignedDuration::from_hours(24),
            max_write_attempts: 5,
        }
    }
}

impl EngineConfig {
    /// Upper bound on any link TTL. Keeps deadline arithmetic in range.
    pub const LINK_TTL_CEILING_DAYS: i64 = 365;
    /// Upper bound on the inactivity threshold.
    pub const INACTIVITY_CEILING_HOURS: i64 = 24 * 365;

    pub fn validate(&self) -> Result<(), AssessmentError> {
        if !(1..=Self::LINK_TTL_CEILING_DAYS).contains(&self.max_link_ttl_days) {
            return Err(AssessmentError::Config(format!(
                "max link ttl {} is outside 1..={} days",
                self.max_link_ttl_days,
                Self::LINK_TTL_CEILING_DAYS
            )));
        }
        if !(1..=self.max_link_ttl_days).contains(&self.default_link_ttl_days) {
            return Err(AssessmentError::Config(format!(
                "default link ttl {} is outside 1..={}",
                self.default_link_ttl_days, self.max_link_ttl_days
            )));
        }
        if !self.inactivity_threshold.is_positive() {
            return Err(AssessmentError::Config(
                "inactivity threshold must be positive".to_string(),
            ));
        }
        if self.inactivity_threshold > SignedDuration::from_hours(Self::INACTIVITY_CEILING_HOURS) {
            return Err(AssessmentError::Config(format!(
                "inactivity threshold exceeds {} hours",
                Self::INACTIVITY_CEILING_HOURS
            )));
        }
        if self.max_write_attempts == 0 {
            return Err(AssessmentError::Config(
                "max write attempts must be at least one".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve a requested TTL against the configured default and ceiling.
    pub fn link_ttl_days(&self, requested: Option<i64>) -> Result<i64, AssessmentError> {
        let ttl_days = requested.unwrap_or(self.default_link_ttl_days);
        if !(1..=self.max_link_ttl_days).contains(&ttl_days) {
            return Err(AssessmentError::InvalidTtl {
                ttl_days,
                max_days: self.max_link_ttl_days,
            });
        }
        Ok(ttl_days)
    }
}
