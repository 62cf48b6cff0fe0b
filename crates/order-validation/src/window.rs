use {crate::ValidationError, alloy::primitives::U256};

/// Interval during which an authorization may be used. Both bounds are
/// inclusive.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TimeWindow {
    pub start: U256,
    pub end: U256,
}

impl TimeWindow {
    pub fn check(&self, now: U256) -> Result<(), ValidationError> {
        if now < self.start {
            return Err(ValidationError::BeforeStartTime);
        }
        if now > self.end {
            return Err(ValidationError::WindowExpired);
        }
        Ok(())
    }
}
