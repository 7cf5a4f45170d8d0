//! Link health monitor
//!
//! Counts consecutive inbound faults (timeouts, transport errors, garbled
//! frames). A good frame clears the count; reaching the limit marks the
//! link as lost.

/// Link health
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkStatus {
    /// Last exchange succeeded
    Healthy,
    /// Some consecutive faults, still below the limit
    Degraded(u8),
    /// Fault limit reached
    Lost,
}

/// Consecutive fault counter
#[derive(Debug, Clone)]
pub struct LinkMonitor {
    /// Faults since the last good frame
    consecutive_faults: u8,
    /// Faults tolerated before the link is lost
    max_faults: u8,
}

impl LinkMonitor {
    /// Create a monitor that reports `Lost` after `max_faults` faults in a row
    pub fn new(max_faults: u8) -> Self {
        Self {
            consecutive_faults: 0,
            max_faults: max_faults.max(1),
        }
    }

    /// Record a good frame
    pub fn record_frame(&mut self) {
        self.consecutive_faults = 0;
    }

    /// Record a fault and return the resulting status
    pub fn record_fault(&mut self) -> LinkStatus {
        self.consecutive_faults = self.consecutive_faults.saturating_add(1);
        self.status()
    }

    /// Current status
    pub fn status(&self) -> LinkStatus {
        match self.consecutive_faults {
            0 => LinkStatus::Healthy,
            n if n >= self.max_faults => LinkStatus::Lost,
            n => LinkStatus::Degraded(n),
        }
    }

    /// Faults since the last good frame
    pub fn consecutive_faults(&self) -> u8 {
        self.consecutive_faults
    }

    /// Check if the link counts as lost
    pub fn is_lost(&self) -> bool {
        self.status() == LinkStatus::Lost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_healthy() {
        let monitor = LinkMonitor::new(5);
        assert_eq!(monitor.status(), LinkStatus::Healthy);
        assert!(!monitor.is_lost());
    }

    #[test]
    fn test_lost_at_limit() {
        let mut monitor = LinkMonitor::new(3);
        assert_eq!(monitor.record_fault(), LinkStatus::Degraded(1));
        assert_eq!(monitor.record_fault(), LinkStatus::Degraded(2));
        assert_eq!(monitor.record_fault(), LinkStatus::Lost);
        assert!(monitor.is_lost());
    }

    #[test]
    fn test_frame_clears_faults() {
        let mut monitor = LinkMonitor::new(3);
        monitor.record_fault();
        monitor.record_fault();
        monitor.record_frame();
        assert_eq!(monitor.consecutive_faults(), 0);
        assert_eq!(monitor.record_fault(), LinkStatus::Degraded(1));
    }

    #[test]
    fn test_zero_limit_means_one() {
        let mut monitor = LinkMonitor::new(0);
        assert_eq!(monitor.record_fault(), LinkStatus::Lost);
    }
}
