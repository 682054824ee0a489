//! Validated paging/filter parameters for the history listing.

use chrono::{DateTime, Utc};

use pickpoint_core::{DomainError, DomainResult};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

/// Window and page for the pickup-point history listing.
///
/// Pages are 1-based and count pickup points, not flat rows. The date window
/// applies to reception open timestamps, inclusive on both ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryFilter {
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
    page: u32,
    limit: u32,
}

impl HistoryFilter {
    pub fn new(
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
        page: u32,
        limit: u32,
    ) -> DomainResult<Self> {
        if page < 1 {
            return Err(DomainError::validation("page must be at least 1"));
        }
        if limit < 1 || limit > MAX_LIMIT {
            return Err(DomainError::validation("limit must be between 1 and 100"));
        }
        if let (Some(start), Some(end)) = (start_date, end_date) {
            if start > end {
                return Err(DomainError::validation("startDate must not be after endDate"));
            }
        }
        Ok(Self { start_date, end_date, page, limit })
    }

    pub fn unbounded(page: u32, limit: u32) -> DomainResult<Self> {
        Self::new(None, None, page, limit)
    }

    pub fn start_date(&self) -> Option<DateTime<Utc>> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<DateTime<Utc>> {
        self.end_date
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of pickup points to skip before the requested page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    /// Whether a reception opened at `at` falls inside the window.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        if let Some(start) = self.start_date {
            if at < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if at > end {
                return false;
            }
        }
        true
    }
}

impl Default for HistoryFilter {
    fn default() -> Self {
        Self {
            start_date: None,
            end_date: None,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn rejects_out_of_range_paging() {
        assert!(HistoryFilter::unbounded(0, 10).is_err());
        assert!(HistoryFilter::unbounded(1, 0).is_err());
        assert!(HistoryFilter::unbounded(1, 101).is_err());
        assert!(HistoryFilter::unbounded(1, 100).is_ok());
    }

    #[test]
    fn rejects_inverted_window() {
        let start = Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        assert!(HistoryFilter::new(Some(start), Some(end), 1, 10).is_err());
        assert!(HistoryFilter::new(Some(end), Some(start), 1, 10).is_ok());
    }

    #[test]
    fn window_is_inclusive() {
        let start = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 6, 30, 0, 0, 0).unwrap();
        let filter = HistoryFilter::new(Some(start), Some(end), 1, 10).unwrap();

        assert!(filter.contains(start));
        assert!(filter.contains(end));
        assert!(!filter.contains(start - chrono::Duration::seconds(1)));
        assert!(!filter.contains(end + chrono::Duration::seconds(1)));
    }

    #[test]
    fn offset_counts_pickup_points() {
        let filter = HistoryFilter::unbounded(3, 10).unwrap();
        assert_eq!(filter.offset(), 20);
    }
}
