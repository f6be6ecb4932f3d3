//! KPI aggregation over the catalog and ledger
//!
//! Read-only: a snapshot is derived from the full property and booking sets
//! in a single read-lock pass and never persisted.

use std::sync::Arc;

use chrono::{Duration, NaiveDate};

use crate::error::ApiError;
use crate::models::{Booking, BookingStatus, KpiSnapshot, Principal, Role};
use crate::store::Store;

/// Occupancy is measured over a trailing window of this many days.
const OCCUPANCY_WINDOW_DAYS: i64 = 365;

/// KPI aggregation service
pub struct KpiService {
    store: Arc<Store>,
}

impl KpiService {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Compute the dashboard snapshot. Admin only.
    ///
    /// - `total_bookings` counts all bookings regardless of status.
    /// - `occupancy_rate` is confirmed booked-nights within the trailing
    ///   365-day window divided by the window length, averaged across all
    ///   properties, as a percentage in [0, 100]. Zero when no properties
    ///   exist.
    /// - `total_revenue` sums `total_price` over confirmed bookings only.
    pub async fn compute_snapshot(&self, principal: &Principal) -> Result<KpiSnapshot, ApiError> {
        if principal.role != Role::Admin {
            return Err(ApiError::Unauthorized(
                "KPI dashboard is admin only".to_string(),
            ));
        }

        let window_end = self.store.today();
        let window_start = window_end - Duration::days(OCCUPANCY_WINDOW_DAYS);

        let tables = self.store.read().await;

        let total_bookings = tables.bookings.len() as u64;

        let total_revenue: f64 = tables
            .bookings
            .values()
            .filter(|b| b.status == BookingStatus::Confirmed)
            .map(|b| b.total_price)
            .sum();

        let occupancy_rate = if tables.properties.is_empty() {
            0.0
        } else {
            let per_property_sum: f64 = tables
                .properties
                .keys()
                .map(|property_id| {
                    let booked: i64 = tables
                        .bookings_for_property(*property_id)
                        .filter(|b| b.status == BookingStatus::Confirmed)
                        .map(|b| nights_within(b, window_start, window_end))
                        .sum();
                    (booked as f64 / OCCUPANCY_WINDOW_DAYS as f64).clamp(0.0, 1.0)
                })
                .sum();
            per_property_sum / tables.properties.len() as f64 * 100.0
        };

        Ok(KpiSnapshot {
            total_bookings,
            occupancy_rate,
            total_revenue,
        })
    }
}

/// Nights of a booking falling inside `[window_start, window_end)`
fn nights_within(booking: &Booking, window_start: NaiveDate, window_end: NaiveDate) -> i64 {
    let start = booking.start_date.max(window_start);
    let end = booking.end_date.min(window_end);
    (end - start).num_days().max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn booking(start: NaiveDate, end: NaiveDate) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            property_id: Uuid::new_v4(),
            guest_id: Uuid::new_v4(),
            start_date: start,
            end_date: end,
            total_price: 0.0,
            status: BookingStatus::Confirmed,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_nights_within_window() {
        let window_start = d(2024, 1, 1);
        let window_end = d(2025, 1, 1);

        // fully inside
        let b = booking(d(2024, 6, 1), d(2024, 6, 8));
        assert_eq!(nights_within(&b, window_start, window_end), 7);

        // straddles the window start
        let b = booking(d(2023, 12, 30), d(2024, 1, 3));
        assert_eq!(nights_within(&b, window_start, window_end), 2);

        // entirely before the window
        let b = booking(d(2023, 5, 1), d(2023, 5, 3));
        assert_eq!(nights_within(&b, window_start, window_end), 0);

        // entirely after the window
        let b = booking(d(2025, 2, 1), d(2025, 2, 3));
        assert_eq!(nights_within(&b, window_start, window_end), 0);
    }
}
