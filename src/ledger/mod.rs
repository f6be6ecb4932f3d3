//! Booking ledger
//!
//! Owns booking records and their lifecycle state machine. Bookings are
//! never deleted; cancellation is a terminal state. Creation validates the
//! date range and runs the availability check and the insert under a single
//! write lock, so two overlapping concurrent creates cannot both succeed.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{Booking, BookingStatus, CreateBookingRequest, Principal, Role};
use crate::store::Store;

/// Booking ledger service
pub struct LedgerService {
    store: Arc<Store>,
}

impl LedgerService {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Book a property for `[start_date, end_date)`.
    ///
    /// The total price is derived from the property's nightly price at
    /// creation time and never changes afterwards.
    pub async fn create(
        &self,
        principal: &Principal,
        req: CreateBookingRequest,
    ) -> Result<Booking, ApiError> {
        principal.require_role(&[Role::Guest])?;

        if req.start_date >= req.end_date {
            return Err(ApiError::ValidationError(
                "startDate must be before endDate".to_string(),
            ));
        }
        let today = self.store.today();
        if req.start_date < today || req.end_date < today {
            return Err(ApiError::ValidationError(
                "booking dates must not be in the past".to_string(),
            ));
        }

        // Availability check and insert form one critical section.
        let mut tables = self.store.write().await;
        let property = tables
            .properties
            .get(&req.property_id)
            .ok_or_else(|| ApiError::NotFound(format!("property {}", req.property_id)))?;

        let taken = tables
            .bookings_for_property(req.property_id)
            .filter(|b| b.status != BookingStatus::Cancelled)
            .any(|b| ranges_overlap(req.start_date, req.end_date, b.start_date, b.end_date));
        if taken {
            return Err(ApiError::Conflict(
                "requested dates overlap an existing booking".to_string(),
            ));
        }

        let nights = (req.end_date - req.start_date).num_days();
        let now = Utc::now();
        let booking = Booking {
            id: Uuid::new_v4(),
            property_id: req.property_id,
            guest_id: principal.id,
            start_date: req.start_date,
            end_date: req.end_date,
            total_price: property.price * nights as f64,
            status: BookingStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        tables.bookings.insert(booking.id, booking.clone());

        tracing::info!(
            booking_id = %booking.id,
            property_id = %booking.property_id,
            nights,
            "Booking created"
        );
        Ok(booking)
    }

    /// Drive the booking state machine.
    ///
    /// Authorization: a guest may only cancel their own booking; a host may
    /// act on bookings for properties they own; an admin may act on any
    /// booking. Conflicting transitions on the same booking serialize on the
    /// store's write lock.
    pub async fn set_status(
        &self,
        principal: &Principal,
        id: Uuid,
        new_status: BookingStatus,
    ) -> Result<Booking, ApiError> {
        let mut tables = self.store.write().await;

        let (guest_id, property_id, from) = {
            let booking = tables
                .bookings
                .get(&id)
                .ok_or_else(|| ApiError::NotFound(format!("booking {}", id)))?;
            (booking.guest_id, booking.property_id, booking.status)
        };

        match principal.role {
            Role::Admin => {}
            Role::Guest => {
                if guest_id != principal.id {
                    return Err(ApiError::Forbidden(
                        "guests may only modify their own bookings".to_string(),
                    ));
                }
                if new_status != BookingStatus::Cancelled {
                    return Err(ApiError::Forbidden(
                        "guests may only cancel bookings".to_string(),
                    ));
                }
            }
            Role::Host => {
                let owns = tables
                    .properties
                    .get(&property_id)
                    .map_or(false, |p| p.owner_id == principal.id);
                if !owns {
                    return Err(ApiError::Forbidden(
                        "hosts may only act on bookings for their own properties".to_string(),
                    ));
                }
            }
        }

        if !from.can_transition_to(new_status) {
            return Err(ApiError::InvalidTransition(format!(
                "{} -> {}",
                from.as_str(),
                new_status.as_str()
            )));
        }

        let booking = tables
            .bookings
            .get_mut(&id)
            .ok_or_else(|| ApiError::NotFound(format!("booking {}", id)))?;
        booking.status = new_status;
        booking.updated_at = Utc::now();
        let updated = booking.clone();

        tracing::info!(
            booking_id = %id,
            from = %from.as_str(),
            to = %new_status.as_str(),
            "Booking status changed"
        );
        Ok(updated)
    }

    /// The calling guest's bookings
    pub async fn list_for_guest(&self, principal: &Principal) -> Result<Vec<Booking>, ApiError> {
        principal.require_role(&[Role::Guest])?;

        let tables = self.store.read().await;
        let mut results: Vec<Booking> = tables
            .bookings
            .values()
            .filter(|b| b.guest_id == principal.id)
            .cloned()
            .collect();
        results.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        Ok(results)
    }

    /// Bookings on properties owned by the calling host
    pub async fn list_for_host(&self, principal: &Principal) -> Result<Vec<Booking>, ApiError> {
        principal.require_role(&[Role::Host])?;

        let tables = self.store.read().await;
        let mut results: Vec<Booking> = tables
            .bookings
            .values()
            .filter(|b| {
                tables
                    .properties
                    .get(&b.property_id)
                    .map_or(false, |p| p.owner_id == principal.id)
            })
            .cloned()
            .collect();
        results.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        Ok(results)
    }
}

/// Half-open interval overlap: `[a_start, a_end)` intersects `[b_start, b_end)`
fn ranges_overlap(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start < b_end && b_start < a_end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_ranges_overlap() {
        // shared night
        assert!(ranges_overlap(
            d(2024, 1, 1),
            d(2024, 1, 3),
            d(2024, 1, 2),
            d(2024, 1, 4)
        ));
        // containment
        assert!(ranges_overlap(
            d(2024, 1, 1),
            d(2024, 1, 10),
            d(2024, 1, 4),
            d(2024, 1, 5)
        ));
        // identical range
        assert!(ranges_overlap(
            d(2024, 1, 1),
            d(2024, 1, 3),
            d(2024, 1, 1),
            d(2024, 1, 3)
        ));
        // back-to-back: checkout day equals checkin day, no shared night
        assert!(!ranges_overlap(
            d(2024, 1, 1),
            d(2024, 1, 3),
            d(2024, 1, 3),
            d(2024, 1, 5)
        ));
        // disjoint
        assert!(!ranges_overlap(
            d(2024, 1, 1),
            d(2024, 1, 3),
            d(2024, 2, 1),
            d(2024, 2, 3)
        ));
    }
}
