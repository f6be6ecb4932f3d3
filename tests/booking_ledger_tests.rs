//! Booking ledger tests
//!
//! Covers the lifecycle state machine, overlap prevention, derived pricing
//! and per-role authorization of status changes.

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use rentora_server::catalog::CatalogService;
use rentora_server::error::ApiError;
use rentora_server::ledger::LedgerService;
use rentora_server::models::{
    BookingStatus, CreateBookingRequest, CreatePropertyRequest, Principal, Role,
};
use rentora_server::store::Store;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

struct Fixture {
    ledger: LedgerService,
    catalog: CatalogService,
    owner: Principal,
    guest: Principal,
    property_id: Uuid,
}

/// Host with one 100/night property in Paris; clock pinned to 2024-01-01.
async fn setup() -> Fixture {
    let store = Arc::new(Store::with_fixed_today(date(2024, 1, 1)));
    let catalog = CatalogService::new(store.clone());
    let ledger = LedgerService::new(store);

    let owner = Principal::new(Uuid::new_v4(), Role::Host);
    let guest = Principal::new(Uuid::new_v4(), Role::Guest);

    let property = catalog
        .create(
            &owner,
            CreatePropertyRequest {
                title: "Loft".to_string(),
                description: String::new(),
                price: 100.0,
                location: "Paris".to_string(),
                amenities: vec![],
                image_url: None,
            },
        )
        .await
        .unwrap();

    Fixture {
        ledger,
        catalog,
        owner,
        guest,
        property_id: property.id,
    }
}

fn range(property_id: Uuid, start: NaiveDate, end: NaiveDate) -> CreateBookingRequest {
    CreateBookingRequest {
        property_id,
        start_date: start,
        end_date: end,
    }
}

// ============================================================================
// Creation
// ============================================================================

#[tokio::test]
async fn test_two_nights_at_100_costs_200_and_starts_pending() {
    let fx = setup().await;

    let booking = fx
        .ledger
        .create(
            &fx.guest,
            range(fx.property_id, date(2024, 1, 1), date(2024, 1, 3)),
        )
        .await
        .unwrap();

    assert_eq!(booking.total_price, 200.0);
    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.guest_id, fx.guest.id);
    assert_eq!(booking.nights(), 2);
}

#[tokio::test]
async fn test_overlapping_booking_conflicts() {
    let fx = setup().await;
    fx.ledger
        .create(
            &fx.guest,
            range(fx.property_id, date(2024, 1, 1), date(2024, 1, 3)),
        )
        .await
        .unwrap();

    let second_guest = Principal::new(Uuid::new_v4(), Role::Guest);
    let err = fx
        .ledger
        .create(
            &second_guest,
            range(fx.property_id, date(2024, 1, 2), date(2024, 1, 4)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));
}

#[tokio::test]
async fn test_back_to_back_bookings_allowed() {
    let fx = setup().await;
    fx.ledger
        .create(
            &fx.guest,
            range(fx.property_id, date(2024, 1, 1), date(2024, 1, 3)),
        )
        .await
        .unwrap();

    // Checkout day equals checkin day: no shared night
    fx.ledger
        .create(
            &fx.guest,
            range(fx.property_id, date(2024, 1, 3), date(2024, 1, 5)),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_cancelled_booking_frees_the_dates() {
    let fx = setup().await;
    let booking = fx
        .ledger
        .create(
            &fx.guest,
            range(fx.property_id, date(2024, 1, 1), date(2024, 1, 3)),
        )
        .await
        .unwrap();
    fx.ledger
        .set_status(&fx.guest, booking.id, BookingStatus::Cancelled)
        .await
        .unwrap();

    // Same dates are bookable again
    fx.ledger
        .create(
            &fx.guest,
            range(fx.property_id, date(2024, 1, 1), date(2024, 1, 3)),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_validation() {
    let fx = setup().await;

    // start >= end
    let err = fx
        .ledger
        .create(
            &fx.guest,
            range(fx.property_id, date(2024, 1, 3), date(2024, 1, 3)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::ValidationError(_)));

    // date in the past (clock pinned to 2024-01-01)
    let err = fx
        .ledger
        .create(
            &fx.guest,
            range(fx.property_id, date(2023, 12, 30), date(2024, 1, 2)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::ValidationError(_)));

    // unknown property
    let err = fx
        .ledger
        .create(
            &fx.guest,
            range(Uuid::new_v4(), date(2024, 1, 1), date(2024, 1, 3)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    // only guests book
    let err = fx
        .ledger
        .create(
            &fx.owner,
            range(fx.property_id, date(2024, 1, 1), date(2024, 1, 3)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));
}

// ============================================================================
// State machine
// ============================================================================

#[tokio::test]
async fn test_cancelled_is_terminal_for_all_targets() {
    let fx = setup().await;
    let admin = Principal::new(Uuid::new_v4(), Role::Admin);
    let booking = fx
        .ledger
        .create(
            &fx.guest,
            range(fx.property_id, date(2024, 1, 1), date(2024, 1, 3)),
        )
        .await
        .unwrap();
    fx.ledger
        .set_status(&admin, booking.id, BookingStatus::Cancelled)
        .await
        .unwrap();

    for target in [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Cancelled,
    ] {
        let err = fx
            .ledger
            .set_status(&admin, booking.id, target)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidTransition(_)));
    }
}

#[tokio::test]
async fn test_confirm_then_cancel() {
    let fx = setup().await;
    let booking = fx
        .ledger
        .create(
            &fx.guest,
            range(fx.property_id, date(2024, 1, 1), date(2024, 1, 3)),
        )
        .await
        .unwrap();

    let confirmed = fx
        .ledger
        .set_status(&fx.owner, booking.id, BookingStatus::Confirmed)
        .await
        .unwrap();
    assert_eq!(confirmed.status, BookingStatus::Confirmed);

    let cancelled = fx
        .ledger
        .set_status(&fx.guest, booking.id, BookingStatus::Cancelled)
        .await
        .unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);
}

#[tokio::test]
async fn test_unknown_booking_is_not_found() {
    let fx = setup().await;
    let err = fx
        .ledger
        .set_status(&fx.guest, Uuid::new_v4(), BookingStatus::Cancelled)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

// ============================================================================
// Authorization
// ============================================================================

#[tokio::test]
async fn test_guest_cannot_touch_another_guests_booking() {
    let fx = setup().await;
    let booking = fx
        .ledger
        .create(
            &fx.guest,
            range(fx.property_id, date(2024, 1, 1), date(2024, 1, 3)),
        )
        .await
        .unwrap();

    let intruder = Principal::new(Uuid::new_v4(), Role::Guest);
    let err = fx
        .ledger
        .set_status(&intruder, booking.id, BookingStatus::Cancelled)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));
}

#[tokio::test]
async fn test_guest_cannot_confirm_own_booking() {
    let fx = setup().await;
    let booking = fx
        .ledger
        .create(
            &fx.guest,
            range(fx.property_id, date(2024, 1, 1), date(2024, 1, 3)),
        )
        .await
        .unwrap();

    let err = fx
        .ledger
        .set_status(&fx.guest, booking.id, BookingStatus::Confirmed)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));
}

#[tokio::test]
async fn test_host_scoped_to_own_properties() {
    let fx = setup().await;
    let booking = fx
        .ledger
        .create(
            &fx.guest,
            range(fx.property_id, date(2024, 1, 1), date(2024, 1, 3)),
        )
        .await
        .unwrap();

    let other_host = Principal::new(Uuid::new_v4(), Role::Host);
    let err = fx
        .ledger
        .set_status(&other_host, booking.id, BookingStatus::Confirmed)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));

    // The owning host can confirm
    fx.ledger
        .set_status(&fx.owner, booking.id, BookingStatus::Confirmed)
        .await
        .unwrap();
}

// ============================================================================
// Listings
// ============================================================================

#[tokio::test]
async fn test_list_for_guest_scopes_to_caller() {
    let fx = setup().await;
    let other_guest = Principal::new(Uuid::new_v4(), Role::Guest);

    fx.ledger
        .create(
            &fx.guest,
            range(fx.property_id, date(2024, 1, 1), date(2024, 1, 3)),
        )
        .await
        .unwrap();
    fx.ledger
        .create(
            &other_guest,
            range(fx.property_id, date(2024, 2, 1), date(2024, 2, 3)),
        )
        .await
        .unwrap();

    let mine = fx.ledger.list_for_guest(&fx.guest).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].guest_id, fx.guest.id);
}

#[tokio::test]
async fn test_list_for_host_scopes_to_owned_properties() {
    let fx = setup().await;
    fx.ledger
        .create(
            &fx.guest,
            range(fx.property_id, date(2024, 1, 1), date(2024, 1, 3)),
        )
        .await
        .unwrap();

    let bookings = fx.ledger.list_for_host(&fx.owner).await.unwrap();
    assert_eq!(bookings.len(), 1);

    let other_host = Principal::new(Uuid::new_v4(), Role::Host);
    let none = fx.ledger.list_for_host(&other_host).await.unwrap();
    assert!(none.is_empty());
}
