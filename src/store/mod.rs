//! In-process store for users, properties and bookings
//!
//! A single `RwLock` guards all three tables. Mutating operations take the
//! write lock for their whole check-then-write sequence, which is what makes
//! booking creation (overlap check + insert) and status transitions atomic:
//! two conflicting writers serialize on the lock, and the second sees the
//! first's committed state. No await point is held inside a critical section.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use crate::models::{Booking, Property, User};

/// Entity tables
#[derive(Debug, Default)]
pub struct Tables {
    pub users: HashMap<Uuid, User>,
    pub properties: HashMap<Uuid, Property>,
    pub bookings: HashMap<Uuid, Booking>,
}

/// Shared application store
#[derive(Debug)]
pub struct Store {
    tables: RwLock<Tables>,
    /// Fixed "today" for deterministic tests; `None` means the UTC wall clock.
    today_override: Option<NaiveDate>,
}

impl Store {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            today_override: None,
        }
    }

    /// Store with a pinned current date, for deterministic date validation
    /// and occupancy windows in tests.
    pub fn with_fixed_today(today: NaiveDate) -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            today_override: Some(today),
        }
    }

    /// Current date used for "date in the past" checks and KPI windows
    pub fn today(&self) -> NaiveDate {
        self.today_override
            .unwrap_or_else(|| Utc::now().date_naive())
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().await
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Tables {
    /// Look up a user by email (stored lowercased)
    pub fn user_by_email(&self, email: &str) -> Option<&User> {
        let email = email.to_lowercase();
        self.users.values().find(|u| u.email == email)
    }

    /// Bookings referencing a property
    pub fn bookings_for_property(&self, property_id: Uuid) -> impl Iterator<Item = &Booking> {
        self.bookings
            .values()
            .filter(move |b| b.property_id == property_id)
    }
}
