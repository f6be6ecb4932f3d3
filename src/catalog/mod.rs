//! Property catalog
//!
//! Owns property records, ownership-scoped mutation and the search/filter
//! query engine. Every operation takes the caller's `Principal`; ownership
//! rules are: created by a host, mutated or deleted only by its owner or an
//! admin.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;
use crate::models::{
    BookingStatus, CreatePropertyRequest, Principal, Property, PropertyFilter, Role,
    UpdatePropertyRequest,
};
use crate::store::Store;

/// Property catalog service
pub struct CatalogService {
    store: Arc<Store>,
}

impl CatalogService {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Create a listing owned by the calling host.
    pub async fn create(
        &self,
        principal: &Principal,
        req: CreatePropertyRequest,
    ) -> Result<Property, ApiError> {
        principal.require_role(&[Role::Host])?;
        req.validate()?;
        validate_non_empty("title", &req.title)?;
        validate_non_empty("location", &req.location)?;
        validate_price(req.price)?;
        let amenities = normalize_amenities(req.amenities)?;

        let now = Utc::now();
        let property = Property {
            id: Uuid::new_v4(),
            owner_id: principal.id,
            title: req.title.trim().to_string(),
            description: req.description.trim().to_string(),
            price: req.price,
            location: req.location.trim().to_string(),
            amenities,
            image_url: normalize_image_url(req.image_url),
            created_at: now,
            updated_at: now,
        };

        let mut tables = self.store.write().await;
        tables.properties.insert(property.id, property.clone());
        tracing::info!(property_id = %property.id, owner_id = %property.owner_id, "Property created");
        Ok(property)
    }

    /// Apply a partial patch; unset fields retain their prior value.
    pub async fn update(
        &self,
        principal: &Principal,
        id: Uuid,
        patch: UpdatePropertyRequest,
    ) -> Result<Property, ApiError> {
        // An empty patch is a no-op; it must not touch the record.
        if patch.is_empty() {
            let tables = self.store.read().await;
            let property = tables
                .properties
                .get(&id)
                .ok_or_else(|| ApiError::NotFound(format!("property {}", id)))?;
            check_ownership(principal, property.owner_id)?;
            return Ok(property.clone());
        }

        // Validate supplied fields before taking the write lock
        if let Some(price) = patch.price {
            validate_price(price)?;
        }
        if let Some(title) = &patch.title {
            validate_non_empty("title", title)?;
        }
        if let Some(location) = &patch.location {
            validate_non_empty("location", location)?;
        }
        let amenities = match patch.amenities {
            Some(tags) => Some(normalize_amenities(tags)?),
            None => None,
        };

        let mut tables = self.store.write().await;
        let property = tables
            .properties
            .get_mut(&id)
            .ok_or_else(|| ApiError::NotFound(format!("property {}", id)))?;
        check_ownership(principal, property.owner_id)?;

        if let Some(title) = patch.title {
            property.title = title.trim().to_string();
        }
        if let Some(description) = patch.description {
            property.description = description.trim().to_string();
        }
        if let Some(price) = patch.price {
            property.price = price;
        }
        if let Some(location) = patch.location {
            property.location = location.trim().to_string();
        }
        if let Some(amenities) = amenities {
            property.amenities = amenities;
        }
        if let Some(image_url) = patch.image_url {
            property.image_url = normalize_image_url(Some(image_url));
        }
        property.updated_at = Utc::now();

        Ok(property.clone())
    }

    /// Delete a listing.
    ///
    /// Rejected with `Conflict` while any pending or confirmed booking still
    /// references the property; callers must cancel those first.
    pub async fn delete(&self, principal: &Principal, id: Uuid) -> Result<(), ApiError> {
        let mut tables = self.store.write().await;
        let property = tables
            .properties
            .get(&id)
            .ok_or_else(|| ApiError::NotFound(format!("property {}", id)))?;
        check_ownership(principal, property.owner_id)?;

        let active = tables
            .bookings_for_property(id)
            .filter(|b| b.status != BookingStatus::Cancelled)
            .count();
        if active > 0 {
            return Err(ApiError::Conflict(format!(
                "property has {} active booking(s); cancel them before deleting",
                active
            )));
        }

        tables.properties.remove(&id);
        tracing::info!(property_id = %id, "Property deleted");
        Ok(())
    }

    /// Multi-predicate search over all listings.
    ///
    /// All supplied filters are conjunctive; results are ordered by creation
    /// time (then id) so a fixed input yields a stable sequence.
    pub async fn search(&self, filter: &PropertyFilter) -> Result<Vec<Property>, ApiError> {
        let wanted_amenities = filter.amenity_set();
        let wanted_location = filter.location.as_deref().map(str::to_lowercase);

        let tables = self.store.read().await;
        let mut results: Vec<Property> = tables
            .properties
            .values()
            .filter(|p| filter.min_price.map_or(true, |min| p.price >= min))
            .filter(|p| filter.max_price.map_or(true, |max| p.price <= max))
            .filter(|p| {
                wanted_location
                    .as_deref()
                    .map_or(true, |loc| p.location.to_lowercase().contains(loc))
            })
            .filter(|p| {
                wanted_amenities.is_empty() || wanted_amenities.is_subset(&p.amenities)
            })
            .cloned()
            .collect();

        results.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        Ok(results)
    }

    /// Listings owned by the calling host
    pub async fn list_by_owner(&self, principal: &Principal) -> Result<Vec<Property>, ApiError> {
        principal.require_role(&[Role::Host])?;

        let tables = self.store.read().await;
        let mut results: Vec<Property> = tables
            .properties
            .values()
            .filter(|p| p.owner_id == principal.id)
            .cloned()
            .collect();
        results.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        Ok(results)
    }

    /// Fetch a single listing
    pub async fn get(&self, id: Uuid) -> Result<Property, ApiError> {
        let tables = self.store.read().await;
        tables
            .properties
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("property {}", id)))
    }
}

/// Owner-or-admin check shared by update and delete
fn check_ownership(principal: &Principal, owner_id: Uuid) -> Result<(), ApiError> {
    if principal.id == owner_id || principal.role == Role::Admin {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "only the owner or an admin may modify this property".to_string(),
        ))
    }
}

fn validate_price(price: f64) -> Result<(), ApiError> {
    if price.is_finite() && price > 0.0 {
        Ok(())
    } else {
        Err(ApiError::ValidationError(
            "price must be greater than zero".to_string(),
        ))
    }
}

fn validate_non_empty(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::ValidationError(format!(
            "{} must not be empty",
            field
        )));
    }
    Ok(())
}

/// Trim amenity tags; an empty tag after trimming is a validation error.
fn normalize_amenities(tags: Vec<String>) -> Result<BTreeSet<String>, ApiError> {
    let mut set = BTreeSet::new();
    for tag in tags {
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            return Err(ApiError::ValidationError(
                "amenities must not contain empty tags".to_string(),
            ));
        }
        set.insert(trimmed.to_string());
    }
    Ok(set)
}

fn normalize_image_url(url: Option<String>) -> Option<String> {
    url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty())
}
