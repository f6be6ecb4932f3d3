//! Rentora Backend Library
//!
//! This library exports the core modules for the Rentora backend server:
//! the property catalog, booking ledger, KPI aggregation, and the auth
//! layer gating all of them.

pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod handlers;
pub mod ledger;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
