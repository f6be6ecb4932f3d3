//! API handlers for the Rentora backend

pub mod auth;
pub mod booking;
pub mod dashboard;
pub mod property;
