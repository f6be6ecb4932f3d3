//! Cross-cutting services

pub mod kpi;

pub use kpi::KpiService;
