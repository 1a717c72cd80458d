//! Foodgram Backend Library
//!
//! Recipe sharing REST API: users and subscriptions, a tag and ingredient
//! catalog, recipes with favorites and a shopping cart. This library
//! exposes the backend modules for the server binary, the CSV import tool
//! and the integration tests.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod fixtures;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;
