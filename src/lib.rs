//! Session tokens for the EyesOn backend.
//!
//! Mints HS512-signed access/refresh token pairs, verifies presented tokens
//! with a typed failure kind, and rebuilds the authenticated principal from
//! an `Authorization: Bearer` header.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod repos;
pub mod services;
pub mod state;
