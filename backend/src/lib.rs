//! Authentication backend for the apiprofile HTTP service.
//!
//! Accounts register with an email and password, log in for a short-lived
//! access token plus a single-use refresh token, and present the access token
//! as a bearer credential on protected routes.

pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod errors;
pub mod repositories;
pub mod services;
pub mod utils;
