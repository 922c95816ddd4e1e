//! Module for business logic services outside the authentication core.
//!
//! The authentication flows live in `auth::service`; this module holds the
//! user-management operations exposed on the protected `/users` routes.

pub mod user_service;
