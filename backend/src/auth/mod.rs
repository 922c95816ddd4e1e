//! Authentication module for managing accounts, sessions, and access control.
//!
//! This module provides the public interface for registration, login, token
//! refresh and logout, plus the middleware that guards protected routes.

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod service;

pub use middleware::{authorize, jwt_auth};
pub use service::AuthService;
