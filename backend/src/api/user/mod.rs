//! User management endpoints, all behind the access guard.

pub mod handlers;
pub mod routes;
