//! Small cryptographic helpers shared by the authentication core.
//!
//! Access-token signing lives in `jwt`, password hashing in `password`, and
//! refresh-token generation in `refresh_token`.

pub mod jwt;
pub mod password;
pub mod refresh_token;
