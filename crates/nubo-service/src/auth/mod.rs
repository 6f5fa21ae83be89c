//! Authentication: password hashing, access tokens, and the login flow.

pub mod hasher;
pub mod jwt;
pub mod service;

pub use hasher::PasswordHasher;
pub use jwt::{AccessClaims, JwtCodec};
pub use service::{AuthResponse, AuthService};
