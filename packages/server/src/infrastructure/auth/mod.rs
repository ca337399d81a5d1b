//! Connection authentication.

mod token;

pub use token::{TokenClaims, TokenError, TokenVerifier};
