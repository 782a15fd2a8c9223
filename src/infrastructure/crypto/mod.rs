//! Cryptographic primitives: bcrypt password digests and JWT bearer tokens.

pub mod jwt;
pub mod password;

pub use jwt::{JwtConfig, TokenClaims, TokenError, TokenService, TOKEN_LIFETIME_HOURS};
pub use password::{PasswordHasher, DEFAULT_BCRYPT_COST};
