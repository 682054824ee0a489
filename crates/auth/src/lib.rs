//! `pickpoint-auth` — identity and authorization boundary.
//!
//! Role model, the role→operation capability matrix, JWT claims/codec,
//! password hashing, and the account service. Decoupled from HTTP and from
//! any concrete storage engine.

pub mod account;
pub mod authorize;
pub mod claims;
pub mod jwt;
pub mod memory;
pub mod password;
pub mod roles;

pub use account::{AccountError, AccountService, InsertOutcome, User, UserStore};
pub use authorize::{AuthzError, Operation, allowed, authorize};
pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use jwt::{JwtCodec, TokenError};
pub use roles::Role;
