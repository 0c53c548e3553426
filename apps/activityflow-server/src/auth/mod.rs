pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, JwtKeys, Subject, TokenKind, TokenPair};
pub use middleware::{AuthUser, require_auth};
