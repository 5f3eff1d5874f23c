/// Authentication
///
/// - [`password`]: Argon2id hashing and the registration password rules
/// - [`jwt`]: HS256 access and refresh tokens
/// - [`middleware`]: bearer-token middleware and the per-request [`middleware::AuthContext`]

pub mod jwt;
pub mod middleware;
pub mod password;
