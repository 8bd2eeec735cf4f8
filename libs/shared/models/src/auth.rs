use serde::{Deserialize, Serialize};

/// Claim set carried by every issued token. `admin` rides along so the
/// authorization guard never needs a user lookup.
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    #[serde(default)]
    pub admin: bool,
    pub iat: Option<u64>,
    pub exp: Option<u64>,
}

/// Authenticated request context, reconstructed from a verified token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    pub username: String,
    pub admin: bool,
}

/// Raw bearer token as presented, kept in request extensions so logout
/// can revoke exactly the string the client sent.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);
