use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use tracing::debug;

use shared_models::auth::{AuthContext, JwtClaims};
use shared_models::error::AuthError;

type HmacSha256 = Hmac<Sha256>;

fn sign(signing_input: &str, secret: &str) -> Result<Vec<u8>, AuthError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| AuthError::TokenInvalid)?;
    mac.update(signing_input.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Mint an HS256 token carrying the subject and admin claim. Expiry is
/// issue time plus the configured TTL; there is no refresh path, a new
/// login is required once it lapses.
pub fn issue_token(
    username: &str,
    admin: bool,
    secret: &str,
    ttl_minutes: i64,
) -> Result<String, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::TokenInvalid);
    }

    let now = Utc::now();
    let exp = now + Duration::minutes(ttl_minutes);

    let header = json!({
        "alg": "HS256",
        "typ": "JWT"
    });
    let claims = json!({
        "sub": username,
        "admin": admin,
        "iat": now.timestamp(),
        "exp": exp.timestamp()
    });

    let header_b64 = URL_SAFE_NO_PAD.encode(header.to_string());
    let claims_b64 = URL_SAFE_NO_PAD.encode(claims.to_string());
    let signing_input = format!("{}.{}", header_b64, claims_b64);
    let signature = sign(&signing_input, secret)?;

    Ok(format!(
        "{}.{}",
        signing_input,
        URL_SAFE_NO_PAD.encode(signature)
    ))
}

/// Verify signature and expiry, in that order. `TokenExpired` is only
/// reported for a token whose signature checked out.
pub fn validate_token(token: &str, secret: &str) -> Result<AuthContext, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::TokenInvalid);
    }

    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(AuthError::TokenInvalid);
    }

    let header_b64 = parts[0];
    let claims_b64 = parts[1];
    let signature_b64 = parts[2];

    let signature = match URL_SAFE_NO_PAD.decode(signature_b64) {
        Ok(sig) => sig,
        Err(e) => {
            debug!("Failed to decode signature: {}", e);
            return Err(AuthError::TokenInvalid);
        }
    };

    let signing_input = format!("{}.{}", header_b64, claims_b64);

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| AuthError::TokenInvalid)?;
    mac.update(signing_input.as_bytes());

    if mac.verify_slice(&signature).is_err() {
        debug!("Token signature verification failed");
        return Err(AuthError::TokenInvalid);
    }

    let claims_json = URL_SAFE_NO_PAD
        .decode(claims_b64)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .ok_or(AuthError::TokenInvalid)?;

    let claims: JwtClaims = match serde_json::from_str(&claims_json) {
        Ok(c) => c,
        Err(e) => {
            debug!("Failed to parse claims: {}", e);
            return Err(AuthError::TokenInvalid);
        }
    };

    if let Some(exp) = claims.exp {
        let now = Utc::now().timestamp();
        if (exp as i64) <= now {
            debug!("Token expired at {} (now: {})", exp, now);
            return Err(AuthError::TokenExpired);
        }
    }

    debug!("Token validated successfully for user: {}", claims.sub);
    Ok(AuthContext {
        username: claims.sub,
        admin: claims.admin,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-for-jwt-validation-must-be-long-enough";

    #[test]
    fn issue_then_validate_round_trip() {
        let token = issue_token("paul", true, SECRET, 45).unwrap();
        let context = validate_token(&token, SECRET).unwrap();
        assert_eq!(context.username, "paul");
        assert!(context.admin);
    }

    #[test]
    fn non_admin_claim_preserved() {
        let token = issue_token("bob", false, SECRET, 45).unwrap();
        let context = validate_token(&token, SECRET).unwrap();
        assert!(!context.admin);
    }

    #[test]
    fn expired_token_rejected() {
        let token = issue_token("paul", false, SECRET, -1).unwrap();
        assert_eq!(
            validate_token(&token, SECRET).unwrap_err(),
            AuthError::TokenExpired
        );
    }

    #[test]
    fn wrong_secret_is_invalid_not_expired() {
        let token = issue_token("paul", false, "other-secret", -1).unwrap();
        assert_eq!(
            validate_token(&token, SECRET).unwrap_err(),
            AuthError::TokenInvalid
        );
    }

    #[test]
    fn malformed_token_rejected() {
        assert_eq!(
            validate_token("invalid.token.format", SECRET).unwrap_err(),
            AuthError::TokenInvalid
        );
        assert_eq!(
            validate_token("not-even-a-jwt", SECRET).unwrap_err(),
            AuthError::TokenInvalid
        );
    }

    #[test]
    fn empty_secret_never_validates() {
        let token = issue_token("paul", false, SECRET, 45).unwrap();
        assert_eq!(
            validate_token(&token, "").unwrap_err(),
            AuthError::TokenInvalid
        );
    }
}
