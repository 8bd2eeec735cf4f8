use shared_config::AppConfig;

use crate::jwt::issue_token;

pub struct TestConfig {
    pub jwt_secret: String,
    pub mongo_uri: String,
    pub mongo_db: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            mongo_uri: "mongodb://localhost:27017".to_string(),
            mongo_db: "gp_portal_test".to_string(),
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            mongo_uri: self.mongo_uri.clone(),
            mongo_db: self.mongo_db.clone(),
            jwt_secret: self.jwt_secret.clone(),
            token_ttl_minutes: 45,
            list_rate_limit_per_minute: 30,
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub const SECRET: &'static str = "test-secret-key-for-jwt-validation-must-be-long-enough";

    pub fn create_test_token(username: &str, admin: bool) -> String {
        issue_token(username, admin, Self::SECRET, 45).expect("token issuance")
    }

    pub fn create_expired_token(username: &str, admin: bool) -> String {
        issue_token(username, admin, Self::SECRET, -1).expect("token issuance")
    }

    pub fn create_invalid_signature_token(username: &str) -> String {
        issue_token(username, false, "wrong-secret", 45).expect("token issuance")
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}
