use std::sync::Arc;

use anyhow::Result;
use mongodb::bson::doc;
use mongodb::Collection;
use tracing::{debug, warn};

use shared_database::mongo::USERS_COLLECTION;
use shared_database::{AppState, TokenLedger};
use shared_models::error::{AppError, AuthError};
use shared_utils::jwt::issue_token;

use crate::models::{LoginRequest, UserRecord};
use crate::services::password::{hash_password, verify_password};

pub struct AuthService {
    users: Collection<UserRecord>,
    ledger: Arc<dyn TokenLedger>,
    jwt_secret: String,
    token_ttl_minutes: i64,
}

impl AuthService {
    pub fn new(state: &AppState) -> Self {
        Self {
            users: state.store.collection(USERS_COLLECTION),
            ledger: Arc::clone(&state.ledger),
            jwt_secret: state.config.jwt_secret.clone(),
            token_ttl_minutes: state.config.token_ttl_minutes,
        }
    }

    /// Verify credentials and mint a bearer token. Unknown user and
    /// wrong password are indistinguishable to the caller.
    pub async fn login(&self, request: LoginRequest) -> Result<String, AppError> {
        debug!("Login attempt for user: {}", request.username);

        let user = self
            .users
            .find_one(doc! { "username": request.username.as_str() })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or(AuthError::InvalidCredentials)?;

        let verified = verify_password(&request.password, &user.password)
            .map_err(|e| AppError::Internal(format!("password verification failed: {}", e)))?;
        if !verified {
            return Err(AuthError::InvalidCredentials.into());
        }

        issue_token(
            &user.username,
            user.admin,
            &self.jwt_secret,
            self.token_ttl_minutes,
        )
        .map_err(AppError::Auth)
    }

    /// Blacklist the presented token. Revoking twice is the same as
    /// revoking once.
    pub async fn logout(&self, token: &str) -> Result<(), AppError> {
        self.ledger
            .revoke(token)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Bootstrap collaborator: make sure at least one admin login
    /// exists so a fresh deployment is reachable.
    pub async fn seed_default_admin(&self) -> Result<()> {
        if self
            .users
            .find_one(doc! { "username": "admin" })
            .await?
            .is_some()
        {
            return Ok(());
        }

        let record = UserRecord {
            id: None,
            name: None,
            username: "admin".to_string(),
            password: hash_password("admin123")
                .map_err(|e| anyhow::anyhow!("failed to hash seed password: {}", e))?,
            admin: true,
            email: None,
        };
        self.users.insert_one(record).await?;
        warn!("Default admin user created (admin/admin123) - change this credential");

        Ok(())
    }
}
