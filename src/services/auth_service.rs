use std::sync::Arc;

use validator::Validate;

use crate::database::store::UserStore;
use crate::dto::auth_dto::{LoginPayload, SignupPayload};
use crate::error::{Error, Result};
use crate::models::user::{NewUser, Role, User, UserSummary};
use crate::utils::crypto::{hash_password, verify_password};
use crate::utils::token::TokenSigner;
use crate::utils::validation::non_blank;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: TokenSigner,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenSigner) -> Self {
        Self { users, tokens }
    }

    pub async fn signup(&self, payload: SignupPayload) -> Result<(String, User)> {
        let payload = SignupPayload {
            name: payload.name.trim().to_string(),
            email: normalize_email(&payload.email),
            phone_number: non_blank(payload.phone_number),
            ..payload
        };
        payload.validate()?;

        let role = match non_blank(payload.role) {
            Some(raw) => raw
                .parse::<Role>()
                .map_err(|_| Error::BadRequest("Role must be candidate or hr".to_string()))?,
            None => Role::Candidate,
        };

        let new_user = NewUser {
            name: payload.name,
            email: payload.email,
            phone_number: payload.phone_number,
            password_hash: hash_password(&payload.password)?,
            role,
        };
        let user = self.users.insert_user(new_user).await.map_err(|e| match e {
            Error::Conflict(_) => {
                Error::Conflict("An account with this email already exists".to_string())
            }
            other => other,
        })?;
        tracing::info!(user_id = user.id, role = %user.role, "User signed up");

        let token = self.tokens.issue(&user)?;
        Ok((token, user))
    }

    pub async fn login(&self, payload: LoginPayload) -> Result<(String, User)> {
        let email = normalize_email(&payload.email);
        let Some(user) = self.users.find_user_by_email(&email).await? else {
            return Err(Error::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };
        if !verify_password(&payload.password, &user.password_hash) {
            tracing::warn!(user_id = user.id, "Failed login attempt");
            return Err(Error::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let token = self.tokens.issue(&user)?;
        Ok((token, user))
    }

    pub async fn get_user(&self, id: i64) -> Result<UserSummary> {
        self.users
            .find_user(id)
            .await?
            .map(UserSummary::from)
            .ok_or_else(|| Error::NotFound("User not found".to_string()))
    }
}
