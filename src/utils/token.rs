use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::user::{Role, User};
use crate::utils::time::now;

/// Session claims carried by every bearer token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub role: Role,
    pub name: String,
    pub exp: usize,
}

impl Claims {
    /// Rejects requests whose path-supplied user id is not the caller's.
    pub fn ensure_user(&self, user_id: i64) -> Result<()> {
        if self.user_id != user_id {
            tracing::warn!(
                caller = self.user_id,
                requested = user_id,
                "Path identity does not match token identity"
            );
            return Err(Error::Forbidden(
                "You can only act on your own account".to_string(),
            ));
        }
        Ok(())
    }

    pub fn ensure_role(&self, role: Role) -> Result<()> {
        if self.role != role {
            return Err(Error::Forbidden(format!(
                "This action requires the {} role",
                role
            )));
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenSigner {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours),
        }
    }

    pub fn issue(&self, user: &User) -> Result<String> {
        let claims = Claims {
            user_id: user.id,
            role: user.role,
            name: user.name.clone(),
            exp: (now() + self.ttl).timestamp() as usize,
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    pub fn verify(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }
}
