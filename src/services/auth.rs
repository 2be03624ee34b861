use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};
use thiserror::Error;
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
}

/// Claims carried by session tokens from the auth service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: Uuid,
    pub exp: usize,
}

/// Verifies HS256 bearer tokens; issuing them is not this service's job
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str, leeway_secs: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway_secs;

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Return the user id of a valid, unexpired token
    pub fn verify(&self, token: &str) -> Result<Uuid, AuthError> {
        let data = decode::<Claims>(token, &self.key, &self.validation)?;
        Ok(data.claims.id)
    }

    fn verify_header(&self, req: &HttpRequest) -> Result<Uuid, AuthError> {
        let token = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MissingToken)?;

        self.verify(token)
    }
}

/// Identity of the caller, extracted from `Authorization: Bearer <jwt>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: Uuid,
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = match req.app_data::<web::Data<TokenVerifier>>() {
            Some(verifier) => verifier.verify_header(req).map(|id| AuthenticatedUser { id }).map_err(|e| {
                tracing::debug!("Rejected request to {}: {}", req.path(), e);
                ApiError::from(e)
            }),
            None => {
                tracing::error!("Token verifier not registered");
                Err(ApiError::Internal("Authentication is not configured".to_string()))
            }
        };

        ready(result)
    }
}
