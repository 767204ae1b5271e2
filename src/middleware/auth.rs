use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::{header, request::Parts},
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize, Serialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: usize,
}

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: String,
}

pub fn ensure_role(user: &AuthUser, role: &str) -> Result<(), AppError> {
    if user.role != role {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

/// Staff operations (zone fees, coupon management) require the admin role.
pub fn ensure_admin(user: &AuthUser) -> Result<(), AppError> {
    ensure_role(user, "admin")
}

pub fn decode_token(token: &str, secret: &str) -> Result<AuthUser, AppError> {
    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))?;

    let user_id = Uuid::parse_str(&decoded.claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid user id in token".into()))?;

    Ok(AuthUser {
        user_id,
        role: decoded.claims.role,
    })
}

fn bearer_token(parts: &Parts) -> Result<Option<&str>, AppError> {
    let Some(auth_header) = parts.headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AppError::BadRequest("Invalid Authorization header".into()))?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) => Ok(Some(token.trim())),
        None => Err(AppError::BadRequest("Invalid Authorization scheme".into())),
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;
        decode_token(token, &state.jwt_secret)
    }
}

/// Anonymous requests are allowed; a present but bad token is still rejected.
impl OptionalFromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        match bearer_token(parts)? {
            Some(token) => decode_token(token, &state.jwt_secret).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{EncodingKey, Header, encode};

    use super::*;

    fn token_for(sub: &str, role: &str, secret: &str) -> String {
        let claims = Claims {
            sub: sub.to_string(),
            role: role.to_string(),
            exp: (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp() as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn decodes_a_valid_token() {
        let user_id = Uuid::new_v4();
        let token = token_for(&user_id.to_string(), "admin", "secret");
        let user = decode_token(&token, "secret").unwrap();
        assert_eq!(user.user_id, user_id);
        assert!(ensure_admin(&user).is_ok());
    }

    #[test]
    fn rejects_wrong_secret_and_bad_subject() {
        let token = token_for(&Uuid::new_v4().to_string(), "user", "secret");
        assert!(matches!(
            decode_token(&token, "other"),
            Err(AppError::Unauthorized(_))
        ));

        let token = token_for("not-a-uuid", "user", "secret");
        assert!(matches!(
            decode_token(&token, "secret"),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn customers_are_not_staff() {
        let user = AuthUser {
            user_id: Uuid::new_v4(),
            role: "user".into(),
        };
        assert!(matches!(ensure_admin(&user), Err(AppError::Forbidden)));
    }
}
