use crate::error::AppError;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Claims carried by an admin session token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Admin user id.
    pub sub: i32,
    /// Admin email at sign-in time. `AuthMiddleware` replaces it with the stored
    /// one on every request.
    pub email: String,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
}

/// Generates a session token for an admin that expires after `ttl_hours`.
pub fn generate_token(
    admin_user_id: i32,
    email: &str,
    secret: &str,
    ttl_hours: i64,
) -> Result<String, AppError> {
    let expiration = chrono::Utc::now()
        .checked_add_signed(chrono::Duration::hours(ttl_hours))
        .ok_or_else(|| AppError::InternalServerError("session expiry out of range".into()))?
        .timestamp() as usize;

    let claims = Claims {
        sub: admin_user_id,
        email: email.to_string(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
}

/// Verifies the token signature and expiry and returns its claims.
///
/// Any failure is `AppError::Unauthorized`.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_generation_and_verification() {
        let token = generate_token(1, "a@b.com", "test_secret", 24).unwrap();
        let claims = verify_token(&token, "test_secret").unwrap();
        assert_eq!(claims.sub, 1);
        assert_eq!(claims.email, "a@b.com");
    }

    #[test]
    fn test_token_expiration() {
        let expiration = chrono::Utc::now()
            .checked_sub_signed(chrono::Duration::hours(2))
            .expect("valid timestamp")
            .timestamp() as usize;
        let expired = encode(
            &Header::default(),
            &Claims {
                sub: 2,
                email: "late@b.com".to_string(),
                exp: expiration,
            },
            &EncodingKey::from_secret(b"test_secret"),
        )
        .unwrap();

        match verify_token(&expired, "test_secret") {
            Err(AppError::Unauthorized(msg)) => assert!(msg.contains("ExpiredSignature")),
            other => panic!("expected an expired token error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_token_signature() {
        let token = generate_token(3, "a@b.com", "one_secret", 1).unwrap();
        assert!(matches!(
            verify_token(&token, "another_secret"),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_garbage_token_is_unauthorized() {
        assert!(matches!(
            verify_token("not-a-token", "test_secret"),
            Err(AppError::Unauthorized(_))
        ));
    }
}
