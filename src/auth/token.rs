// JWT token issuance and verification

use crate::auth::{error::AuthError, models::Role};
use crate::config::AppConfig;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims: principal id, optional role (admins only), issued-at, expiry.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    pub iat: i64,
    pub exp: i64,
}

/// Token service for issuing and verifying bearer tokens.
///
/// Stateless: nothing is persisted, so a token stays valid until its natural
/// expiry. Keys are derived once from the immutable configuration.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: i64,
    refresh_ttl: i64,
}

impl TokenService {
    pub fn new(secret: &str, access_ttl: i64, refresh_ttl: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            &config.jwt_secret,
            config.access_token_ttl,
            config.refresh_token_ttl,
        )
    }

    /// Issue an access token for a principal. Admin tokens embed the stored
    /// role; student tokens carry no role claim.
    pub fn issue(&self, principal_id: Uuid, role: Option<Role>) -> Result<String, AuthError> {
        self.sign(principal_id, role, self.access_ttl)
    }

    /// Issue a longer-lived refresh token (id claim only). Refresh tokens are
    /// never persisted or rotated.
    pub fn issue_refresh(&self, principal_id: Uuid) -> Result<String, AuthError> {
        self.sign(principal_id, None, self.refresh_ttl)
    }

    fn sign(&self, principal_id: Uuid, role: Option<Role>, ttl: i64) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: principal_id,
            role,
            iat: now,
            exp: now + ttl,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }

    /// Verify a token, failing closed: signature mismatch, malformed input
    /// and expiry all return an error result.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                _ => AuthError::InvalidToken,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_ACCESS_TOKEN_TTL, DEFAULT_REFRESH_TOKEN_TTL};
    use proptest::prelude::*;

    fn test_token_service() -> TokenService {
        TokenService::new(
            "test_secret_key_for_testing_purposes",
            DEFAULT_ACCESS_TOKEN_TTL,
            DEFAULT_REFRESH_TOKEN_TTL,
        )
    }

    #[test]
    fn access_token_expires_in_seven_days() {
        let service = test_token_service();
        let token = service.issue(Uuid::new_v4(), Some(Role::Admin)).unwrap();
        let claims = service.verify(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, 604_800);
    }

    #[test]
    fn refresh_token_expires_in_thirty_days() {
        let service = test_token_service();
        let token = service.issue_refresh(Uuid::new_v4()).unwrap();
        let claims = service.verify(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, 2_592_000);
        assert_eq!(claims.role, None);
    }

    #[test]
    fn claims_carry_principal_identity_and_role() {
        let service = test_token_service();
        let id = Uuid::new_v4();

        let admin_token = service.issue(id, Some(Role::Parent)).unwrap();
        let admin_claims = service.verify(&admin_token).unwrap();
        assert_eq!(admin_claims.sub, id);
        assert_eq!(admin_claims.role, Some(Role::Parent));

        let student_token = service.issue(id, None).unwrap();
        let student_claims = service.verify(&student_token).unwrap();
        assert_eq!(student_claims.sub, id);
        assert_eq!(student_claims.role, None);
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        let service = test_token_service();

        assert!(service.verify("").is_err());
        assert!(service.verify("not.a.token").is_err());
        assert!(service.verify("no_dots_at_all").is_err());
        assert!(service
            .verify("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.invalid.signature")
            .is_err());
    }

    #[test]
    fn tokens_signed_with_a_different_secret_are_rejected() {
        let service1 = TokenService::new("secret-one", 600, 600);
        let service2 = TokenService::new("secret-two", 600, 600);

        let token = service1.issue(Uuid::new_v4(), None).unwrap();
        assert!(service1.verify(&token).is_ok());
        assert!(matches!(
            service2.verify(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let service = test_token_service();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4(),
            role: None,
            iat: now - 1_000,
            exp: now - 500,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("test_secret_key_for_testing_purposes".as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            service.verify(&token),
            Err(AuthError::ExpiredToken)
        ));
    }

    proptest! {
        #[test]
        fn prop_issued_tokens_round_trip_identity(seed in any::<u128>()) {
            let service = test_token_service();
            let id = Uuid::from_u128(seed);

            let token = service.issue(id, Some(Role::Admin)).unwrap();
            let claims = service.verify(&token).unwrap();
            prop_assert_eq!(claims.sub, id);
        }

        #[test]
        fn prop_random_strings_are_never_valid_tokens(garbage in "[a-zA-Z0-9]{10,50}") {
            let service = test_token_service();
            prop_assert!(service.verify(&garbage).is_err());
        }
    }
}
