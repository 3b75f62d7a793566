//! Token service - issues and verifies bearer tokens for every principal type.
//!
//! One HMAC-signed token shape serves platform admins, superadmins, admins and
//! users; the `type` claim is what authorization branches on.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, TOKEN_TYPE_BEARER};
use crate::domain::{Principal, PrincipalType};
use crate::errors::{AppError, AppResult, TokenError};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// JWT claims payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: Uuid,
    pub email: String,
    #[serde(rename = "type")]
    pub principal_type: PrincipalType,
    pub tenant_id: Option<Uuid>,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Principal::new(
            claims.id,
            claims.email,
            claims.principal_type,
            claims.tenant_id,
        )
    }
}

/// Signed token handed to a client after login
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IssuedToken {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token lifetime in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait TokenService: Send + Sync {
    /// Sign a token carrying exactly the principal's claims plus issuer and expiry.
    fn issue(&self, principal: &Principal) -> AppResult<IssuedToken>;

    /// Check signature, expiry and issuer, returning the principal.
    fn verify(&self, token: &str) -> AppResult<Principal>;
}

/// HS256 implementation keyed by the process-wide secret.
pub struct JwtTokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    ttl: Duration,
}

impl JwtTokens {
    pub fn new(secret: &[u8], issuer: impl Into<String>, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            issuer: issuer.into(),
            ttl,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.jwt_secret_bytes(),
            config.jwt_issuer.clone(),
            Duration::hours(config.jwt_expiration_hours),
        )
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss"]);
        validation.leeway = 0;
        validation
    }
}

impl TokenService for JwtTokens {
    fn issue(&self, principal: &Principal) -> AppResult<IssuedToken> {
        let now = Utc::now();
        let claims = Claims {
            id: principal.id,
            email: principal.email.clone(),
            principal_type: principal.principal_type,
            tenant_id: principal.tenant_id,
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::internal(format!("Token signing failed: {}", e)))?;

        Ok(IssuedToken {
            access_token: token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.ttl.num_seconds(),
        })
    }

    fn verify(&self, token: &str) -> AppResult<Principal> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation())
            .map_err(|e| AppError::Token(token_error(&e)))?;
        Ok(data.claims.into())
    }
}

fn token_error(err: &jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::InvalidIssuer => TokenError::IssuerMismatch,
        ErrorKind::MissingRequiredClaim(claim) if claim == "iss" => TokenError::IssuerMismatch,
        _ => TokenError::Malformed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"unit-test-secret-with-enough-length!!";

    fn tokens(issuer: &str, ttl: Duration) -> JwtTokens {
        JwtTokens::new(SECRET, issuer, ttl)
    }

    fn super_admin() -> Principal {
        Principal::new(
            Uuid::new_v4(),
            "root@acme.io",
            PrincipalType::SuperAdmin,
            Some(Uuid::new_v4()),
        )
    }

    #[test]
    fn test_round_trip_preserves_principal() {
        let service = tokens("tenant-core", Duration::hours(1));

        for principal in [
            super_admin(),
            Principal::new(Uuid::new_v4(), "ops@platform.io", PrincipalType::PlatformAdmin, None),
            Principal::new(Uuid::new_v4(), "a@acme.io", PrincipalType::Admin, Some(Uuid::new_v4())),
            Principal::new(Uuid::new_v4(), "u@acme.io", PrincipalType::User, Some(Uuid::new_v4())),
        ] {
            let issued = service.issue(&principal).unwrap();
            assert_eq!(service.verify(&issued.access_token).unwrap(), principal);
        }
    }

    #[test]
    fn test_issued_token_metadata() {
        let issued = tokens("tenant-core", Duration::hours(24))
            .issue(&super_admin())
            .unwrap();

        assert_eq!(issued.token_type, "Bearer");
        assert_eq!(issued.expires_in, 86_400);
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = tokens("tenant-core", Duration::seconds(-30));
        let issued = service.issue(&super_admin()).unwrap();

        let err = service.verify(&issued.access_token).unwrap_err();
        assert!(matches!(err, AppError::Token(TokenError::Expired)));
    }

    #[test]
    fn test_foreign_issuer_rejected() {
        let foreign = tokens("someone-else", Duration::hours(1));
        let issued = foreign.issue(&super_admin()).unwrap();

        let err = tokens("tenant-core", Duration::hours(1))
            .verify(&issued.access_token)
            .unwrap_err();
        assert!(matches!(err, AppError::Token(TokenError::IssuerMismatch)));
    }

    #[test]
    fn test_tampered_or_garbage_token_is_malformed() {
        let service = tokens("tenant-core", Duration::hours(1));
        let other_key = JwtTokens::new(b"a-completely-different-signing-secret", "tenant-core", Duration::hours(1));
        let issued = other_key.issue(&super_admin()).unwrap();

        assert!(matches!(
            service.verify(&issued.access_token).unwrap_err(),
            AppError::Token(TokenError::Malformed)
        ));
        assert!(matches!(
            service.verify("not-a-token").unwrap_err(),
            AppError::Token(TokenError::Malformed)
        ));
    }

    #[test]
    fn test_claims_use_type_key() {
        let claims = Claims {
            id: Uuid::nil(),
            email: "ops@platform.io".to_string(),
            principal_type: PrincipalType::PlatformAdmin,
            tenant_id: None,
            iss: "tenant-core".to_string(),
            iat: 0,
            exp: 1,
        };
        let json = serde_json::to_value(&claims).unwrap();

        assert_eq!(json["type"], "platform_admin");
        assert!(json["tenant_id"].is_null());
    }
}
