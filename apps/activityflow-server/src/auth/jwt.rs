use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub roles: Vec<String>,
    pub jti: String,
    pub typ: TokenKind,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
    pub expires_at: DateTime<Utc>,
}

/// Identity baked into a token pair.
#[derive(Debug, Clone)]
pub struct Subject<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub name: &'a str,
    pub roles: &'a [String],
}

pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl JwtKeys {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            access_ttl: Duration::minutes(config.expiration_minutes),
            refresh_ttl: Duration::days(config.refresh_expiration_days),
        }
    }

    pub fn issue(&self, subject: &Subject<'_>) -> anyhow::Result<TokenPair> {
        self.issue_at(subject, Utc::now())
    }

    pub fn issue_at(&self, subject: &Subject<'_>, now: DateTime<Utc>) -> anyhow::Result<TokenPair> {
        let expires_at = now + self.access_ttl;
        let access = self.sign(subject, TokenKind::Access, now, expires_at)?;
        let refresh = self.sign(subject, TokenKind::Refresh, now, now + self.refresh_ttl)?;
        Ok(TokenPair {
            access,
            refresh,
            expires_at,
        })
    }

    fn sign(
        &self,
        subject: &Subject<'_>,
        typ: TokenKind,
        now: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> anyhow::Result<String> {
        let claims = Claims {
            sub: subject.id.to_string(),
            email: subject.email.to_string(),
            name: subject.name.to_string(),
            roles: subject.roles.to_vec(),
            jti: Uuid::new_v4().to_string(),
            typ,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    /// Checks signature, issuer, audience, expiry and the token kind.
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            tracing::debug!("Rejected token: {}", e);
            AppError::Unauthorized
        })?;

        if data.claims.typ != expected {
            return Err(AppError::Unauthorized);
        }
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;

    fn keys() -> JwtKeys {
        JwtKeys::new(&test_config().jwt)
    }

    fn subject(roles: &[String]) -> Subject<'_> {
        Subject {
            id: Uuid::nil(),
            email: "user1@example.com",
            name: "user1",
            roles,
        }
    }

    #[test]
    fn access_token_round_trips_claims() {
        let roles = vec!["User".to_string()];
        let pair = keys().issue(&subject(&roles)).unwrap();
        let claims = keys().verify(&pair.access, TokenKind::Access).unwrap();

        assert_eq!(claims.sub, Uuid::nil().to_string());
        assert_eq!(claims.email, "user1@example.com");
        assert_eq!(claims.roles, roles);
        assert_eq!(claims.iss, "ActivityFlow");
    }

    #[test]
    fn token_kinds_are_not_interchangeable() {
        let pair = keys().issue(&subject(&[])).unwrap();
        assert!(keys().verify(&pair.refresh, TokenKind::Access).is_err());
        assert!(keys().verify(&pair.access, TokenKind::Refresh).is_err());
        assert!(keys().verify(&pair.refresh, TokenKind::Refresh).is_ok());
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let issued = Utc::now() - Duration::days(2);
        let pair = keys().issue_at(&subject(&[]), issued).unwrap();
        assert!(keys().verify(&pair.access, TokenKind::Access).is_err());
    }

    #[test]
    fn tokens_signed_with_another_secret_are_rejected() {
        let mut other = test_config().jwt;
        other.secret = "another-secret-another-secret-another".to_string();
        let pair = JwtKeys::new(&other).issue(&subject(&[])).unwrap();
        assert!(keys().verify(&pair.access, TokenKind::Access).is_err());
    }

    #[test]
    fn wrong_audience_is_rejected() {
        let mut other = test_config().jwt;
        other.audience = "SomeoneElse".to_string();
        let pair = JwtKeys::new(&other).issue(&subject(&[])).unwrap();
        assert!(keys().verify(&pair.access, TokenKind::Access).is_err());
    }
}
