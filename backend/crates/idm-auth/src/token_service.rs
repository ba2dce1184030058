//! Stateless bearer token issuance and validation (HS256 JWT).
//!
//! Tokens are never stored server-side and cannot be revoked individually;
//! rotating the secret invalidates every outstanding token at once.

use crate::{AccessToken, AuthError, Claims, Result as AuthErrorResult, TOKEN_TYPE, TokenConfig};

use idm_core::User;

use std::panic::Location;

use chrono::{DateTime, Duration, Utc};
use error_location::ErrorLocation;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use log::debug;

pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    header: Header,
    validation: Validation,
    default_ttl: Duration,
}

impl TokenService {
    pub fn new(config: &TokenConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against our own clock after the signature passes,
        // so the library must not reject on `exp` itself.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(&config.secret),
            decoding_key: DecodingKey::from_secret(&config.secret),
            header: Header::new(Algorithm::HS256),
            validation,
            default_ttl: config.default_ttl,
        }
    }

    /// Issue a token for `user`, valid for `ttl` (or the configured default).
    #[track_caller]
    pub fn issue(&self, user: &User, ttl: Option<Duration>) -> AuthErrorResult<AccessToken> {
        self.issue_at(user, ttl, Utc::now())
    }

    #[track_caller]
    pub fn issue_at(
        &self,
        user: &User,
        ttl: Option<Duration>,
        now: DateTime<Utc>,
    ) -> AuthErrorResult<AccessToken> {
        let ttl = ttl.unwrap_or(self.default_ttl);

        // `iat`/`exp` are whole seconds: issue on a second boundary and count
        // whole seconds of ttl, so the token is valid at `now` and expires no
        // later than `now + ttl`.
        let ttl_secs = ttl.num_seconds();
        if ttl_secs < 1 {
            return Err(invalid_ttl(format!("must be at least 1 second, got {ttl}")));
        }

        let issued_at = DateTime::from_timestamp(now.timestamp(), 0)
            .ok_or_else(|| invalid_ttl(format!("cannot issue at {now}")))?;
        let expires_at = Duration::try_seconds(ttl_secs)
            .and_then(|ttl| issued_at.checked_add_signed(ttl))
            .ok_or_else(|| invalid_ttl(format!("{ttl} is out of range")))?;

        let claims = Claims::for_user(user, issued_at, expires_at);

        let access_token = encode(&self.header, &claims, &self.encoding_key).map_err(|e| {
            AuthError::JwtEncode {
                source: e,
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

        debug!("Issued token for user {} (role={})", user.id, user.role);

        Ok(AccessToken {
            access_token,
            token_type: TOKEN_TYPE.to_string(),
            expires_at,
            claims,
        })
    }

    /// Validate a token against the current time.
    #[track_caller]
    pub fn validate(&self, token: &str) -> AuthErrorResult<Claims> {
        self.validate_at(token, Utc::now())
    }

    /// Validate a token as of `now`.
    ///
    /// The signature is verified before any claim is looked at; a tampered
    /// token is always `JwtDecode`/`InvalidClaim`, never an expiry verdict.
    #[track_caller]
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> AuthErrorResult<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(
            |e| AuthError::JwtDecode {
                source: e,
                location: ErrorLocation::from(Location::caller()),
            },
        )?;

        let claims = token_data.claims;
        claims.validate()?;

        if claims.is_expired_at(now) {
            return Err(AuthError::TokenExpired {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(claims)
    }
}

#[track_caller]
fn invalid_ttl(message: String) -> AuthError {
    AuthError::InvalidTtl {
        message,
        location: ErrorLocation::from(Location::caller()),
    }
}
