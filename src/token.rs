use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::Config;

// Payload embedded in every issued token. `expires` is unix seconds.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    pub expires: f64,
}

// Wire format handed to a client after a successful login
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

fn token_response(token: String) -> TokenResponse {
    TokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
    }
}

fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs_f64())
        .unwrap_or_default()
}

fn sign_claims(claims: &Claims, config: &Config) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::new(config.token_algorithm),
        claims,
        &EncodingKey::from_secret(config.token_secret.as_bytes()),
    )
}

// Issues a signed token for the given username, valid for the configured
// number of seconds.
pub fn sign_token(
    username: &str,
    config: &Config,
) -> Result<TokenResponse, jsonwebtoken::errors::Error> {
    let claims = Claims {
        username: username.to_string(),
        expires: unix_now() + config.token_expiry_seconds as f64,
    };

    Ok(token_response(sign_claims(&claims, config)?))
}

// Validates the signature and the embedded expiry. Every failure mode --
// bad signature, malformed payload, missing field, past expiry -- comes
// back as None so callers cannot tell them apart.
pub fn decode_token(token: &str, config: &Config) -> Option<Claims> {
    // The payload carries `expires` rather than the registered `exp` claim,
    // so the library's expiry validation is switched off and done by hand.
    let mut validation = Validation::new(config.token_algorithm);
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.token_secret.as_bytes()),
        &validation,
    )
    .ok()?;

    if data.claims.expires < unix_now() {
        return None;
    }

    Some(data.claims)
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::Algorithm;

    use super::*;

    fn test_config() -> Config {
        Config {
            database_url: String::new(),
            token_secret: "unit-test-secret".to_string(),
            token_algorithm: Algorithm::HS256,
            token_expiry_seconds: 600,
        }
    }

    #[test]
    fn round_trip_preserves_the_username() {
        let config = test_config();

        let token = sign_token("alice", &config).expect("token");
        assert_eq!(token.token_type, "bearer");

        let claims = decode_token(&token.access_token, &config).expect("claims");
        assert_eq!(claims.username, "alice");
        assert!(claims.expires > unix_now());
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let config = test_config();

        let claims = Claims {
            username: "alice".to_string(),
            expires: unix_now() - 1.0,
        };
        let token = sign_claims(&claims, &config).expect("token");

        assert!(decode_token(&token, &config).is_none());
    }

    #[test]
    fn tampered_tokens_are_rejected() {
        let config = test_config();

        let token = sign_token("alice", &config).expect("token").access_token;

        // Alter the first character of the payload segment.
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        assert_eq!(parts.len(), 3);
        let mut payload: Vec<char> = parts[1].chars().collect();
        payload[0] = if payload[0] == 'e' { 'f' } else { 'e' };
        parts[1] = payload.into_iter().collect();
        let tampered = parts.join(".");

        assert!(decode_token(&tampered, &config).is_none());
    }

    #[test]
    fn tokens_signed_with_another_secret_are_rejected() {
        let config = test_config();
        let other = Config {
            token_secret: "a-different-secret".to_string(),
            ..test_config()
        };

        let token = sign_token("alice", &other).expect("token").access_token;

        assert!(decode_token(&token, &config).is_none());
    }

    #[test]
    fn garbage_input_is_rejected() {
        let config = test_config();

        assert!(decode_token("not-a-token", &config).is_none());
        assert!(decode_token("", &config).is_none());
    }
}
