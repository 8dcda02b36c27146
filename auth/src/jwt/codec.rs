use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::crypto;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::TokenError;
use crate::role::Role;

/// Issues and validates signed bearer tokens.
///
/// Uses HS256 (HMAC with SHA-256). The keys are derived once from the secret
/// and never mutated, so a single codec can be shared across any number of
/// concurrent callers.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl TokenCodec {
    /// Create a new codec with a secret key.
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        }
    }

    /// Issue a token for `subject` carrying `role`, valid for `ttl` from now.
    ///
    /// # Errors
    /// * `InvalidLifetime` - `ttl` overflows the expiration
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(&self, subject: &str, role: Role, ttl: Duration) -> Result<String, TokenError> {
        self.encode(&Claims::for_subject(subject, role, ttl)?)
    }

    /// Sign arbitrary claims.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode(&self, claims: &Claims) -> Result<String, TokenError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Validate a token against the current time.
    ///
    /// # Errors
    /// * `Malformed` - Token structure or claims cannot be decoded
    /// * `BadSignature` - Signature does not verify against the secret
    /// * `Expired` - Current time is at or past the expiration
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        self.validate_at(token, Utc::now().timestamp())
    }

    /// Validate a token against an explicit Unix timestamp.
    ///
    /// The signature over `header.payload` is checked before anything in the
    /// payload is decoded.
    pub fn validate_at(&self, token: &str, now: i64) -> Result<Claims, TokenError> {
        let mut segments = token.splitn(3, '.');
        let (header, payload, signature) = match (segments.next(), segments.next(), segments.next())
        {
            (Some(header), Some(payload), Some(signature))
                if !header.is_empty() && !payload.is_empty() =>
            {
                (header, payload, signature)
            }
            _ => {
                return Err(TokenError::Malformed(
                    "expected three dot-separated segments".to_string(),
                ))
            }
        };

        let message = &token[..header.len() + 1 + payload.len()];
        match crypto::verify(signature, message.as_bytes(), &self.decoding_key, self.algorithm) {
            Ok(true) => {}
            Ok(false) | Err(_) => return Err(TokenError::BadSignature),
        }

        let mut validation = Validation::new(self.algorithm);
        // Expiry is checked below against `now` with no leeway
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                _ => TokenError::Malformed(e.to_string()),
            })?;

        if claims.is_expired(now) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    const SECRET: &[u8] = b"my_secret_key_at_least_32_bytes_long!";

    #[test]
    fn test_issue_and_validate() {
        let codec = TokenCodec::new(SECRET);

        let token = codec
            .issue("alice", Role::User, Duration::hours(1))
            .expect("Failed to issue token");
        assert_eq!(token.split('.').count(), 3);

        let claims = codec.validate(&token).expect("Failed to validate token");
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.role, Role::User);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_validate_before_and_after_expiry() {
        let codec = TokenCodec::new(SECRET);
        let token = codec
            .issue("alice", Role::Admin, Duration::seconds(30))
            .expect("Failed to issue token");
        let exp = codec.validate(&token).expect("Valid token").exp;

        assert!(codec.validate_at(&token, exp - 1).is_ok());
        assert_eq!(codec.validate_at(&token, exp), Err(TokenError::Expired));
        assert_eq!(codec.validate_at(&token, exp + 3600), Err(TokenError::Expired));
    }

    #[test]
    fn test_already_expired_token() {
        let codec = TokenCodec::new(SECRET);
        let token = codec
            .issue("alice", Role::User, Duration::seconds(-5))
            .expect("Failed to issue token");

        assert_eq!(codec.validate(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_wrong_secret_is_bad_signature() {
        let issuer = TokenCodec::new(b"secret1_at_least_32_bytes_long_key!");
        let verifier = TokenCodec::new(b"secret2_at_least_32_bytes_long_key!");

        let token = issuer
            .issue("alice", Role::User, Duration::hours(1))
            .expect("Failed to issue token");

        assert_eq!(verifier.validate(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_signature_checked_before_expiry() {
        let issuer = TokenCodec::new(b"secret1_at_least_32_bytes_long_key!");
        let verifier = TokenCodec::new(b"secret2_at_least_32_bytes_long_key!");

        let token = issuer
            .issue("alice", Role::User, Duration::seconds(-5))
            .expect("Failed to issue token");

        assert_eq!(verifier.validate(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_signature_mutation_is_bad_signature() {
        let codec = TokenCodec::new(SECRET);
        let token = codec
            .issue("alice", Role::User, Duration::hours(1))
            .expect("Failed to issue token");
        let signature_start = token.rfind('.').unwrap() + 1;

        let mut mutations = 0;
        for index in signature_start..token.len() {
            let mut bytes = token.clone().into_bytes();
            bytes[index] ^= 1;
            let flipped = bytes[index] as char;
            if !(flipped.is_ascii_alphanumeric() || flipped == '-' || flipped == '_') {
                continue;
            }

            let mutated = String::from_utf8(bytes).unwrap();
            assert_eq!(
                codec.validate(&mutated),
                Err(TokenError::BadSignature),
                "mutation at byte {index}"
            );
            mutations += 1;
        }
        assert!(mutations > 0);
    }

    #[test]
    fn test_tampered_payload_is_bad_signature() {
        let codec = TokenCodec::new(SECRET);
        let user_token = codec
            .issue("mallory", Role::User, Duration::hours(1))
            .expect("Failed to issue token");
        let admin_token = codec
            .issue("mallory", Role::Admin, Duration::hours(1))
            .expect("Failed to issue token");

        // Splice the admin payload onto the user signature
        let user_parts: Vec<&str> = user_token.split('.').collect();
        let admin_parts: Vec<&str> = admin_token.split('.').collect();
        let forged = format!("{}.{}.{}", user_parts[0], admin_parts[1], user_parts[2]);

        assert_eq!(codec.validate(&forged), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_malformed_tokens() {
        let codec = TokenCodec::new(SECRET);

        for token in ["", "abc", "abc.def", ".abc.def", "abc..def"] {
            assert!(
                matches!(codec.validate(token), Err(TokenError::Malformed(_))),
                "{token:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_garbage_with_three_segments_is_bad_signature() {
        let codec = TokenCodec::new(SECRET);
        assert_eq!(
            codec.validate("invalid.token.here"),
            Err(TokenError::BadSignature)
        );
    }

    #[test]
    fn test_concurrent_validation() {
        let codec = Arc::new(TokenCodec::new(SECRET));
        let token = codec
            .issue("alice", Role::User, Duration::hours(1))
            .expect("Failed to issue token");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let codec = Arc::clone(&codec);
                let token = token.clone();
                thread::spawn(move || {
                    (0..50).all(|_| codec.validate(&token).map(|c| c.sub == "alice").unwrap_or(false))
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }
}
