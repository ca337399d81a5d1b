//! HMAC-SHA256 token verification for the socket handshake.
//!
//! Tokens use the compact JWT wire format
//! (`base64url(header).base64url(payload).base64url(signature)`) with
//! claims `{sub, name, role, exp}`. Verification checks the structure, the
//! signature and the expiry, nothing more: refresh, revocation and key
//! rotation are out of scope. The verifier can also issue tokens, which the
//! CLI client's dev mode and the test suites use.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use crate::domain::{AuthenticatedUser, Role, UserId, UserName};

type HmacSha256 = Hmac<Sha256>;

/// Claims carried by a connection token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User id
    pub sub: String,
    /// Display name
    pub name: String,
    /// Room role the user connects with
    pub role: Role,
    /// Expiry, Unix epoch seconds
    pub exp: i64,
}

/// トークン検証エラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("token expired")]
    Expired,

    #[error("invalid token claims: {0}")]
    InvalidClaims(String),
}

/// Verifies and issues connection tokens with a shared HMAC-SHA256 secret.
pub struct TokenVerifier {
    secret: Vec<u8>,
}

impl TokenVerifier {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Verify a compact token and return the authenticated user.
    ///
    /// # Arguments
    ///
    /// * `token` - The compact token from the handshake query
    /// * `now_millis` - Current time, Unix epoch milliseconds
    pub fn verify(&self, token: &str, now_millis: i64) -> Result<AuthenticatedUser, TokenError> {
        let parts: Vec<&str> = token.split('.').collect();
        if parts.len() != 3 {
            return Err(TokenError::Malformed);
        }

        let signature = URL_SAFE_NO_PAD
            .decode(parts[2])
            .map_err(|_| TokenError::Malformed)?;
        let mut mac = self.mac();
        mac.update(parts[0].as_bytes());
        mac.update(b".");
        mac.update(parts[1].as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::InvalidSignature)?;

        let payload = URL_SAFE_NO_PAD
            .decode(parts[1])
            .map_err(|_| TokenError::Malformed)?;
        let claims: TokenClaims = serde_json::from_slice(&payload)
            .map_err(|e| TokenError::InvalidClaims(e.to_string()))?;

        if claims.exp <= now_millis / 1000 {
            return Err(TokenError::Expired);
        }

        let id = UserId::new(claims.sub).map_err(|e| TokenError::InvalidClaims(e.to_string()))?;
        let name =
            UserName::new(claims.name).map_err(|e| TokenError::InvalidClaims(e.to_string()))?;

        Ok(AuthenticatedUser {
            id,
            name,
            role: claims.role,
        })
    }

    /// Issue a signed compact token for the given claims.
    pub fn issue(&self, claims: &TokenClaims) -> String {
        let header = serde_json::json!({"alg": "HS256", "typ": "JWT"});
        // serializing a literal header / plain-struct claims cannot fail
        let header_b64 = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header).unwrap());
        let payload_b64 = URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims).unwrap());

        let mut mac = self.mac();
        mac.update(header_b64.as_bytes());
        mac.update(b".");
        mac.update(payload_b64.as_bytes());
        let signature_b64 = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        format!("{header_b64}.{payload_b64}.{signature_b64}")
    }

    fn mac(&self) -> HmacSha256 {
        // HMAC accepts keys of any length
        HmacSha256::new_from_slice(&self.secret).expect("HMAC key of any length is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW_MILLIS: i64 = 1_754_000_000_000;

    fn verifier() -> TokenVerifier {
        TokenVerifier::new("test-secret")
    }

    fn claims_for(sub: &str, role: Role, exp: i64) -> TokenClaims {
        TokenClaims {
            sub: sub.to_string(),
            name: format!("{sub}-name"),
            role,
            exp,
        }
    }

    #[test]
    fn test_issue_then_verify_roundtrip() {
        // テスト項目: 発行したトークンが検証を通り、クレームが復元される
        // given (前提条件):
        let verifier = verifier();
        let claims = claims_for("coach-a", Role::Coach, NOW_MILLIS / 1000 + 3600);

        // when (操作):
        let token = verifier.issue(&claims);
        let user = verifier.verify(&token, NOW_MILLIS).unwrap();

        // then (期待する結果):
        assert_eq!(user.id.as_str(), "coach-a");
        assert_eq!(user.name.as_str(), "coach-a-name");
        assert_eq!(user.role, Role::Coach);
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        // テスト項目: 異なるシークレットで署名されたトークンが拒否される
        // given (前提条件):
        let other = TokenVerifier::new("other-secret");
        let claims = claims_for("coach-a", Role::Coach, NOW_MILLIS / 1000 + 3600);
        let token = other.issue(&claims);

        // when (操作):
        let result = verifier().verify(&token, NOW_MILLIS);

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), TokenError::InvalidSignature);
    }

    #[test]
    fn test_verify_rejects_tampered_payload() {
        // テスト項目: ペイロードを差し替えたトークンが拒否される
        // given (前提条件):
        let verifier = verifier();
        let token = verifier.issue(&claims_for(
            "viewer-b",
            Role::Viewer,
            NOW_MILLIS / 1000 + 3600,
        ));
        let forged_claims = claims_for("viewer-b", Role::Coach, NOW_MILLIS / 1000 + 3600);
        let forged_payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged_claims).unwrap());
        let parts: Vec<&str> = token.split('.').collect();
        let forged = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

        // when (操作): viewer が coach を騙ろうとする
        let result = verifier.verify(&forged, NOW_MILLIS);

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), TokenError::InvalidSignature);
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        // テスト項目: exp を過ぎたトークンが拒否される
        // given (前提条件):
        let verifier = verifier();
        let claims = claims_for("coach-a", Role::Coach, NOW_MILLIS / 1000 - 1);
        let token = verifier.issue(&claims);

        // when (操作):
        let result = verifier.verify(&token, NOW_MILLIS);

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), TokenError::Expired);
    }

    #[test]
    fn test_verify_rejects_malformed_token() {
        // テスト項目: ドット区切りでないトークンが拒否される
        // given (前提条件):
        let verifier = verifier();

        // when (操作):
        let result = verifier.verify("not-a-token", NOW_MILLIS);

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), TokenError::Malformed);
    }

    #[test]
    fn test_verify_rejects_empty_subject() {
        // テスト項目: sub が空のトークンがクレーム検証で拒否される
        // given (前提条件):
        let verifier = verifier();
        let claims = TokenClaims {
            sub: "".to_string(),
            name: "ghost".to_string(),
            role: Role::Viewer,
            exp: NOW_MILLIS / 1000 + 3600,
        };
        let token = verifier.issue(&claims);

        // when (操作):
        let result = verifier.verify(&token, NOW_MILLIS);

        // then (期待する結果):
        assert!(matches!(
            result.unwrap_err(),
            TokenError::InvalidClaims(_)
        ));
    }
}
