//! 자격증명(JWT) 코덱.
//!
//! HS256 대칭 서명으로 [`Claims`]를 토큰으로 인코딩하고, 토큰을 검증해
//! 다시 [`Claims`]로 디코딩합니다. 서버 측 세션 저장소 없이 서명과 만료
//! 시각만으로 유효성이 결정됩니다.

use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;

use super::{Claims, Clock, Identity, SystemClock};

/// 토큰 수명 (24시간).
pub const TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

/// 토큰 검증 실패 사유.
///
/// 로그에서는 구분하지만 클라이언트 응답에서는 하나의 401로 합쳐집니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum VerificationError {
    #[error("디코딩할 수 없는 토큰")]
    Malformed,
    #[error("서명이 유효하지 않은 토큰")]
    SignatureInvalid,
    #[error("토큰이 만료되었습니다")]
    Expired,
}

impl VerificationError {
    /// 로그용 사유 코드.
    pub fn code(&self) -> &'static str {
        match self {
            VerificationError::Malformed => "MALFORMED",
            VerificationError::SignatureInvalid => "SIGNATURE_INVALID",
            VerificationError::Expired => "EXPIRED",
        }
    }
}

/// 토큰 발급 에러.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("토큰 서명 실패: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// 자격증명 코덱.
///
/// 서명 시크릿과 시계는 생성 시점에 주입되며 이후 변경되지 않습니다.
/// 여러 요청에서 `Arc`로 공유해도 잠금이 필요 없습니다.
pub struct CredentialCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
    ttl_secs: i64,
}

impl CredentialCodec {
    /// 새 코덱 생성.
    pub fn new(secret: &SecretString, clock: Arc<dyn Clock>) -> Self {
        let secret = secret.expose_secret().as_bytes();

        // 만료 판정은 주입된 시계로 직접 수행하므로 jsonwebtoken의 exp 검증은 끈다.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            clock,
            ttl_secs: TOKEN_TTL_SECS,
        }
    }

    /// 시스템 시계를 사용하는 코덱 생성.
    pub fn with_system_clock(secret: &SecretString) -> Self {
        Self::new(secret, Arc::new(SystemClock))
    }

    /// 신원 정보로 새 토큰 발급.
    ///
    /// `iat = now`, `exp = now + 24h`로 설정합니다.
    pub fn issue(&self, identity: &Identity) -> Result<String, CodecError> {
        let now = self.clock.now();
        let claims = Claims {
            identity: identity.clone(),
            iat: now,
            exp: now + self.ttl_secs,
        };
        self.sign(&claims)
    }

    /// 이미 시각이 설정된 Claims에 서명.
    pub fn sign(&self, claims: &Claims) -> Result<String, CodecError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key).map_err(CodecError::from)
    }

    /// 토큰 검증 및 디코딩.
    ///
    /// 헤더/페이로드 세그먼트가 손상되면 `Malformed`, 서명 세그먼트가 손상되거나
    /// 다른 키·알고리즘으로 서명되었으면 `SignatureInvalid`, `exp <= now`이면
    /// `Expired`를 반환합니다.
    pub fn verify(&self, token: &str) -> Result<Claims, VerificationError> {
        let mut segments = token.splitn(3, '.');
        let (Some(header), Some(payload), Some(signature)) =
            (segments.next(), segments.next(), segments.next())
        else {
            return Err(VerificationError::Malformed);
        };

        let header: Header = decode_segment(header).ok_or(VerificationError::Malformed)?;
        decode_segment::<serde_json::Map<String, serde_json::Value>>(payload)
            .ok_or(VerificationError::Malformed)?;

        if header.alg != Algorithm::HS256 {
            return Err(VerificationError::SignatureInvalid);
        }
        if signature.is_empty() || signature.contains('.') {
            return Err(VerificationError::SignatureInvalid);
        }

        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    VerificationError::SignatureInvalid
                }
                _ => VerificationError::Malformed,
            })?
            .claims;

        if claims.exp <= self.clock.now() {
            return Err(VerificationError::Expired);
        }

        Ok(claims)
    }

    /// 만료까지 남은 시간 (초). 음수면 이미 만료.
    pub fn time_until_expiry(&self, claims: &Claims) -> i64 {
        claims.exp - self.clock.now()
    }
}

/// base64url(패딩 없음) JSON 세그먼트 디코딩.
fn decode_segment<T: DeserializeOwned>(segment: &str) -> Option<T> {
    let bytes = URL_SAFE_NO_PAD.decode(segment).ok()?;
    serde_json::from_slice(&bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AccountType, ManualClock};
    use proptest::prelude::*;
    use serde_json::json;

    const TEST_SECRET: &str = "test-secret-key-for-jwt-testing-minimum-32-chars";
    const T0: i64 = 1_760_000_000;

    fn secret(s: &str) -> SecretString {
        SecretString::new(s.into())
    }

    fn codec_at(now: i64) -> (CredentialCodec, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(now));
        (CredentialCodec::new(&secret(TEST_SECRET), clock.clone()), clock)
    }

    fn identity() -> Identity {
        Identity {
            user_id: 1001,
            name: "cashier".to_string(),
            store_code: "SEL-001".to_string(),
            is_admin: false,
            account_type: AccountType::Staff,
            price_list_id: None,
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let (codec, _) = codec_at(T0);

        let token = codec.issue(&identity()).unwrap();
        assert!(!token.is_empty());

        let claims = codec.verify(&token).unwrap();
        assert_eq!(claims.identity, identity());
        assert_eq!(claims.iat, T0);
        assert_eq!(claims.exp, T0 + TOKEN_TTL_SECS);
    }

    #[test]
    fn test_expiry_boundary() {
        let (codec, clock) = codec_at(T0);
        let claims = Claims {
            identity: identity(),
            iat: T0 - 100,
            exp: T0,
        };
        let token = codec.sign(&claims).unwrap();

        assert_eq!(codec.verify(&token), Err(VerificationError::Expired));

        clock.set(T0 - 1);
        assert_eq!(codec.verify(&token).unwrap(), claims);

        clock.set(T0 + 3600);
        assert_eq!(codec.verify(&token), Err(VerificationError::Expired));
    }

    #[test]
    fn test_expires_after_ttl() {
        let (codec, clock) = codec_at(T0);
        let token = codec.issue(&identity()).unwrap();

        clock.advance(TOKEN_TTL_SECS - 1);
        assert!(codec.verify(&token).is_ok());

        clock.advance(1);
        assert_eq!(codec.verify(&token), Err(VerificationError::Expired));
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let (codec, _) = codec_at(T0);
        let token = codec.issue(&identity()).unwrap();
        let sig_start = token.rfind('.').unwrap() + 1;

        for i in sig_start..token.len() {
            for bit in 0..7 {
                let mut bytes = token.clone().into_bytes();
                bytes[i] ^= 1 << bit;
                let tampered = String::from_utf8(bytes).unwrap();

                assert_eq!(
                    codec.verify(&tampered),
                    Err(VerificationError::SignatureInvalid),
                    "byte {} bit {}",
                    i,
                    bit
                );
            }
        }
    }

    #[test]
    fn test_truncated_signature_rejected() {
        let (codec, _) = codec_at(T0);
        let token = codec.issue(&identity()).unwrap();
        let without_sig = &token[..=token.rfind('.').unwrap()];

        assert_eq!(
            codec.verify(without_sig),
            Err(VerificationError::SignatureInvalid)
        );
    }

    #[test]
    fn test_wrong_secret() {
        let (codec, _) = codec_at(T0);
        let token = codec.issue(&identity()).unwrap();

        let other = CredentialCodec::new(
            &secret("wrong-secret-key-for-testing-minimum-32-chars"),
            Arc::new(ManualClock::new(T0)),
        );
        assert_eq!(other.verify(&token), Err(VerificationError::SignatureInvalid));
    }

    #[test]
    fn test_malformed_tokens() {
        let (codec, _) = codec_at(T0);

        for token in ["", "abc", "a.b", "invalid.token.here", "....", "eyJ.eyJ.sig"] {
            assert_eq!(
                codec.verify(token),
                Err(VerificationError::Malformed),
                "token {:?}",
                token
            );
        }
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let (codec, _) = codec_at(T0);
        let token = codec.issue(&identity()).unwrap();
        let parts: Vec<&str> = token.split('.').collect();

        let mut forged = identity();
        forged.is_admin = true;
        let forged_claims = Claims {
            identity: forged,
            iat: T0,
            exp: T0 + TOKEN_TTL_SECS,
        };
        let forged_payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged_claims).unwrap());
        let forged_token = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

        assert_eq!(
            codec.verify(&forged_token),
            Err(VerificationError::SignatureInvalid)
        );
    }

    #[test]
    fn test_other_algorithm_rejected() {
        let (codec, _) = codec_at(T0);
        let claims = Claims {
            identity: identity(),
            iat: T0,
            exp: T0 + 60,
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap();

        assert_eq!(codec.verify(&token), Err(VerificationError::SignatureInvalid));
    }

    #[test]
    fn test_signed_but_mistyped_payload_is_malformed() {
        let (codec, _) = codec_at(T0);
        let key = EncodingKey::from_secret(TEST_SECRET.as_bytes());

        let missing_store = json!({
            "sub": 1, "name": "x", "isAdmin": false, "accountType": 0,
            "priceListId": null, "iat": T0, "exp": T0 + 60
        });
        let unknown_account = json!({
            "sub": 1, "name": "x", "storeCode": "S", "isAdmin": false, "accountType": 7,
            "priceListId": null, "iat": T0, "exp": T0 + 60
        });

        for payload in [missing_store, unknown_account] {
            let token = encode(&Header::new(Algorithm::HS256), &payload, &key).unwrap();
            assert_eq!(codec.verify(&token), Err(VerificationError::Malformed));
        }
    }

    #[test]
    fn test_time_until_expiry() {
        let (codec, clock) = codec_at(T0);
        let claims = codec.verify(&codec.issue(&identity()).unwrap()).unwrap();

        assert_eq!(codec.time_until_expiry(&claims), TOKEN_TTL_SECS);
        clock.advance(TOKEN_TTL_SECS - 3599);
        assert_eq!(codec.time_until_expiry(&claims), 3599);
    }

    #[test]
    fn test_verification_error_codes() {
        assert_eq!(VerificationError::Malformed.code(), "MALFORMED");
        assert_eq!(VerificationError::SignatureInvalid.code(), "SIGNATURE_INVALID");
        assert_eq!(VerificationError::Expired.code(), "EXPIRED");
    }

    fn arb_identity() -> impl Strategy<Value = Identity> {
        (
            any::<i64>(),
            ".{0,40}",
            "[A-Z]{3}-[0-9]{3}",
            any::<bool>(),
            0u8..3,
            proptest::option::of(any::<i64>()),
        )
            .prop_map(|(user_id, name, store_code, is_admin, account, price_list_id)| Identity {
                user_id,
                name,
                store_code,
                is_admin,
                account_type: AccountType::try_from(account).unwrap(),
                price_list_id,
            })
    }

    proptest! {
        #[test]
        fn prop_issue_verify_preserves_identity(identity in arb_identity(), now in 0i64..4_000_000_000) {
            let (codec, _) = codec_at(now);
            let token = codec.issue(&identity).unwrap();
            let claims = codec.verify(&token).unwrap();

            prop_assert_eq!(claims.identity, identity);
            prop_assert_eq!(claims.iat, now);
            prop_assert_eq!(claims.exp, claims.iat + TOKEN_TTL_SECS);
        }
    }
}
