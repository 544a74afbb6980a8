//! JWT 토큰 처리.
//!
//! HS256으로 서명된 Access Token 발급 및 검증.
//! 검증 실패는 원인과 관계없이 [`TokenError::Invalid`] 하나로 수렴합니다.

use chrono::{DateTime, Duration, Utc};
use identity_core::{JwtSettings, RoleName, UserId};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Deserializer, Serialize};

/// JWT Access Token 페이로드.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject - 사용자 ID
    pub sub: String,
    pub email: String,
    /// 표시 이름
    pub name: String,
    /// JWT ID - 발급마다 새로 생성
    pub jti: String,
    /// 역할 이름 목록
    #[serde(default, deserialize_with = "one_or_many")]
    pub role: Vec<String>,
    pub iss: String,
    pub aud: String,
    /// Issued At (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

impl TokenClaims {
    /// Subject를 사용자 ID로 파싱합니다.
    pub fn user_id(&self) -> Option<UserId> {
        self.sub.parse().ok()
    }

    /// 특정 역할을 가지는지 확인.
    pub fn has_role(&self, role: RoleName) -> bool {
        self.role.iter().any(|r| r == role.as_str())
    }
}

/// `role` 클레임은 배열 또는 단일 문자열일 수 있음.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(role) => vec![role],
        OneOrMany::Many(roles) => roles,
    })
}

/// 토큰에 담을 사용자 정보.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimSet {
    pub user_id: UserId,
    pub email: String,
    pub name: String,
    pub roles: Vec<String>,
}

/// 발급된 토큰.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// 인코딩된 JWT 문자열
    pub token: String,
    pub jti: String,
    pub expires_at: DateTime<Utc>,
}

/// JWT 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("잘못된 JWT 설정: {0}")]
    Configuration(String),
    #[error("토큰 서명 실패: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
    #[error("만료 시각 계산 범위 초과")]
    ExpirationOverflow,
    #[error("유효하지 않은 토큰")]
    Invalid,
}

/// 토큰 발급/검증 서비스.
///
/// 정적 설정(서명 키, issuer, audience, 유효 시간)만 보유합니다.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
    expiration: Duration,
}

impl TokenService {
    /// JWT 설정에서 서비스를 생성합니다.
    pub fn new(settings: &JwtSettings) -> Result<Self, TokenError> {
        settings.validate().map_err(TokenError::Configuration)?;

        let secret = settings.secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_issuer(&[settings.issuer.as_str()]);
        validation.set_audience(&[settings.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            issuer: settings.issuer.clone(),
            audience: settings.audience.clone(),
            expiration: settings.expiration(),
        })
    }

    /// 현재 시각 기준으로 토큰을 발급합니다.
    pub fn issue(&self, claims: &ClaimSet) -> Result<IssuedToken, TokenError> {
        self.issue_at(claims, Utc::now())
    }

    /// 주어진 발급 시각 기준으로 토큰을 발급합니다.
    pub fn issue_at(
        &self,
        claims: &ClaimSet,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError> {
        let expires_at = issued_at
            .checked_add_signed(self.expiration)
            .ok_or(TokenError::ExpirationOverflow)?;
        let jti = uuid::Uuid::new_v4().to_string();

        let payload = TokenClaims {
            sub: claims.user_id.to_string(),
            email: claims.email.clone(),
            name: claims.name.clone(),
            jti: jti.clone(),
            role: claims.roles.clone(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &payload, &self.encoding_key)
            .map_err(TokenError::Signing)?;

        Ok(IssuedToken {
            token,
            jti,
            expires_at,
        })
    }

    /// 토큰을 검증하고 클레임을 반환합니다.
    ///
    /// 서명, issuer, audience, 만료(허용 오차 0)를 모두 확인합니다.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| TokenError::Invalid)
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("expiration_secs", &self.expiration.num_seconds())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
    use proptest::prelude::*;

    const TEST_SECRET: &str = "test-secret-key-for-jwt-testing-minimum-32-chars";

    fn service() -> TokenService {
        TokenService::new(&JwtSettings::new(TEST_SECRET, "identity-service", "pati-platform", 24))
            .unwrap()
    }

    fn claim_set() -> ClaimSet {
        ClaimSet {
            user_id: 42,
            email: "a@x.com".to_string(),
            name: "A B".to_string(),
            roles: vec!["bagisci".to_string()],
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let tokens = service();
        let issued = tokens.issue(&claim_set()).unwrap();

        let claims = tokens.verify(&issued.token).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.user_id(), Some(42));
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.name, "A B");
        assert_eq!(claims.role, vec!["bagisci"]);
        assert_eq!(claims.jti, issued.jti);
        assert_eq!(claims.iss, "identity-service");
        assert_eq!(claims.aud, "pati-platform");
        assert_eq!(claims.exp, issued.expires_at.timestamp());
        assert!(claims.has_role(RoleName::Bagisci));
        assert!(!claims.has_role(RoleName::Admin));
    }

    #[test]
    fn test_jti_unique_per_issuance() {
        let tokens = service();
        let first = tokens.issue(&claim_set()).unwrap();
        let second = tokens.issue(&claim_set()).unwrap();

        assert_ne!(first.jti, second.jti);
        assert_ne!(first.token, second.token);
    }

    #[test]
    fn test_token_valid_just_before_expiry() {
        let tokens = service();
        let issued_at = Utc::now() - Duration::hours(24) + Duration::seconds(30);
        let issued = tokens.issue_at(&claim_set(), issued_at).unwrap();

        assert!(tokens.verify(&issued.token).is_ok());
    }

    #[test]
    fn test_token_rejected_one_second_after_expiry() {
        let tokens = service();
        // 만료 시각이 현재보다 1초 이전
        let issued_at = Utc::now() - Duration::hours(24) - Duration::seconds(1);
        let issued = tokens.issue_at(&claim_set(), issued_at).unwrap();

        assert!(matches!(tokens.verify(&issued.token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_flipped_signature_bit_rejected() {
        let tokens = service();
        let issued = tokens.issue(&claim_set()).unwrap();

        let (signing_input, signature) = issued.token.rsplit_once('.').unwrap();
        let mut bytes = URL_SAFE_NO_PAD.decode(signature).unwrap();
        bytes[0] ^= 0x01;
        let tampered = format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(bytes));

        assert!(matches!(tokens.verify(&tampered), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_issuer_or_audience_mismatch_rejected() {
        let tokens = service();

        let other_issuer =
            TokenService::new(&JwtSettings::new(TEST_SECRET, "someone-else", "pati-platform", 24))
                .unwrap();
        let issued = other_issuer.issue(&claim_set()).unwrap();
        assert!(matches!(tokens.verify(&issued.token), Err(TokenError::Invalid)));

        let other_audience =
            TokenService::new(&JwtSettings::new(TEST_SECRET, "identity-service", "other-app", 24))
                .unwrap();
        let issued = other_audience.issue(&claim_set()).unwrap();
        assert!(matches!(tokens.verify(&issued.token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let other = TokenService::new(&JwtSettings::new(
            "wrong-secret-key-for-testing-minimum-32-chars",
            "identity-service",
            "pati-platform",
            24,
        ))
        .unwrap();
        let issued = other.issue(&claim_set()).unwrap();

        assert!(matches!(service().verify(&issued.token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_malformed_token_rejected() {
        let tokens = service();
        assert!(matches!(tokens.verify("invalid.token.here"), Err(TokenError::Invalid)));
        assert!(matches!(tokens.verify(""), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_weak_secret_rejected() {
        let result = TokenService::new(&JwtSettings::new("short", "iss", "aud", 1));
        assert!(matches!(result, Err(TokenError::Configuration(_))));
    }

    #[test]
    fn test_excessive_lifetime_rejected_at_construction() {
        let result = TokenService::new(&JwtSettings::new(TEST_SECRET, "iss", "aud", 10_000_000_000));
        assert!(matches!(result, Err(TokenError::Configuration(_))));
    }

    #[test]
    fn test_expiry_overflow_is_error() {
        let tokens = service();
        let result = tokens.issue_at(&claim_set(), DateTime::<Utc>::MAX_UTC);
        assert!(matches!(result, Err(TokenError::ExpirationOverflow)));
    }

    #[test]
    fn test_single_string_role_accepted() {
        let json = serde_json::json!({
            "sub": "7",
            "email": "a@x.com",
            "name": "A B",
            "jti": "abc",
            "role": "admin",
            "iss": "identity-service",
            "aud": "pati-platform",
            "iat": 0,
            "exp": 1
        });
        let claims: TokenClaims = serde_json::from_value(json).unwrap();
        assert_eq!(claims.role, vec!["admin"]);

        let serialized = serde_json::to_value(&claims).unwrap();
        assert!(serialized["role"].is_array());
    }

    #[test]
    fn test_missing_role_is_empty() {
        let json = serde_json::json!({
            "sub": "7", "email": "a@x.com", "name": "A B", "jti": "abc",
            "iss": "identity-service", "aud": "pati-platform", "iat": 0, "exp": 1
        });
        let claims: TokenClaims = serde_json::from_value(json).unwrap();
        assert!(claims.role.is_empty());
    }

    #[test]
    fn test_debug_hides_secret() {
        let debug = format!("{:?}", service());
        assert!(!debug.contains(TEST_SECRET));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_claims_round_trip(
            user_id in 1i64..i64::MAX,
            email in "[a-z0-9.]{1,16}@[a-z]{1,8}\\.com",
            name in "[\\p{L} ]{1,24}",
            roles in proptest::collection::vec("[a-z_]{1,12}", 0..4),
        ) {
            let tokens = service();
            let claims = ClaimSet { user_id, email, name, roles };

            let issued = tokens.issue(&claims).unwrap();
            let verified = tokens.verify(&issued.token).unwrap();

            prop_assert_eq!(verified.user_id(), Some(claims.user_id));
            prop_assert_eq!(verified.email, claims.email);
            prop_assert_eq!(verified.name, claims.name);
            prop_assert_eq!(verified.role, claims.roles);
        }
    }
}
