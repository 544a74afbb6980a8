//! 설정 관리.
//!
//! 설정은 `config/default.toml`(선택)과 `IDENTITY__` 접두사 환경 변수에서 로드됩니다.
//! 예: `IDENTITY__JWT__SECRET`, `IDENTITY__DATABASE__URL`.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use std::path::Path;
use std::time::Duration;

/// HS256 서명 키의 최소 길이 (바이트).
pub const MIN_SECRET_LEN: usize = 32;

/// 토큰 유효 시간 상한 (1년).
pub const MAX_EXPIRATION_HOURS: i64 = 24 * 365;

/// 애플리케이션 설정.
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// 서버 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 데이터베이스 설정
    #[serde(default)]
    pub database: DatabaseConfig,
    /// 토큰 서명 설정
    pub jwt: JwtSettings,
    /// 인증 처리 타임아웃
    #[serde(default)]
    pub auth: AuthSettings,
    /// 가입 알림 설정
    #[serde(default)]
    pub notifier: NotifierConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5001,
        }
    }
}

/// 데이터베이스 설정.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// PostgreSQL 연결 URL (없으면 인메모리 저장소 사용)
    pub url: Option<String>,
    /// 최대 연결 수
    pub max_connections: u32,
    /// 연결 획득 타임아웃 (초)
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            acquire_timeout_secs: 10,
        }
    }
}

/// JWT 서명 설정.
///
/// 인식하는 옵션: `secret`, `issuer`, `audience`, `expirationHours`.
#[derive(Deserialize)]
pub struct JwtSettings {
    /// HMAC 서명 키 (로그에 절대 출력하지 않음)
    #[serde(deserialize_with = "deserialize_secret")]
    pub secret: SecretString,
    pub issuer: String,
    pub audience: String,
    /// 토큰 유효 시간 (시간)
    #[serde(
        default = "default_expiration_hours",
        alias = "expirationHours",
        alias = "expirationhours"
    )]
    pub expiration_hours: i64,
}

fn default_expiration_hours() -> i64 {
    24
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(SecretString::new(raw.into()))
}

impl JwtSettings {
    /// 새 JWT 설정을 생성합니다.
    pub fn new(
        secret: impl Into<String>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
        expiration_hours: i64,
    ) -> Self {
        Self {
            secret: SecretString::new(secret.into().into()),
            issuer: issuer.into(),
            audience: audience.into(),
            expiration_hours,
        }
    }

    /// 서명 키 강도와 유효 시간을 검증합니다.
    pub fn validate(&self) -> Result<(), String> {
        if self.secret.expose_secret().len() < MIN_SECRET_LEN {
            return Err(format!(
                "jwt.secret must be at least {} bytes",
                MIN_SECRET_LEN
            ));
        }
        if self.issuer.trim().is_empty() || self.audience.trim().is_empty() {
            return Err("jwt.issuer and jwt.audience must not be empty".to_string());
        }
        if !(1..=MAX_EXPIRATION_HOURS).contains(&self.expiration_hours) {
            return Err(format!(
                "jwt.expiration_hours must be between 1 and {}",
                MAX_EXPIRATION_HOURS
            ));
        }
        Ok(())
    }

    /// 토큰 유효 시간.
    pub fn expiration(&self) -> chrono::Duration {
        chrono::Duration::hours(self.expiration_hours)
    }
}

impl std::fmt::Debug for JwtSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSettings")
            .field("secret", &"[REDACTED]")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("expiration_hours", &self.expiration_hours)
            .finish()
    }
}

/// 인증 처리 중 외부 호출 타임아웃.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// 저장소 호출 타임아웃 (밀리초)
    pub store_timeout_ms: u64,
    /// 가입 알림 발행 타임아웃 (밀리초)
    pub notifier_timeout_ms: u64,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            store_timeout_ms: 5_000,
            notifier_timeout_ms: 3_000,
        }
    }
}

impl AuthSettings {
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    pub fn notifier_timeout(&self) -> Duration {
        Duration::from_millis(self.notifier_timeout_ms)
    }
}

/// 가입 알림 설정.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotifierConfig {
    /// 활성화 여부
    pub enabled: bool,
    /// 이벤트를 POST할 웹훅 URL (없으면 로그로만 기록)
    pub webhook_url: Option<String>,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            webhook_url: None,
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일은 없어도 되며, 환경 변수가 파일 값을 덮어씁니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // 기본값으로 시작
            .set_default("jwt.issuer", "identity-service")?
            .set_default("jwt.audience", "pati-platform")?
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("IDENTITY")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.jwt.validate().map_err(config::ConfigError::Message)?;
        Ok(config)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load("config/default.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-for-jwt-testing-minimum-32-chars";

    #[test]
    fn test_jwt_settings_debug_redacts_secret() {
        let settings = JwtSettings::new(SECRET, "iss", "aud", 1);
        let debug = format!("{:?}", settings);
        assert!(!debug.contains(SECRET));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_jwt_settings_validation() {
        assert!(JwtSettings::new(SECRET, "iss", "aud", 1).validate().is_ok());
        assert!(JwtSettings::new("short", "iss", "aud", 1).validate().is_err());
        assert!(JwtSettings::new(SECRET, "", "aud", 1).validate().is_err());
        assert!(JwtSettings::new(SECRET, "iss", "aud", 0).validate().is_err());
    }

    #[test]
    fn test_jwt_expiration_upper_bound() {
        assert!(JwtSettings::new(SECRET, "iss", "aud", MAX_EXPIRATION_HOURS)
            .validate()
            .is_ok());
        assert!(JwtSettings::new(SECRET, "iss", "aud", MAX_EXPIRATION_HOURS + 1)
            .validate()
            .is_err());
        assert!(JwtSettings::new(SECRET, "iss", "aud", 10_000_000_000)
            .validate()
            .is_err());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!(
            "identity-config-{}.toml",
            std::process::id()
        ));
        std::fs::write(
            &path,
            format!(
                r#"
[server]
host = "0.0.0.0"
port = 8080

[jwt]
secret = "{SECRET}"
issuer = "pati-identity"
audience = "pati-clients"
expirationHours = 6

[auth]
store_timeout_ms = 250
notifier_timeout_ms = 100
"#
            ),
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.jwt.issuer, "pati-identity");
        assert_eq!(config.jwt.expiration_hours, 6);
        assert_eq!(config.jwt.secret.expose_secret(), SECRET);
        assert_eq!(config.auth.store_timeout(), Duration::from_millis(250));
        // 누락된 섹션은 기본값
        assert!(config.database.url.is_none());
        assert!(config.notifier.enabled);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_rejects_weak_secret() {
        let path = std::env::temp_dir().join(format!(
            "identity-config-weak-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[jwt]\nsecret = \"short\"\n").unwrap();

        let result = AppConfig::load(&path);
        std::fs::remove_file(&path).ok();

        assert!(result.is_err());
    }
}
