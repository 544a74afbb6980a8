//! 비밀번호 해싱 유틸리티.
//!
//! Argon2 기반 비밀번호 해싱 및 검증.
//! 해싱은 CPU 집약적이므로 비동기 경로에서는 `spawn_blocking` 래퍼를 사용합니다.

use argon2::{
    password_hash::{
        self, rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};
use once_cell::sync::Lazy;

/// 비밀번호 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("비밀번호 해싱 실패")]
    HashingFailed,
    #[error("비밀번호 검증 실패")]
    VerificationFailed,
    #[error("잘못된 해시 형식")]
    InvalidHashFormat,
    #[error("해싱 작업 실행 실패: {0}")]
    TaskFailed(String),
}

/// 존재하지 않는 계정으로 로그인할 때 비교 대상으로 쓰는 해시.
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| hash_password("identity-dummy-password").ok());

/// 새 해시에 사용하는 Argon2id 인스턴스 (m=19456 KiB, t=2, p=1).
///
/// 검증은 PHC 문자열에 기록된 파라미터를 따르므로 파라미터를 바꿔도 기존 해시는 유효합니다.
fn hasher() -> Argon2<'static> {
    Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default())
}

/// 비밀번호를 Argon2id PHC 문자열로 해싱합니다.
///
/// ```rust,ignore
/// let hash = hash_password("my_secure_password").unwrap();
/// // "$argon2id$v=19$m=19456,t=2,p=1$..."
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    hasher()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| PasswordError::HashingFailed)
}

/// 저장된 해시와 비밀번호를 비교합니다.
pub fn verify_password(password: &str, hash: &str) -> Result<(), PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHashFormat)?;

    hasher()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|e| match e {
            password_hash::Error::Password => PasswordError::VerificationFailed,
            _ => PasswordError::InvalidHashFormat,
        })
}

async fn run_blocking<T, F>(f: F) -> Result<T, PasswordError>
where
    F: FnOnce() -> Result<T, PasswordError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| PasswordError::TaskFailed(e.to_string()))?
}

/// [`hash_password`]를 블로킹 스레드 풀에서 실행합니다.
pub async fn hash_password_blocking(password: String) -> Result<String, PasswordError> {
    run_blocking(move || hash_password(&password)).await
}

/// [`verify_password`]를 블로킹 스레드 풀에서 실행합니다.
pub async fn verify_password_blocking(password: String, hash: String) -> Result<(), PasswordError> {
    run_blocking(move || verify_password(&password, &hash)).await
}

/// 더미 해시에 대해 검증을 수행하고 결과는 버립니다.
///
/// 계정이 없는 로그인도 실제 검증과 비슷한 시간을 소비합니다.
/// 더미 해시의 최초 생성도 블로킹 스레드 풀에서 일어납니다.
pub async fn burn_verification(password: String) {
    let _ = run_blocking(move || match DUMMY_HASH.as_deref() {
        Some(hash) => verify_password(&password, hash),
        None => Err(PasswordError::HashingFailed),
    })
    .await;
}

/// 더미 해시를 미리 생성합니다. 서버 시작 시 호출합니다.
pub async fn warm_dummy_hash() -> Result<(), PasswordError> {
    run_blocking(|| {
        DUMMY_HASH
            .as_deref()
            .map(|_| ())
            .ok_or(PasswordError::HashingFailed)
    })
    .await
}
