use crate::config::AppConfig;
use crate::errors::AsignaTrackError;
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};

// 按配置构建 Argon2id 实例
fn hasher() -> Result<Argon2<'static>, AsignaTrackError> {
    let argon2 = &AppConfig::get().argon2;
    let params = Params::new(
        argon2.memory_cost,
        argon2.time_cost,
        argon2.parallelism,
        None,
    )
    .map_err(|e| AsignaTrackError::validation(format!("Argon2 参数错误: {e}")))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// 哈希密码
pub fn hash_password(password: &str) -> Result<String, AsignaTrackError> {
    let salt = SaltString::generate(&mut OsRng);
    hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AsignaTrackError::validation(format!("密码哈希失败: {e}")))
}

/// 验证密码
///
/// 参数取自 PHC 串本身，历史哈希在调参后仍可验证。
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed_hash) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok(),
        Err(_) => false,
    }
}
