use thiserror::Error;

/// 설정 검증 에러
/// Configuration validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// URL 형식이 잘못됨
    /// Malformed URL setting
    #[error("Invalid {name}: {value} ({reason})")]
    InvalidUrl {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// 0이 될 수 없는 값이 0
    /// Value must be greater than zero
    #[error("{name} must be greater than zero")]
    MustBePositive { name: &'static str },
}
