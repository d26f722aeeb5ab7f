#[derive(Debug, thiserror::Error)]
pub enum CookieError {
    #[error("Invalid default path: {0}")]
    InvalidDefaultPath(String),

    #[error("Default domain must not be empty")]
    EmptyDefaultDomain,
}
