use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("request URL is empty")]
    EmptyUrl,
    #[error("request name is empty")]
    EmptyName,
    #[error("unknown body type: {0}")]
    UnknownBodyType(String),
}
