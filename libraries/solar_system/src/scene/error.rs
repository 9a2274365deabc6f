use thiserror::Error;

#[derive(Debug, Error)]
pub enum SceneLoadError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] serde_yaml::Error),
    #[error("Body name used more than once: {0:?}")]
    DuplicateBody(String),
    #[error("Invalid body {name:?}: {reason}")]
    InvalidBody { name: String, reason: &'static str },
}
