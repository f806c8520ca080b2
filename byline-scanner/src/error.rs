use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Timestamp node is detached from its document")]
    DetachedNode,

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ResolveError>;
