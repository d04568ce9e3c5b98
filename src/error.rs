use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChartError {
    /// A tree node reached layout without a primary entry. Always a builder bug.
    #[error("tree node in generation {generation} has no primary individual")]
    MalformedNode { generation: i32 },
    #[error("unknown individual: {0}")]
    UnknownIndi(String),
    #[error("unknown family: {0}")]
    UnknownFamily(String),
    #[error("family {0} has no known spouse")]
    EmptyFamily(String),
    #[error("cannot measure text {text:?}: {reason}")]
    Measurement { text: String, reason: String },
}

pub type Result<T> = std::result::Result<T, ChartError>;
