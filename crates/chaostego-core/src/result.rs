use crate::error::ChaostegoError;

pub type Result<T> = std::result::Result<T, ChaostegoError>;
