use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CoreError {
    /// A required field was missing or blank
    #[error("{field} is required")]
    Validation { field: &'static str },
}

pub type Result<T> = std::result::Result<T, CoreError>;
