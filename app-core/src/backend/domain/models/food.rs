/// Rejections of catalog edits. All of them are user-facing and leave the
/// catalog untouched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FoodValidationError {
    #[error("Food name cannot be empty")]
    EmptyName,
    #[error("Food name cannot exceed {max} characters")]
    NameTooLong { max: usize },
    #[error("A food named '{0}' already exists")]
    DuplicateName(String),
    #[error("Default foods cannot be deleted")]
    CannotDeleteDefault,
    #[error("Food not found: {0}")]
    NotFound(String),
}
