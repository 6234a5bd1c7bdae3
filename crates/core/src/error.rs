use crate::types::DbId;
use crate::validation::FieldErrors;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed for {} field(s)", .0.len())]
    Validation(FieldErrors),

    #[error("Edit conflict on {entity} with id {id}")]
    EditConflict { entity: &'static str, id: DbId },

    #[error("Internal error: {0}")]
    Internal(String),
}
