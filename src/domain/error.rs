//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::RecordId;

/// Domain errors represent violations of the record model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("cannot build an index from an empty record list")]
    EmptyInput,

    #[error("duplicate record id: {0}")]
    DuplicateId(RecordId),

    #[error("record {id} references parent {parent}, which is not in the tree")]
    OrphanRecord { id: RecordId, parent: RecordId },

    #[error("root record {id} has parent {parent}, expected the root sentinel")]
    InvalidRoot { id: RecordId, parent: RecordId },

    #[error("record not found: {0}")]
    NotFound(RecordId),
}
