//! Error types for the `gridrev-core` crate.

use crate::traits::ModelError;

/// Errors that can occur while processing one work item.
///
/// The dispatch loop isolates these per item: a failed item is logged and
/// the loop continues with the next one.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    /// The revision model failed.
    #[error("model error: {source}")]
    Model {
        /// The underlying model error.
        #[from]
        source: ModelError,
    },
}
