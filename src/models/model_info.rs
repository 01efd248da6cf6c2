use serde::{Deserialize, Serialize};

/// Identifier of a model served from the data folder.
///
/// The id is the name of the model's sub-folder and the path segment of the
/// per-model API routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
}
