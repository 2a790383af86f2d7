use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("map engine ready signal dropped before the engine became ready")]
    NeverReady,

    #[error("source already exists: {id}")]
    DuplicateSource { id: String },

    #[error("layer already exists: {id}")]
    DuplicateLayer { id: String },

    #[error("layer {layer_id} references unknown source {source_id}")]
    UnknownSource { layer_id: String, source_id: String },

    #[error("source {id} is still used by layer {layer_id}")]
    SourceInUse { id: String, layer_id: String },

    #[error("map engine rejected {operation}: {message}")]
    Engine {
        operation: &'static str,
        message: String,
    },
}
