use pwmgen_core::TableError;
use thiserror::Error;

/// Wavedrom conversion error.
#[derive(Debug, Error)]
pub enum WavedromError {
    /// The repaired text still is not JSON.
    #[error("repaired diagram is not valid JSON: {source}")]
    Json {
        /// Parser error.
        source: serde_json::Error,
        /// Text after repair, for diagnosis.
        repaired: String,
    },

    /// The root is not an object.
    #[error("diagram root must be an object")]
    NotADiagram,

    /// A data symbol found no label left to consume.
    #[error("signal '{signal}' ran out of data labels at position {position}")]
    MissingData {
        /// Signal name.
        signal: String,
        /// Zero-based position in the wave string.
        position: usize,
    },

    /// Bit width outside the supported range.
    #[error("unsupported bit width {0} (supported: 1..=32)")]
    UnsupportedWidth(u32),

    /// Table assembly failed (e.g. duplicate signal names).
    #[error(transparent)]
    Table(#[from] TableError),
}
