pub mod color;
pub mod document;
pub mod editing;
pub mod error;
pub mod format;
pub mod service;
pub mod tools;
pub mod wire;

// Re-export key types for easier usage
pub use color::{RgbColor, parse_hex_color};
pub use document::{DocumentSnapshot, NativeRange, StructuralElement};
pub use editing::{
    Batch, EditIntent, EditOperation, FlatText, StyleField, StyleRequest, StyleUpdate, TextStyle,
    build_style, find_range, linearize, plan,
};
pub use error::{Operation, ToolError};
pub use service::{DocumentService, InMemoryDocumentService, ServiceError};
pub use tools::DocumentTools;
