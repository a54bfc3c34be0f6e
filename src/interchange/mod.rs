//! Data interchange for exporting and importing results
//!
//! The CSV document is the one persisted artifact of the service; its shape
//! carries the competition mode so imports restore the right event set.

pub mod codec;

// Re-export commonly used types
pub use codec::{CsvCodec, MODE_TAG, NAME_COLUMN};
