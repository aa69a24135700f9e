pub mod editing;
pub mod error;
pub mod io;
pub mod models;
pub mod settings;

// Re-export key types for easier usage
pub use editing::*;
pub use error::{EditorError, UploadError};
pub use io::{IoError, LoadIssue, LoadedDocument};
pub use models::*;
pub use settings::EditorSettings;
