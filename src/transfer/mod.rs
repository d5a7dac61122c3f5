//! Transfer module for the submission client
//!
//! Handles reading source files and framing them onto the control stream.

pub mod file_ops;
pub mod results;

// Re-export key types and functions
pub use file_ops::{display_path, load_source_file, write_file_frame};
pub use results::SourceFile;
