/// Open Packaging Conventions (OPC) container layer.
///
/// Opens ZIP-based packages, exposes their parts by name and re-emits them
/// with selected parts replaced while every other entry is copied through
/// without re-encoding.
pub mod constants;
pub mod error;
pub mod package;
pub mod packuri;
mod phys_pkg;

// Re-export commonly used types
pub use error::PackageError;
pub use package::{Package, Part};
pub use packuri::PackURI;
