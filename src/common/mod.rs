//! Common utilities shared by the package, markup and text layers.

pub mod bom;
pub mod xml;
