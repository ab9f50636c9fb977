//! Seam for the external text generator.

use crate::ooxml::error::{DocumentError, Result};
use crate::ooxml::session::editor::{ReplacementMode, Session};
use std::fmt::Display;
use std::future::Future;

/// Produces replacement text for a document's plain text.
///
/// The input is the output of [`Session::extract_plain_text`]; the result is
/// expected in the same format.
pub trait TextRewriter {
    type Error: Display;

    fn rewrite(&self, text: &str) -> impl Future<Output = std::result::Result<String, Self::Error>> + Send;
}

impl Session {
    /// Extract the plain text, hand it to `rewriter` and apply the result.
    ///
    /// The trees are not touched while the rewriter runs; a failing rewriter
    /// leaves the session unchanged.
    pub async fn rewrite_with<R: TextRewriter>(&mut self, rewriter: &R) -> Result<ReplacementMode> {
        let text = self.extract_plain_text();
        let rewritten = rewriter
            .rewrite(&text)
            .await
            .map_err(|e| DocumentError::Rewriter(e.to_string()))?;
        self.apply_plain_text(&rewritten)
    }
}
