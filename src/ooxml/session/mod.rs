/// Document sessions.
///
/// A session opens one package, parses the body parts of its flavor,
/// enumerates their text slots, renders and re-segments plain text, applies
/// replacements (or text migrated from another document) and emits the
/// patched package.
pub mod batch;
pub mod editor;
pub mod migrate;
pub mod options;
pub mod plain_text;
pub mod rewrite;

pub use batch::{BatchJob, BatchOutcome, process_batch};
pub use editor::{ReplacementMode, Session};
pub use migrate::SlotMapping;
pub use options::{MismatchPolicy, SessionOptions};
pub use rewrite::TextRewriter;
