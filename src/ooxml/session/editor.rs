//! Document session: one package, its parsed body parts and their text slots.

use crate::ooxml::error::{DocumentError, Result};
use crate::ooxml::markup::{self, MarkupDocument};
use crate::ooxml::opc::Package;
use crate::ooxml::session::options::{MismatchPolicy, SessionOptions};
use crate::ooxml::session::plain_text;
use crate::ooxml::template;
use crate::ooxml::text::{self, Flavor, TextSlot};
use std::collections::HashMap;
use std::path::Path;

/// How plain text was mapped onto the slots by [`Session::apply_plain_text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplacementMode {
    /// One segment per slot
    Aligned,
    /// Segment count did not match; the whole text went into the first slot
    Collapsed,
}

/// A parsed body part.
#[derive(Debug)]
struct BodyPart {
    name: String,
    document: MarkupDocument,
    /// Set once a write actually changed a slot's text
    dirty: bool,
}

/// An editing session over one document.
///
/// The session owns the package, the parsed trees of the flavor's body parts
/// and the slots pointing into them. Nothing is shared between sessions.
///
/// # Example
///
/// ```
/// use ooxml_splice::{Flavor, Session};
///
/// let mut session = Session::blank(Flavor::WordProcessing, "Hello\n\nWorld")?;
/// assert_eq!(session.extract_plain_text(), "Hello\n\nWorld");
///
/// session.apply_replacements(&["Hi", "World"])?;
/// let bytes = session.emit()?;
///
/// let reopened = Session::open(bytes, Flavor::WordProcessing)?;
/// assert_eq!(reopened.extract_plain_text(), "Hi\n\nWorld");
/// # Ok::<(), ooxml_splice::DocumentError>(())
/// ```
#[derive(Debug)]
pub struct Session {
    flavor: Flavor,
    options: SessionOptions,
    package: Package,
    parts: Vec<BodyPart>,
    slots: Vec<TextSlot>,
    /// Index into `parts` for each slot
    owners: Vec<usize>,
}

impl Session {
    /// Open a package with default options.
    pub fn open(bytes: Vec<u8>, flavor: Flavor) -> Result<Self> {
        Self::open_with(bytes, flavor, SessionOptions::default())
    }

    /// Open a package.
    ///
    /// # Errors
    /// Container and markup errors of the package or its body parts, and
    /// [`DocumentError::UnsupportedFlavor`] when a part the flavor requires
    /// is missing.
    pub fn open_with(bytes: Vec<u8>, flavor: Flavor, options: SessionOptions) -> Result<Self> {
        let package = Package::from_bytes(bytes)?;
        Self::from_package(package, flavor, options)
    }

    /// Read a package from disk and open it.
    pub fn open_file<P: AsRef<Path>>(path: P, flavor: Flavor) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::open(bytes, flavor)
    }

    /// Open a package, inferring the flavor from the parts it contains.
    pub fn detect(bytes: Vec<u8>) -> Result<Self> {
        Self::detect_with(bytes, SessionOptions::default())
    }

    /// [`Session::detect`] with explicit options.
    pub fn detect_with(bytes: Vec<u8>, options: SessionOptions) -> Result<Self> {
        let package = Package::from_bytes(bytes)?;
        let flavor = Flavor::detect(&package).ok_or(DocumentError::UnknownFlavor)?;
        Self::from_package(package, flavor, options)
    }

    /// Create a new document from plain text.
    ///
    /// Word-processing text becomes one paragraph per blank-line separated
    /// block. Presentation text is split into slides on `Slide N:` header
    /// lines, one text paragraph per line.
    pub fn blank(flavor: Flavor, text: &str) -> Result<Self> {
        Self::blank_with(flavor, text, SessionOptions::default())
    }

    /// [`Session::blank`] with explicit options.
    pub fn blank_with(flavor: Flavor, text: &str, options: SessionOptions) -> Result<Self> {
        let package = template::build(flavor, text);
        Self::from_package(package, flavor, options)
    }

    /// Wrap an already opened package.
    pub fn from_package(package: Package, flavor: Flavor, options: SessionOptions) -> Result<Self> {
        let required = flavor.table().required_part;
        if !package.contains(required) {
            return Err(DocumentError::UnsupportedFlavor {
                flavor,
                missing: required.to_string(),
            });
        }

        let mut parts = Vec::new();
        let mut slots = Vec::new();
        let mut owners = Vec::new();

        for name in flavor.body_parts(&package) {
            let bytes = package.part(&name)?;
            let document = markup::parse(bytes).map_err(|e| DocumentError::markup(&name, e))?;

            for mut slot in text::enumerate_slots(&name, &document, flavor) {
                slot.index = slots.len();
                slots.push(slot);
                owners.push(parts.len());
            }
            parts.push(BodyPart {
                name,
                document,
                dirty: false,
            });
        }

        log::debug!(
            "opened {} session: {} body parts, {} slots",
            flavor,
            parts.len(),
            slots.len()
        );

        Ok(Self {
            flavor,
            options,
            package,
            parts,
            slots,
            owners,
        })
    }

    #[inline]
    pub fn flavor(&self) -> Flavor {
        self.flavor
    }

    #[inline]
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// The underlying package as opened.
    #[inline]
    pub fn package(&self) -> &Package {
        &self.package
    }

    /// Names of the parsed body parts, in reading order.
    pub fn body_parts(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|p| p.name.as_str())
    }

    /// The current tree of a body part.
    pub fn document(&self, part: &str) -> Option<&MarkupDocument> {
        self.parts.iter().find(|p| p.name == part).map(|p| &p.document)
    }

    /// All slots in document order (slide order for presentations).
    #[inline]
    pub fn slots(&self) -> &[TextSlot] {
        &self.slots
    }

    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of slides; zero for word-processing documents.
    pub fn slide_count(&self) -> usize {
        match self.flavor {
            Flavor::Presentation => self.parts.len(),
            Flavor::WordProcessing => 0,
        }
    }

    /// Current text of slot `index`.
    pub fn read_text(&self, index: usize) -> Result<&str> {
        let (slot, owner) = self.resolve(index)?;
        text::read_text(&self.parts[owner].document, slot)
    }

    /// Replace the text of slot `index`; returns whether it changed.
    pub fn write_text(&mut self, index: usize, text: &str) -> Result<bool> {
        let (Some(slot), Some(&owner)) = (self.slots.get(index), self.owners.get(index)) else {
            return Err(slot_out_of_range(index));
        };
        let part = &mut self.parts[owner];
        let changed = text::write_text_with(
            &mut part.document,
            slot,
            text,
            self.options.preserve_edge_whitespace,
        )?;
        part.dirty |= changed;
        Ok(changed)
    }

    fn resolve(&self, index: usize) -> Result<(&TextSlot, usize)> {
        match (self.slots.get(index), self.owners.get(index)) {
            (Some(slot), Some(&owner)) => Ok((slot, owner)),
            _ => Err(slot_out_of_range(index)),
        }
    }

    /// Render the slot texts as plain text.
    ///
    /// Word-processing slots are separated by a blank line. Presentations are
    /// rendered per slide as `Slide N:` followed by one line per slot.
    pub fn extract_plain_text(&self) -> String {
        match self.flavor {
            Flavor::WordProcessing => plain_text::render_paragraphs(self.current_texts()),
            Flavor::Presentation => {
                let mut slides: Vec<Vec<&str>> = vec![Vec::new(); self.parts.len()];
                for (text, &owner) in self.current_texts().zip(&self.owners) {
                    slides[owner].push(text);
                }
                plain_text::render_slides(&slides)
            },
        }
    }

    fn current_texts(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().zip(&self.owners).map(|(slot, &owner)| {
            text::read_text(&self.parts[owner].document, slot).unwrap_or(slot.original_text.as_str())
        })
    }

    /// Split plain text in the format of [`Session::extract_plain_text`] into
    /// one segment per slot.
    pub fn segments(&self, text: &str) -> Vec<String> {
        match self.flavor {
            Flavor::WordProcessing => plain_text::split_paragraphs(text, self.slots.len()),
            Flavor::Presentation => plain_text::split_slides(text, &self.slots_per_slide()),
        }
    }

    pub(crate) fn slots_per_slide(&self) -> Vec<usize> {
        let mut counts = vec![0; self.parts.len()];
        for &owner in &self.owners {
            counts[owner] += 1;
        }
        counts
    }

    /// Write one replacement per slot, in slot order.
    ///
    /// # Errors
    /// [`DocumentError::SlotCountMismatch`] when the number of replacements
    /// differs from the number of slots and [`DocumentError::IllegalCharacter`]
    /// when one of them cannot be stored in XML; nothing is written in either
    /// case.
    pub fn apply_replacements<S: AsRef<str>>(&mut self, replacements: &[S]) -> Result<()> {
        if replacements.len() != self.slots.len() {
            return Err(DocumentError::SlotCountMismatch {
                expected: self.slots.len(),
                actual: replacements.len(),
            });
        }
        for (slot, replacement) in self.slots.iter().zip(replacements) {
            text::check_text(slot, replacement.as_ref())?;
        }

        let mut changed = 0usize;
        for (index, replacement) in replacements.iter().enumerate() {
            if self.write_text(index, replacement.as_ref())? {
                changed += 1;
            }
        }
        log::debug!("applied {} replacements, {} changed", replacements.len(), changed);
        Ok(())
    }

    /// Segment `text` and apply it.
    ///
    /// When the segment count does not match the slot count, the configured
    /// [`MismatchPolicy`] decides: the default writes the whole text into the
    /// first slot and leaves the others as they are. A document without
    /// slots cannot absorb a mismatch.
    pub fn apply_plain_text(&mut self, text: &str) -> Result<ReplacementMode> {
        let segments = self.segments(text);
        if segments.len() == self.slots.len() {
            self.apply_replacements(&segments)?;
            return Ok(ReplacementMode::Aligned);
        }

        let mismatch = DocumentError::SlotCountMismatch {
            expected: self.slots.len(),
            actual: segments.len(),
        };
        if self.slots.is_empty() {
            return Err(mismatch);
        }

        match self.options.mismatch_policy {
            MismatchPolicy::Reject => Err(mismatch),
            MismatchPolicy::CollapseIntoFirst => {
                log::warn!(
                    "{} segments for {} slots; writing the whole text into the first slot",
                    segments.len(),
                    self.slots.len()
                );
                self.write_text(0, text)?;
                Ok(ReplacementMode::Collapsed)
            },
        }
    }

    /// Emit the package.
    ///
    /// Only body parts whose text changed are re-serialized; every other
    /// entry is copied through untouched.
    pub fn emit(&self) -> Result<Vec<u8>> {
        let replacements: HashMap<String, Vec<u8>> = self
            .parts
            .iter()
            .filter(|part| part.dirty)
            .map(|part| {
                log::debug!("re-serializing {}", part.name);
                (part.name.clone(), markup::serialize(&part.document))
            })
            .collect();

        Ok(self
            .package
            .emit_with(&replacements, self.options.compression_level)?)
    }

    /// Emit the package and write it to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.emit()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

fn slot_out_of_range(index: usize) -> DocumentError {
    DocumentError::SlotNotFound {
        part: String::new(),
        index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word() -> Session {
        Session::blank(Flavor::WordProcessing, "Hello\n\nWorld").unwrap()
    }

    fn deck() -> Session {
        Session::blank(
            Flavor::Presentation,
            "Slide 1:\nIntro\n\nSlide 2:\nMiddle\n\nSlide 3:\nOutro",
        )
        .unwrap()
    }

    #[test]
    fn test_word_slots() {
        let session = word();
        assert_eq!(session.slot_count(), 2);
        assert_eq!(session.slide_count(), 0);
        assert_eq!(session.read_text(1).unwrap(), "World");
        assert_eq!(session.extract_plain_text(), "Hello\n\nWorld");
    }

    #[test]
    fn test_deck_slots() {
        let session = deck();
        assert_eq!(session.slot_count(), 3);
        assert_eq!(session.slide_count(), 3);
        assert_eq!(
            session.extract_plain_text(),
            "Slide 1:\nIntro\n\nSlide 2:\nMiddle\n\nSlide 3:\nOutro"
        );
    }

    #[test]
    fn test_mismatch_leaves_trees_alone() {
        let mut session = word();
        let before = session.document("word/document.xml").unwrap().clone();

        let err = session.apply_replacements(&["only one"]).unwrap_err();
        assert!(matches!(
            err,
            DocumentError::SlotCountMismatch {
                expected: 2,
                actual: 1
            }
        ));
        assert_eq!(session.document("word/document.xml").unwrap(), &before);
    }

    #[test]
    fn test_apply_plain_text_aligned() {
        let mut session = deck();
        let mode = session
            .apply_plain_text("Slide 1:\nIntro\n\nSlide 2:\nCentre\n\nSlide 3:\nOutro")
            .unwrap();
        assert_eq!(mode, ReplacementMode::Aligned);
        assert_eq!(session.read_text(1).unwrap(), "Centre");
    }

    #[test]
    fn test_apply_plain_text_collapses() {
        let mut session = word();
        let mode = session.apply_plain_text("One\n\nTwo\n\nThree").unwrap();
        assert_eq!(mode, ReplacementMode::Collapsed);
        assert_eq!(session.read_text(0).unwrap(), "One\n\nTwo\n\nThree");
        assert_eq!(session.read_text(1).unwrap(), "World");
    }

    #[test]
    fn test_apply_plain_text_rejects() {
        let options = SessionOptions::default().with_mismatch_policy(MismatchPolicy::Reject);
        let mut session = Session::blank_with(Flavor::WordProcessing, "Hello\n\nWorld", options).unwrap();
        assert!(matches!(
            session.apply_plain_text("just this"),
            Err(DocumentError::SlotCountMismatch { .. })
        ));
        assert_eq!(session.read_text(0).unwrap(), "Hello");
    }

    #[test]
    fn test_zero_slots() {
        let mut session = Session::blank(Flavor::WordProcessing, "").unwrap();
        assert_eq!(session.slot_count(), 0);
        assert_eq!(session.extract_plain_text(), "");
        assert!(session.segments("").is_empty());
        assert_eq!(session.apply_plain_text("").unwrap(), ReplacementMode::Aligned);
        assert!(matches!(
            session.apply_plain_text("new text"),
            Err(DocumentError::SlotCountMismatch {
                expected: 0,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_illegal_replacement_writes_nothing() {
        let mut session = word();
        let err = session.apply_replacements(&["Hi\u{1}there", "W\u{0}"]).unwrap_err();
        assert!(matches!(
            err,
            DocumentError::IllegalCharacter {
                index: 0,
                code_point: 1,
                ..
            }
        ));

        // A bad second entry must not leave the first one applied
        assert!(session.apply_replacements(&["Hi", "W\u{0}"]).is_err());
        assert_eq!(session.extract_plain_text(), "Hello\n\nWorld");

        assert!(session.apply_plain_text("bell\u{7}").is_err());
        assert_eq!(session.read_text(0).unwrap(), "Hello");
    }

    #[test]
    fn test_out_of_range_slot() {
        let mut session = word();
        assert!(matches!(
            session.write_text(9, "x"),
            Err(DocumentError::SlotNotFound { index: 9, .. })
        ));
    }

    #[test]
    fn test_unsupported_flavor() {
        let bytes = word().emit().unwrap();
        assert!(matches!(
            Session::open(bytes, Flavor::Presentation),
            Err(DocumentError::UnsupportedFlavor {
                flavor: Flavor::Presentation,
                ..
            })
        ));
    }

    #[test]
    fn test_detect() {
        let bytes = deck().emit().unwrap();
        let session = Session::detect(bytes).unwrap();
        assert_eq!(session.flavor(), Flavor::Presentation);
    }

    #[test]
    fn test_markup_error_names_part() {
        let pkg = Package::from_parts([("word/document.xml", b"<w:document><w:body>".to_vec())]);
        let err = Session::from_package(pkg, Flavor::WordProcessing, SessionOptions::default())
            .unwrap_err();
        match err {
            DocumentError::Markup { part, .. } => assert_eq!(part, "word/document.xml"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
