//! Per-flavor knowledge: where the body text lives and what its leaves are called.

use crate::ooxml::opc::{Package, PackURI};
use phf::phf_map;
use std::fmt;
use std::path::Path;

/// The kind of OOXML package being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flavor {
    /// Word-compatible documents (`.docx`, `.docm`, `.dotx`)
    WordProcessing,
    /// PowerPoint-compatible presentations (`.pptx`, `.pptm`, `.potx`)
    Presentation,
}

/// Static description of a flavor's markup.
#[derive(Debug)]
pub struct FlavorTable {
    /// Atomic text leaf element name
    pub leaf: &'static str,
    /// Run element grouping leaves
    pub run: &'static str,
    /// Paragraph element grouping runs
    pub paragraph: &'static str,
    /// Part that must exist for a package to be of this flavor
    pub required_part: &'static str,
    /// Recognised file extensions, lowercase without the dot
    pub extensions: &'static [&'static str],
}

static WORD_PROCESSING: FlavorTable = FlavorTable {
    leaf: "w:t",
    run: "w:r",
    paragraph: "w:p",
    required_part: "word/document.xml",
    extensions: &["docx", "docm", "dotx"],
};

static PRESENTATION: FlavorTable = FlavorTable {
    leaf: "a:t",
    run: "a:r",
    paragraph: "a:p",
    required_part: "ppt/presentation.xml",
    extensions: &["pptx", "pptm", "potx"],
};

static EXTENSION_MAP: phf::Map<&'static str, Flavor> = phf_map! {
    "docx" => Flavor::WordProcessing,
    "docm" => Flavor::WordProcessing,
    "dotx" => Flavor::WordProcessing,
    "pptx" => Flavor::Presentation,
    "pptm" => Flavor::Presentation,
    "potx" => Flavor::Presentation,
};

const SLIDES_DIR: &str = "/ppt/slides";
const SLIDE_STEM: &str = "slide";

impl Flavor {
    /// The static table for this flavor.
    #[inline]
    pub fn table(self) -> &'static FlavorTable {
        match self {
            Flavor::WordProcessing => &WORD_PROCESSING,
            Flavor::Presentation => &PRESENTATION,
        }
    }

    /// Infer the flavor from a file extension (case-insensitive, dot optional).
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        EXTENSION_MAP.get(ext.as_str()).copied()
    }

    /// Infer the flavor from a file name.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Infer the flavor from the parts present in a package.
    pub fn detect(package: &Package) -> Option<Self> {
        [Flavor::WordProcessing, Flavor::Presentation]
            .into_iter()
            .find(|flavor| package.contains(flavor.table().required_part))
    }

    /// Body parts holding the text of this flavor, in reading order.
    ///
    /// Word-processing text lives in the main document part. Presentation
    /// text lives in `ppt/slides/slide<N>.xml`, ordered by `N`.
    pub fn body_parts(self, package: &Package) -> Vec<String> {
        match self {
            Flavor::WordProcessing => vec![WORD_PROCESSING.required_part.to_string()],
            Flavor::Presentation => {
                let mut slides: Vec<(u32, &PackURI)> = package
                    .iter_parts()
                    .filter(|part| !part.is_dir())
                    .filter_map(|part| slide_number(part.partname()).map(|n| (n, part.partname())))
                    .collect();
                slides.sort_by_key(|(n, _)| *n);
                slides
                    .into_iter()
                    .map(|(_, uri)| uri.membername().to_string())
                    .collect()
            },
        }
    }
}

/// Slide number of a `/ppt/slides/slide<N>.xml` part name.
pub fn slide_number(uri: &PackURI) -> Option<u32> {
    if uri.base_uri() != SLIDES_DIR || uri.ext() != "xml" {
        return None;
    }
    let idx = uri.idx()?;
    let filename = uri.filename();
    let stem_len = filename.len() - uri.ext().len() - 1;
    let prefix = filename[..stem_len].trim_end_matches(|c: char| c.is_ascii_digit());
    (prefix == SLIDE_STEM).then_some(idx)
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flavor::WordProcessing => write!(f, "word-processing"),
            Flavor::Presentation => write!(f, "presentation"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(Flavor::from_extension("docx"), Some(Flavor::WordProcessing));
        assert_eq!(Flavor::from_extension(".DOTX"), Some(Flavor::WordProcessing));
        assert_eq!(Flavor::from_extension("pptm"), Some(Flavor::Presentation));
        assert_eq!(Flavor::from_extension("xlsx"), None);
        assert_eq!(Flavor::from_extension(""), None);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(Flavor::from_path("reports/Q3 deck.potx"), Some(Flavor::Presentation));
        assert_eq!(Flavor::from_path("notes.txt"), None);
        assert_eq!(Flavor::from_path("no_extension"), None);
    }

    #[test]
    fn test_extension_table_matches_map() {
        for flavor in [Flavor::WordProcessing, Flavor::Presentation] {
            for ext in flavor.table().extensions {
                assert_eq!(Flavor::from_extension(ext), Some(flavor));
            }
        }
    }

    #[test]
    fn test_slide_number() {
        let slide = |s: &str| slide_number(&PackURI::from_membername(s));
        assert_eq!(slide("ppt/slides/slide12.xml"), Some(12));
        assert_eq!(slide("ppt/slides/slide1.xml"), Some(1));
        assert_eq!(slide("ppt/slides/_rels/slide1.xml.rels"), None);
        assert_eq!(slide("ppt/slideLayouts/slideLayout1.xml"), None);
        assert_eq!(slide("ppt/slides/notes1.xml"), None);
        assert_eq!(slide("ppt/slides/slide.xml"), None);
    }

    #[test]
    fn test_body_parts_in_numeric_order() {
        let pkg = Package::from_parts([
            ("ppt/presentation.xml", Vec::new()),
            ("ppt/slides/slide10.xml", Vec::new()),
            ("ppt/slides/slide2.xml", Vec::new()),
            ("ppt/slides/slide1.xml", Vec::new()),
            ("ppt/slides/_rels/slide1.xml.rels", Vec::new()),
        ]);
        assert_eq!(Flavor::detect(&pkg), Some(Flavor::Presentation));
        assert_eq!(
            Flavor::Presentation.body_parts(&pkg),
            vec![
                "ppt/slides/slide1.xml",
                "ppt/slides/slide2.xml",
                "ppt/slides/slide10.xml"
            ]
        );
    }

    #[test]
    fn test_detect_nothing() {
        let pkg = Package::from_parts([("xl/workbook.xml", Vec::new())]);
        assert_eq!(Flavor::detect(&pkg), None);
    }
}
