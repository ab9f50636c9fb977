/// Provides the PackURI value type used to name parts within a package.
///
/// A PackURI always begins with a forward slash; the ZIP member name is the
/// same string without it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackURI {
    /// The full pack URI string (e.g., "/word/document.xml")
    uri: String,
}

impl PackURI {
    /// Create a new PackURI from a string that begins with a forward slash.
    pub fn new<S: Into<String>>(uri: S) -> Result<Self, String> {
        let uri = uri.into();
        if !uri.starts_with('/') {
            return Err(format!("PackURI must begin with slash, got '{}'", uri));
        }
        Ok(PackURI { uri })
    }

    /// Create a PackURI from a ZIP member name (no leading slash).
    pub fn from_membername(name: &str) -> Self {
        PackURI {
            uri: format!("/{}", name.trim_start_matches('/')),
        }
    }

    /// Get the base URI (directory portion) of this PackURI.
    ///
    /// For example, "/ppt/slides" for "/ppt/slides/slide1.xml".
    pub fn base_uri(&self) -> &str {
        match self.uri.rfind('/') {
            Some(0) | None => "/",
            Some(pos) => &self.uri[..pos],
        }
    }

    /// Get the filename portion, e.g. "slide1.xml" for "/ppt/slides/slide1.xml".
    pub fn filename(&self) -> &str {
        match self.uri.rfind('/') {
            Some(pos) => &self.uri[pos + 1..],
            None => "",
        }
    }

    /// Get the extension without the leading period, e.g. "xml".
    pub fn ext(&self) -> &str {
        let filename = self.filename();
        match filename.rfind('.') {
            Some(pos) => &filename[pos + 1..],
            None => "",
        }
    }

    /// Get the partname index for tuple partnames, or None for singleton partnames.
    ///
    /// For example, returns 21 for "/ppt/slides/slide21.xml" and None for "/ppt/presentation.xml".
    pub fn idx(&self) -> Option<u32> {
        let filename = self.filename();
        let stem = match filename.rfind('.') {
            Some(pos) => &filename[..pos],
            None => filename,
        };

        let digits = stem.len() - stem.trim_end_matches(|c: char| c.is_ascii_digit()).len();
        // A name made only of digits is not a tuple partname
        if digits == 0 || digits == stem.len() {
            return None;
        }
        stem[stem.len() - digits..].parse::<u32>().ok()
    }

    /// Get the membername (URI with leading slash stripped).
    ///
    /// This is the form used as the ZIP file membername for the part.
    pub fn membername(&self) -> &str {
        &self.uri[1..]
    }

    /// Get the full URI string.
    pub fn as_str(&self) -> &str {
        &self.uri
    }
}

impl std::fmt::Display for PackURI {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.uri)
    }
}

impl AsRef<str> for PackURI {
    fn as_ref(&self) -> &str {
        &self.uri
    }
}

/// The URI for the [Content_Types].xml part
pub const CONTENT_TYPES_URI: &str = "/[Content_Types].xml";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packuri_new() {
        assert!(PackURI::new("/word/document.xml").is_ok());
        assert!(PackURI::new("word/document.xml").is_err());
    }

    #[test]
    fn test_from_membername() {
        let uri = PackURI::from_membername("ppt/slides/slide3.xml");
        assert_eq!(uri.as_str(), "/ppt/slides/slide3.xml");
        assert_eq!(uri.membername(), "ppt/slides/slide3.xml");
        assert_eq!(PackURI::from_membername("/a.xml").as_str(), "/a.xml");
    }

    #[test]
    fn test_base_uri_and_filename() {
        let uri = PackURI::new("/ppt/slides/slide1.xml").unwrap();
        assert_eq!(uri.base_uri(), "/ppt/slides");
        assert_eq!(uri.filename(), "slide1.xml");
        assert_eq!(uri.ext(), "xml");

        let top = PackURI::new(CONTENT_TYPES_URI).unwrap();
        assert_eq!(top.base_uri(), "/");
        assert_eq!(top.filename(), "[Content_Types].xml");
    }

    #[test]
    fn test_idx() {
        let uri = PackURI::new("/ppt/slides/slide21.xml").unwrap();
        assert_eq!(uri.idx(), Some(21));

        let uri = PackURI::new("/ppt/presentation.xml").unwrap();
        assert_eq!(uri.idx(), None);

        let uri = PackURI::new("/ppt/media/1.png").unwrap();
        assert_eq!(uri.idx(), None);
    }
}
