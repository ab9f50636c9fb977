use aho_corasick::AhoCorasick;
use memchr::memchr;
use once_cell::sync::Lazy;
use std::borrow::Cow;

// `\r` is written as a character reference so parsers do not fold it into `\n`.
static TEXT_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::new(["&", "<", ">", "\r"]).expect("Failed to build XML text escaper")
});

static ATTR_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::new(["&", "<", ">", "\"", "\t", "\n", "\r"])
        .expect("Failed to build XML attribute escaper")
});

const TEXT_REPLACEMENTS: [&str; 4] = ["&amp;", "&lt;", "&gt;", "&#13;"];
const ATTR_REPLACEMENTS: [&str; 7] = ["&amp;", "&lt;", "&gt;", "&quot;", "&#9;", "&#10;", "&#13;"];

/// Escape character data for use between tags.
///
/// # Examples
///
/// ```
/// use ooxml_splice::common::xml::escape_text;
/// assert_eq!(escape_text("a & b"), "a &amp; b");
/// assert_eq!(escape_text("\"quoted\""), "\"quoted\"");
/// ```
#[inline]
pub fn escape_text(s: &str) -> Cow<'_, str> {
    if !TEXT_ESCAPER.is_match(s) {
        return Cow::Borrowed(s);
    }
    Cow::Owned(TEXT_ESCAPER.replace_all(s, &TEXT_REPLACEMENTS))
}

/// Escape an attribute value for use inside double quotes.
///
/// Whitespace control characters become character references so that
/// attribute-value normalization on the reading side keeps them intact.
///
/// # Examples
///
/// ```
/// use ooxml_splice::common::xml::escape_attr;
/// assert_eq!(escape_attr(r#"say "hi" & <go>"#), "say &quot;hi&quot; &amp; &lt;go&gt;");
/// assert_eq!(escape_attr("a\nb"), "a&#10;b");
/// ```
#[inline]
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    if !ATTR_ESCAPER.is_match(s) {
        return Cow::Borrowed(s);
    }
    Cow::Owned(ATTR_ESCAPER.replace_all(s, &ATTR_REPLACEMENTS))
}

/// Returns true for characters allowed in an XML 1.0 document.
///
/// ```
/// use ooxml_splice::common::xml::is_xml_char;
/// assert!(is_xml_char('\t'));
/// assert!(!is_xml_char('\u{1}'));
/// assert!(!is_xml_char('\u{FFFE}'));
/// ```
#[inline]
pub fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}

/// The first character of `s` that XML 1.0 does not allow, if any.
#[inline]
pub fn find_illegal_char(s: &str) -> Option<char> {
    s.chars().find(|&c| !is_xml_char(c))
}

/// Resolve the predefined entities and character references in raw markup text.
///
/// Unknown entities, malformed or out-of-range character references,
/// references to characters XML 1.0 does not allow and a dangling `&` are
/// reported as an error message naming the offending reference.
///
/// # Examples
///
/// ```
/// use ooxml_splice::common::xml::unescape;
/// assert_eq!(unescape("&lt;a &amp; b&gt;").unwrap(), "<a & b>");
/// assert_eq!(unescape("&#65;&#x42;").unwrap(), "AB");
/// assert!(unescape("&nbsp;").is_err());
/// ```
pub fn unescape(raw: &str) -> Result<Cow<'_, str>, String> {
    let bytes = raw.as_bytes();
    let Some(first) = memchr(b'&', bytes) else {
        return Ok(Cow::Borrowed(raw));
    };

    let mut out = String::with_capacity(raw.len());
    out.push_str(&raw[..first]);
    let mut rest = &raw[first..];

    while let Some(amp) = memchr(b'&', rest.as_bytes()) {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let end = memchr(b';', after.as_bytes())
            .ok_or_else(|| format!("unterminated reference near '{}'", truncate(&rest[amp..])))?;
        let name = &after[..end];
        out.push(resolve_reference(name)?);
        rest = &after[end + 1..];
    }
    out.push_str(rest);

    Ok(Cow::Owned(out))
}

fn resolve_reference(name: &str) -> Result<char, String> {
    match name {
        "amp" => Ok('&'),
        "lt" => Ok('<'),
        "gt" => Ok('>'),
        "quot" => Ok('"'),
        "apos" => Ok('\''),
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x") {
                u32::from_str_radix(hex, 16).ok()
            } else if let Some(dec) = name.strip_prefix('#') {
                dec.parse::<u32>().ok()
            } else {
                return Err(format!("unknown entity '&{};'", name));
            };
            code.and_then(char::from_u32)
                .filter(|&c| is_xml_char(c))
                .ok_or_else(|| format!("invalid character reference '&{};'", name))
        },
    }
}

fn truncate(s: &str) -> &str {
    match s.char_indices().nth(16) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
