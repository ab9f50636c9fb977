//! The plain-text rendering of a session and its inverse.
//!
//! Word-processing text is one segment per slot separated by a blank line.
//! Presentation text is one block per slide:
//!
//! ```text
//! Slide 1:
//! Title
//! First point
//!
//! Slide 2:
//! ...
//! ```

/// Separator between word-processing segments.
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";
/// Separator between slide blocks.
pub const SLIDE_SEPARATOR: &str = "\n\n";
const LINE_SEPARATOR: &str = "\n";
const SLIDE_HEADER_PREFIX: &str = "Slide ";

/// Render word-processing slot texts.
pub fn render_paragraphs<'a, I>(texts: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    texts.into_iter().collect::<Vec<_>>().join(PARAGRAPH_SEPARATOR)
}

/// Render slide slot texts; `slides[i]` holds the texts of slide `i + 1`.
pub fn render_slides(slides: &[Vec<&str>]) -> String {
    let mut out = String::new();
    for (i, texts) in slides.iter().enumerate() {
        if i > 0 {
            out.push_str(SLIDE_SEPARATOR);
        }
        out.push_str(&slide_header(i + 1));
        out.push_str(LINE_SEPARATOR);
        out.push_str(&texts.join(LINE_SEPARATOR));
    }
    out
}

/// The header line of slide `number` (1-based), without the line break.
#[inline]
pub fn slide_header(number: usize) -> String {
    format!("{}{}:", SLIDE_HEADER_PREFIX, number)
}

/// Split word-processing text into segments.
///
/// Empty text against a document without slots yields no segments.
pub fn split_paragraphs(text: &str, slot_count: usize) -> Vec<String> {
    if text.is_empty() && slot_count == 0 {
        return Vec::new();
    }
    text.split(PARAGRAPH_SEPARATOR).map(str::to_string).collect()
}

/// Split presentation text into segments.
///
/// `slots_per_slide[i]` is the number of slots on slide `i + 1`; an empty
/// block for a slide without slots yields no segment. Text before the first
/// header, or text without any header, is treated as a block of its own.
pub fn split_slides(text: &str, slots_per_slide: &[usize]) -> Vec<String> {
    let blocks = slide_blocks(text);
    let mut segments = Vec::new();

    for (i, body) in blocks.iter().enumerate() {
        let slots = slots_per_slide.get(i).copied().unwrap_or(0);
        if body.is_empty() && slots == 0 {
            continue;
        }
        segments.extend(body.split(LINE_SEPARATOR).map(str::to_string));
    }
    segments
}

/// Slide bodies in order, headers and separators removed.
pub(crate) fn slide_blocks(text: &str) -> Vec<String> {
    let mut blocks: Vec<Vec<&str>> = Vec::new();
    let mut preamble: Vec<&str> = Vec::new();

    for line in text.split(LINE_SEPARATOR) {
        if is_slide_header(line) {
            blocks.push(Vec::new());
            continue;
        }
        match blocks.last_mut() {
            Some(block) => block.push(line),
            None => preamble.push(line),
        }
    }

    if blocks.is_empty() {
        return vec![preamble.join(LINE_SEPARATOR)];
    }

    // The blank line separating a block from the next header belongs to neither
    let last = blocks.len() - 1;
    for block in &mut blocks[..last] {
        if block.last() == Some(&"") {
            block.pop();
        }
    }

    let mut bodies: Vec<String> = Vec::with_capacity(blocks.len() + 1);
    if preamble.iter().any(|line| !line.trim().is_empty()) {
        let mut lines = preamble;
        while lines.last().is_some_and(|line| line.trim().is_empty()) {
            lines.pop();
        }
        bodies.push(lines.join(LINE_SEPARATOR));
    }
    bodies.extend(blocks.iter().map(|block| block.join(LINE_SEPARATOR)));
    bodies
}

/// `Slide <N>:` with optional trailing whitespace.
fn is_slide_header(line: &str) -> bool {
    line.trim_end()
        .strip_prefix(SLIDE_HEADER_PREFIX)
        .and_then(|rest| rest.strip_suffix(':'))
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraphs() {
        let text = render_paragraphs(["Hello", "World"]);
        assert_eq!(text, "Hello\n\nWorld");
        assert_eq!(split_paragraphs(&text, 2), vec!["Hello", "World"]);
    }

    #[test]
    fn test_empty_paragraphs() {
        assert!(split_paragraphs("", 0).is_empty());
        assert_eq!(split_paragraphs("", 1), vec![""]);
        assert_eq!(split_paragraphs(&render_paragraphs(["", "", "x"]), 3), vec!["", "", "x"]);
    }

    #[test]
    fn test_slides_render() {
        let text = render_slides(&[vec!["Title", "Point"], vec![], vec!["End"]]);
        assert_eq!(text, "Slide 1:\nTitle\nPoint\n\nSlide 2:\n\n\nSlide 3:\nEnd");
    }

    #[test]
    fn test_slides_split_inverts_render() {
        let cases: Vec<Vec<Vec<&str>>> = vec![
            vec![vec!["Title", "Point"], vec![], vec!["End"]],
            vec![vec![""], vec!["", ""], vec![]],
            vec![vec!["only"]],
            vec![vec![], vec![]],
        ];
        for slides in cases {
            let counts: Vec<usize> = slides.iter().map(Vec::len).collect();
            let expected: Vec<String> = slides.iter().flatten().map(|s| s.to_string()).collect();
            let text = render_slides(&slides);
            assert_eq!(split_slides(&text, &counts), expected, "text: {:?}", text);
        }
    }

    #[test]
    fn test_headerless_text_is_one_block() {
        assert_eq!(split_slides("a\nb", &[2]), vec!["a", "b"]);
        assert!(split_slides("", &[]).is_empty());
    }

    #[test]
    fn test_preamble_is_its_own_block() {
        let segments = split_slides("Here you go:\n\nSlide 1:\nA", &[1]);
        assert_eq!(segments, vec!["Here you go:", "A"]);
    }

    #[test]
    fn test_header_detection() {
        assert!(is_slide_header("Slide 12:"));
        assert!(is_slide_header("Slide 3:  "));
        assert!(!is_slide_header("Slide :"));
        assert!(!is_slide_header("Slide one:"));
        assert!(!is_slide_header(" Slide 1:"));
    }
}
