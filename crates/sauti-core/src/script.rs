//! Script segmentation
//!
//! Splits raw multi-line input into an ordered token sequence. Blank lines
//! are significant: each one marks a paragraph break whose silence the
//! assembler accumulates, so consecutive blanks must all be preserved.

/// One logical unit of the input script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptLine {
    /// A line to synthesize; text is trimmed and non-empty.
    Speech(String),
    /// A blank line separating paragraphs.
    ParagraphBreak,
}

/// Segment raw script text into ordered tokens.
///
/// Every physical line yields exactly one token: whitespace-only lines
/// become `ParagraphBreak`, everything else `Speech` with surrounding
/// whitespace stripped. Any input is valid, including the empty string
/// (which yields no tokens).
pub fn segment_script(text: &str) -> Vec<ScriptLine> {
    if text.is_empty() {
        return Vec::new();
    }
    text.lines()
        .map(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                ScriptLine::ParagraphBreak
            } else {
                ScriptLine::Speech(trimmed.to_string())
            }
        })
        .collect()
}
