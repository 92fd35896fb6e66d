use std::fmt;
use std::str::FromStr;

/// Publication state of a content-store record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStatus {
    Published,
    Draft,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Published => "published",
            RecordStatus::Draft => "draft",
        }
    }
}

impl FromStr for RecordStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "published" => Ok(RecordStatus::Published),
            "draft" => Ok(RecordStatus::Draft),
            _ => Err(format!("Invalid record status: {}", s)),
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const TITLE_WORD_COUNT: usize = 8;

/// Title for a result record: source filename stem when present, otherwise
/// the first words of the text, otherwise a plain fallback.
pub fn derive_title(filename: Option<&str>, text: &str) -> String {
    if let Some(name) = filename {
        let stem = name.rsplit_once('.').map(|(s, _)| s).unwrap_or(name);
        if !stem.trim().is_empty() {
            return stem.trim().to_string();
        }
    }

    let words: Vec<&str> = text.split_whitespace().take(TITLE_WORD_COUNT).collect();
    if words.is_empty() {
        return "Transcription".to_string();
    }
    let mut title = words.join(" ");
    if text.split_whitespace().count() > TITLE_WORD_COUNT {
        title.push('…');
    }
    title
}

/// Labeled section appended to a parent document: heading, blank line,
/// content. Appends are not idempotent; repeated completions append again.
pub fn render_section(heading: &str, content: &str) -> String {
    format!("{}\n\n{}", heading, content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_prefers_filename_stem() {
        assert_eq!(
            derive_title(Some("sermon-2024.mp3"), "some words here"),
            "sermon-2024"
        );
    }

    #[test]
    fn title_falls_back_to_leading_words() {
        let text = "one two three four five six seven eight nine ten";
        assert_eq!(
            derive_title(None, text),
            "one two three four five six seven eight…"
        );
    }

    #[test]
    fn short_text_gets_no_ellipsis() {
        assert_eq!(derive_title(None, "hello world"), "hello world");
    }

    #[test]
    fn empty_text_gets_fallback_title() {
        assert_eq!(derive_title(None, "   "), "Transcription");
    }

    #[test]
    fn section_is_heading_blank_line_content() {
        assert_eq!(
            render_section("Transcript: interview", "hello"),
            "Transcript: interview\n\nhello"
        );
    }
}
