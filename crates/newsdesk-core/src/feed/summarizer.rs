/// Sentences kept in an item summary
pub const DEFAULT_SENTENCES: usize = 2;

/// Width of the fallback excerpt, in characters
const FALLBACK_WIDTH: usize = 240;

const SENTENCE_TERMINATORS: [char; 3] = ['.', '!', '?'];

/// Reduce text to its first `sentence_count` sentences.
///
/// A sentence ends at `.`, `!` or `?`. When the text runs out before enough
/// sentences are found, the unterminated tail is kept as the last segment.
/// If nothing could be collected the cleaned text is cut at a fixed width
/// instead.
pub fn summarize(text: &str, sentence_count: usize) -> String {
    if text.is_empty() {
        return String::new();
    }

    let cleaned = text.replace(['\r', '\n'], " ");
    let cleaned = cleaned.trim();

    let mut segments: Vec<&str> = Vec::new();
    let mut start = 0;

    if sentence_count > 0 {
        for (idx, ch) in cleaned.char_indices() {
            if SENTENCE_TERMINATORS.contains(&ch) {
                let end = idx + ch.len_utf8();
                segments.push(cleaned[start..end].trim());
                start = end;

                if segments.len() >= sentence_count {
                    break;
                }
            }
        }

        if segments.len() < sentence_count {
            let tail = cleaned[start..].trim();
            if !tail.is_empty() {
                segments.push(tail);
            }
        }
    }

    let summary = segments.join(" ");
    if summary.is_empty() {
        truncate_chars(cleaned, FALLBACK_WIDTH)
    } else {
        summary
    }
}

/// Cut text after `width` characters, marking the cut with an ellipsis
fn truncate_chars(text: &str, width: usize) -> String {
    match text.char_indices().nth(width) {
        Some((end, _)) => format!("{}…", &text[..end]),
        None => text.to_string(),
    }
}
