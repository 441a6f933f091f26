// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Splitting of oversized message text into transport-sized chunks.
//!
//! Lengths are UTF-8 byte counts. Text is split on line breaks first; a line
//! that alone exceeds the limit is split on spaces, and a word that still
//! exceeds it is split per character.

/// Boundary used at one level of the split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    Line,
    Space,
    Char,
}

impl Separator {
    fn as_str(self) -> &'static str {
        match self {
            Separator::Line => "\n",
            Separator::Space => " ",
            Separator::Char => "",
        }
    }

    fn narrower(self) -> Separator {
        match self {
            Separator::Line => Separator::Space,
            Separator::Space | Separator::Char => Separator::Char,
        }
    }

    fn segments(self, text: &str) -> Vec<&str> {
        match self {
            Separator::Char => text
                .char_indices()
                .map(|(i, c)| &text[i..i + c.len_utf8()])
                .collect(),
            other => text.split(other.as_str()).collect(),
        }
    }
}

/// Split `text` into chunks of at most `max_len` bytes, starting at line breaks.
pub fn split_message(text: &str, max_len: usize) -> Vec<String> {
    split(text, max_len, Separator::Line)
}

/// Split `text` on `separator`, greedily packing segments into chunks.
///
/// A segment is appended to the current chunk while
/// `chunk + separator + segment < max_len`. A blank line that starts a chunk
/// is kept as a leading separator of the next segment. Text that already fits
/// is returned unchanged as a single chunk.
pub fn split(text: &str, max_len: usize, separator: Separator) -> Vec<String> {
    if text.len() <= max_len {
        return vec![text.to_string()];
    }

    let sep = separator.as_str();
    let mut chunks: Vec<String> = Vec::new();
    for segment in separator.segments(text) {
        let fits_current = chunks.last().is_some_and(|last| {
            if last.is_empty() {
                sep.len() + segment.len() <= max_len
            } else {
                last.len() + sep.len() + segment.len() < max_len
            }
        });

        if fits_current {
            if let Some(last) = chunks.last_mut() {
                last.push_str(sep);
                last.push_str(segment);
            }
        } else if segment.len() > max_len && separator != Separator::Char {
            chunks.extend(split(segment, max_len, separator.narrower()));
        } else {
            // A single character is never re-split.
            chunks.push(segment.to_string());
        }
    }

    // Only a trailing blank line, or one followed by an oversized segment,
    // is left empty here; there is nothing to send for it.
    chunks.retain(|c| !c.is_empty());
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn short_text_is_one_chunk() {
        assert_eq!(split_message("hello world", 6000), vec!["hello world"]);
        assert_eq!(split_message("", 10), vec![""]);
    }

    #[test]
    fn text_of_exactly_max_len_is_one_chunk() {
        let text = "abcd\nefgh";
        assert_eq!(split_message(text, text.len()), vec![text]);
    }

    #[test]
    fn lines_are_packed_greedily() {
        let text = "aaaa\nbbbb\ncccc\ndddd";
        // "aaaa\nbbbb" is 9 bytes, which is < 10.
        assert_eq!(split_message(text, 10), vec!["aaaa\nbbbb", "cccc\ndddd"]);
    }

    #[test]
    fn blank_line_on_a_chunk_boundary_is_kept() {
        assert_eq!(split_message("aaaa\n\nbbbb", 5), vec!["aaaa", "\nbbbb"]);
    }

    #[test]
    fn trailing_blank_line_is_not_sent() {
        assert_eq!(split_message("aaaa\n", 4), vec!["aaaa"]);
    }

    #[test]
    fn long_line_falls_back_to_spaces() {
        let text = "short\nthe quick brown fox jumps";
        let chunks = split_message(text, 12);
        assert_eq!(chunks, vec!["short", "the quick", "brown fox", "jumps"]);
    }

    #[test]
    fn long_word_falls_back_to_characters() {
        let chunks = split("abcdefghij", 4, Separator::Space);
        assert_eq!(chunks, vec!["abc", "def", "ghi", "j"]);
    }

    #[test]
    fn multibyte_characters_are_never_cut() {
        let text = "ééééé";
        let chunks = split(text, 4, Separator::Char);
        assert!(chunks.iter().all(|c| c.len() <= 4));
        assert_eq!(chunks.concat(), text);
    }

    fn strip_separators(s: &str) -> String {
        s.chars().filter(|c| *c != '\n' && *c != ' ').collect()
    }

    proptest! {
        #[test]
        fn chunks_never_exceed_max_len(text in "[a-z \\n]{0,400}", max_len in 8usize..120) {
            for chunk in split_message(&text, max_len) {
                prop_assert!(chunk.len() <= max_len, "chunk {:?} > {}", chunk, max_len);
            }
        }

        #[test]
        fn content_is_preserved_in_order(text in "\\PC{0,200}", max_len in 8usize..64) {
            let chunks = split_message(&text, max_len);
            prop_assert_eq!(strip_separators(&chunks.concat()), strip_separators(&text));
        }

        #[test]
        fn fitting_text_is_untouched(text in "[a-z \\n]{0,64}") {
            prop_assert_eq!(split_message(&text, 64), vec![text.clone()]);
        }
    }
}
