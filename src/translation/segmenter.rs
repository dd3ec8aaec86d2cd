/*!
 * Sentence splitting for summary translation.
 *
 * A unit ends after `.`, `!` or `?` when the next character is whitespace.
 * Units are trimmed and never empty; nothing else about the text changes.
 */

use std::iter::FusedIterator;

/// Lazy iterator over the sentences of a text
///
/// Cloning the iterator restarts from the clone's current position.
#[derive(Debug, Clone)]
pub struct Sentences<'a> {
    rest: &'a str,
}

/// Split `text` into sentence units
pub fn split_sentences(text: &str) -> Sentences<'_> {
    Sentences { rest: text }
}

impl<'a> Iterator for Sentences<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let text = self.rest.trim_start();
        if text.is_empty() {
            self.rest = "";
            return None;
        }

        let (unit, rest) = text.split_at(sentence_end(text));
        self.rest = rest;
        Some(unit.trim_end())
    }
}

impl FusedIterator for Sentences<'_> {}

/// Byte offset just past the first sentence terminator that is followed by whitespace
fn sentence_end(text: &str) -> usize {
    let mut chars = text.char_indices().peekable();
    while let Some((index, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            if let Some(&(_, next)) = chars.peek() {
                if next.is_whitespace() {
                    return index + c.len_utf8();
                }
            }
        }
    }
    text.len()
}
