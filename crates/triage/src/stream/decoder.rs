//! Incremental text decoding and line reassembly.

use serde::de::IgnoredAny;

/// Incremental UTF-8 decoder.
///
/// A multi-byte sequence split across chunks is held back until the rest of
/// it arrives. Invalid sequences decode to U+FFFD.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the next chunk, returning all text that is complete so far.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        self.pending.extend_from_slice(chunk);

        let mut out = String::with_capacity(self.pending.len());
        let mut input: &[u8] = &self.pending;
        loop {
            match std::str::from_utf8(input) {
                Ok(valid) => {
                    out.push_str(valid);
                    input = &[];
                    break;
                }
                Err(e) => {
                    let (valid, rest) = input.split_at(e.valid_up_to());
                    out.push_str(&String::from_utf8_lossy(valid));
                    match e.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            input = &rest[len..];
                        }
                        // Incomplete sequence at the end of the chunk
                        None => {
                            input = rest;
                            break;
                        }
                    }
                }
            }
        }

        self.pending = input.to_vec();
        out
    }

    /// Bytes of an incomplete sequence waiting for the next chunk.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

/// Splits decoded text into newline-delimited records.
///
/// The trailing piece after the last newline is kept back until it is a
/// complete record: it must end in `}` and parse as JSON. Anything still
/// buffered when the stream ends is never emitted.
#[derive(Debug, Default)]
pub struct LineAssembler {
    buffer: String,
}

impl LineAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append text and return the trimmed, non-empty lines now complete.
    pub fn push(&mut self, text: &str) -> Vec<String> {
        self.buffer.push_str(text);

        let mut pieces: Vec<&str> = self.buffer.split('\n').collect();
        let last = pieces.pop().unwrap_or_default();
        let keep_last = !is_complete_record(last);

        let mut lines: Vec<String> = pieces
            .into_iter()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        if keep_last {
            let remainder = last.to_string();
            self.buffer = remainder;
        } else {
            let last = last.trim();
            if !last.is_empty() {
                lines.push(last.to_string());
            }
            self.buffer.clear();
        }

        lines
    }

    /// Text held back waiting for the rest of its record.
    pub fn remainder(&self) -> &str {
        &self.buffer
    }

    /// Discard and return the held-back fragment.
    pub fn take_remainder(&mut self) -> Option<String> {
        if self.buffer.trim().is_empty() {
            self.buffer.clear();
            None
        } else {
            Some(std::mem::take(&mut self.buffer))
        }
    }
}

fn is_complete_record(fragment: &str) -> bool {
    let trimmed = fragment.trim();
    if trimmed.is_empty() {
        return true;
    }
    // A brace can also close a nested object mid-record.
    trimmed.ends_with('}') && serde_json::from_str::<IgnoredAny>(trimmed).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_ascii() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.decode(b"hello"), "hello");
        assert_eq!(decoder.pending_len(), 0);
    }

    #[test]
    fn test_decode_split_multibyte() {
        let bytes = "🚨 Severity".as_bytes();
        let mut decoder = Utf8Decoder::new();

        assert_eq!(decoder.decode(&bytes[..2]), "");
        assert_eq!(decoder.pending_len(), 2);
        assert_eq!(decoder.decode(&bytes[2..]), "🚨 Severity");
        assert_eq!(decoder.pending_len(), 0);
    }

    #[test]
    fn test_decode_invalid_bytes() {
        let mut decoder = Utf8Decoder::new();
        assert_eq!(decoder.decode(b"a\xffb"), "a\u{FFFD}b");
    }

    #[test]
    fn test_lines_split_across_pushes() {
        let mut lines = LineAssembler::new();

        assert_eq!(lines.push("{\"type\":\"begin\"}\n{\"typ"), vec!["{\"type\":\"begin\"}"]);
        assert_eq!(lines.remainder(), "{\"typ");

        assert_eq!(
            lines.push("e\":\"item\",\"content\":\"Hello\"}\n{\"type\":\"end\"}\n"),
            vec!["{\"type\":\"item\",\"content\":\"Hello\"}", "{\"type\":\"end\"}"]
        );
        assert_eq!(lines.remainder(), "");
    }

    #[test]
    fn test_trailing_complete_record_without_newline() {
        let mut lines = LineAssembler::new();
        assert_eq!(lines.push("{\"type\":\"end\"}"), vec!["{\"type\":\"end\"}"]);
        assert!(lines.take_remainder().is_none());
    }

    #[test]
    fn test_inner_brace_is_not_a_record_end() {
        let mut lines = LineAssembler::new();

        let out = lines.push("{\"type\":\"item\",\"metadata\":{\"a\":1}");
        assert!(out.is_empty());

        let out = lines.push(",\"content\":\"x\"}\n");
        assert_eq!(out, vec!["{\"type\":\"item\",\"metadata\":{\"a\":1},\"content\":\"x\"}"]);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let mut lines = LineAssembler::new();
        assert_eq!(lines.push("\n  \n{\"type\":\"end\"}\n\n"), vec!["{\"type\":\"end\"}"]);
    }

    #[test]
    fn test_unterminated_fragment_is_held() {
        let mut lines = LineAssembler::new();
        assert!(lines.push("{\"type\":\"item\",\"content\":\"cut").is_empty());
        assert_eq!(
            lines.take_remainder().as_deref(),
            Some("{\"type\":\"item\",\"content\":\"cut")
        );
        assert_eq!(lines.remainder(), "");
    }
}
