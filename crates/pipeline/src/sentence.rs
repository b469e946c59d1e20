//! Sentence segmentation for the streamed dialog response.
//!
//! Tokens accumulate until a flush fires, so the caller hears audio as soon
//! as the first sentence is complete instead of waiting for the whole turn.

/// Characters that end a synthesis span. Commas deliberately do not: they
/// splice clauses, not sentences.
const SENTENCE_TERMINATORS: &[char] = &['.', '?', '!', ':', ';', '\n'];

/// Buffer cap in chars. Long comma-spliced responses flush here so playback
/// never stalls waiting for punctuation.
const MAX_BUFFER_CHARS: usize = 50;

/// Accumulates dialog tokens and yields synthesis-sized sentences.
#[derive(Debug, Default)]
pub struct SentenceBuffer {
    buffer: String,
}

impl SentenceBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one token and apply the flush predicate: a terminator in the
    /// token, the buffer growing past the cap, or the end of the turn.
    /// Returns the trimmed sentence when it is time to synthesize; a flush
    /// whose trimmed content is empty yields `None` (the buffer still
    /// clears, so stray whitespace never reaches the synthesizer).
    pub fn push(&mut self, token: &str, is_final: bool) -> Option<String> {
        if !token.is_empty() {
            self.buffer.push_str(token);
        }

        let flush = token.contains(SENTENCE_TERMINATORS)
            || self.buffer.chars().count() > MAX_BUFFER_CHARS
            || is_final;
        if !flush {
            return None;
        }

        let sentence = self.buffer.trim().to_string();
        self.buffer.clear();
        if sentence.is_empty() {
            None
        } else {
            Some(sentence)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}
