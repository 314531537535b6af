use std::time::Duration;

use tokio::time::sleep;

/// Re-exposes a complete assistant response as a lazy, finite sequence of
/// growing prefixes, one character per step, for responsive display.
///
/// This is a presentation-layer simulation over a non-streaming completion
/// call: swapping in a genuinely streaming producer only changes who feeds
/// the text, not the growing-prefix contract. The sequence is
/// non-restartable and terminates with the full response; dropping it
/// mid-way is safe.
#[derive(Debug)]
pub struct ReplyStream {
    text: String,
    /// Byte offset of the end of each character, in order.
    boundaries: Vec<usize>,
    emitted: usize,
    step_delay: Duration,
}

impl ReplyStream {
    pub fn new(text: impl Into<String>, step_delay: Duration) -> Self {
        let text = text.into();
        let boundaries = text
            .char_indices()
            .map(|(i, c)| i + c.len_utf8())
            .collect();
        Self {
            text,
            boundaries,
            emitted: 0,
            step_delay,
        }
    }

    /// Advance one character and return the new prefix, or `None` once the
    /// full response has been emitted. Prefixes always end on a character
    /// boundary.
    pub fn step(&mut self) -> Option<&str> {
        if self.emitted == self.boundaries.len() {
            return None;
        }
        self.emitted += 1;
        Some(&self.text[..self.boundaries[self.emitted - 1]])
    }

    /// Paced variant of [`step`](Self::step): waits the configured delay
    /// before each emission, yielding control in between.
    pub async fn next(&mut self) -> Option<&str> {
        if self.emitted == self.boundaries.len() {
            return None;
        }
        sleep(self.step_delay).await;
        self.step()
    }

    /// Number of characters emitted so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    pub fn is_finished(&self) -> bool {
        self.emitted == self.boundaries.len()
    }

    /// The complete response this stream was built from.
    pub fn response(&self) -> &str {
        &self.text
    }
}
