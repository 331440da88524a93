//! The message input form.

/// Contents of the `message-input` field.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MessageInput {
    value: String,
}

impl MessageInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Submit the form.
    ///
    /// Blank input (empty or whitespace only) yields `None` and is left in
    /// the field. Anything else is returned exactly as typed, untrimmed, and
    /// the field is cleared.
    pub fn submit(&mut self) -> Option<String> {
        if self.value.trim().is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.value))
    }
}
