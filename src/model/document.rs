//! Buffer snapshot as of the last processed edit

/// Program shown when there is no saved session
pub const DEFAULT_SAMPLE: &str = "def main(arg: None|str = None) -> int :
    return 42

if __name__ == \"__main__\":
    main()";

/// The text the session last accepted from the editor
///
/// `revision` increases by one for every accepted change and is what
/// renders are tagged with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    text: String,
    revision: u64,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            revision: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the text, bumping the revision
    ///
    /// Returns `false` (and leaves the revision alone) when nothing changed.
    pub fn replace(&mut self, text: &str) -> bool {
        if self.text == text {
            return false;
        }
        self.text.clear();
        self.text.push_str(text);
        self.revision += 1;
        true
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE)
    }
}
