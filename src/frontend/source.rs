use std::sync::Arc;

/// A compilation unit's text, kept line by line so diagnostics can quote it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub lines: Vec<String>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, text: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            lines: text.lines().map(str::to_string).collect(),
        })
    }

    /// Placeholder used when tokens are built by hand rather than scanned.
    pub fn anonymous() -> Arc<Self> {
        Arc::new(Self {
            name: "<tokens>".to_string(),
            lines: Vec::new(),
        })
    }

    /// 1-based line lookup.
    pub fn line(&self, line: usize) -> Option<&str> {
        line.checked_sub(1)
            .and_then(|idx| self.lines.get(idx))
            .map(String::as_str)
    }
}
