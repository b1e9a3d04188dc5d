use std::fmt;

use crate::utils::config::labels::{LABEL_PREFIX, LABEL_WIDTH};

/// A jump target, e.g. `IL_0003`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Label(String);

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hands out labels that are unique within one compilation, numbered from 1.
#[derive(Debug, Default)]
pub struct LabelAllocator {
    issued: u32,
}

impl LabelAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_label(&mut self) -> Label {
        self.issued += 1;
        Label(format!("{}{:0width$}", LABEL_PREFIX, self.issued, width = LABEL_WIDTH))
    }
}
