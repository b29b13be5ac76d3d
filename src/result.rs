//! Operation results.
//!
//! Every Manager operation produces an ordered list of display lines, one
//! per varbind in wire order (`<oid> = <value>`), or a single line for a
//! protocol-level error (`<status> at <index>`). Line order follows the
//! agent's response ordering; for walks it is the traversal order.

use crate::varbind::VarBind;

/// Ordered result of a Manager operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationResult {
    lines: Vec<String>,
}

impl OperationResult {
    /// Create an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a varbind as a `<oid> = <value>` line.
    pub fn push_varbind(&mut self, varbind: &VarBind) {
        self.lines.push(varbind.to_string());
    }

    /// Append a preformatted line (protocol error reporting).
    pub fn push_line(&mut self, line: String) {
        self.lines.push(line);
    }

    /// The result lines, in order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Consume the result, yielding the lines.
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True if no lines were produced.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Iterate over the lines.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.lines.iter()
    }
}

impl std::fmt::Display for OperationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", line)?;
        }
        Ok(())
    }
}

impl IntoIterator for OperationResult {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.into_iter()
    }
}

impl<'a> IntoIterator for &'a OperationResult {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}
