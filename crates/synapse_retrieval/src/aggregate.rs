//! Append-only instruction log with a deduplicating finalizer.
//!
//! The surrounding agent loop may re-emit overlapping instruction fragments
//! across several turns; this log is the one safeguard against duplicated
//! output. Its only external contract: distinct texts, first-seen order,
//! blank-line joined.

use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct InstructionLog {
    entries: Vec<String>,
}

impl InstructionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one instruction block in emission order.
    pub fn push(&mut self, text: impl Into<String>) {
        self.entries.push(text.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merge everything recorded so far into one document: first occurrence
    /// of each distinct text wins, exact repeats are discarded, survivors are
    /// joined with a blank line.
    pub fn finalize(&self) -> String {
        let mut seen = HashSet::new();
        let unique: Vec<&str> = self
            .entries
            .iter()
            .filter(|text| seen.insert(text.as_str()))
            .map(String::as_str)
            .collect();
        unique.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_keeps_first_occurrence_order() {
        let mut log = InstructionLog::new();
        for text in ["A", "B", "A", "C"] {
            log.push(text);
        }
        assert_eq!(log.finalize(), "A\n\nB\n\nC");
    }

    #[test]
    fn test_no_duplicates_passes_through() {
        let mut log = InstructionLog::new();
        log.push("I1");
        log.push("I2");
        assert_eq!(log.finalize(), "I1\n\nI2");
    }

    #[test]
    fn test_empty_log_finalizes_to_empty_string() {
        assert_eq!(InstructionLog::new().finalize(), "");
        assert!(InstructionLog::new().is_empty());
    }

    #[test]
    fn test_dedup_is_exact_not_fuzzy() {
        let mut log = InstructionLog::new();
        log.push("Do the thing");
        log.push("Do the thing ");
        // Trailing whitespace makes a distinct block.
        assert_eq!(log.finalize(), "Do the thing\n\nDo the thing ");
    }

    #[test]
    fn test_accumulates_across_rounds() {
        let mut log = InstructionLog::new();
        log.push("A");
        assert_eq!(log.finalize(), "A");
        // A later round re-emits A and adds B.
        log.push("A");
        log.push("B");
        assert_eq!(log.finalize(), "A\n\nB");
        assert_eq!(log.len(), 3);
    }
}
