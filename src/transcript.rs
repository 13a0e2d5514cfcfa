//! Human-readable pass/fail output.
//!
//! Write errors on the underlying sink are ignored: a closed stdout must not
//! turn a passing check into a failing one.

use std::fmt::Display;
use std::io::Write;

const RULE_WIDTH: usize = 60;

pub const PASS: &str = "✓";
pub const FAIL: &str = "✗";

pub struct Transcript<'w> {
    out: &'w mut dyn Write,
}

impl<'w> Transcript<'w> {
    pub fn new(out: &'w mut dyn Write) -> Self {
        Transcript { out }
    }

    /// Unindented line without a marker.
    pub fn plain(&mut self, text: impl Display) {
        let _ = writeln!(self.out, "{text}");
    }

    pub fn blank(&mut self) {
        self.plain("");
    }

    /// Program banner, printed once.
    pub fn title(&mut self, text: &str) {
        self.blank();
        self.plain(text);
    }

    /// A section framed by `=` rules.
    pub fn heading(&mut self, text: &str) {
        let rule = "=".repeat(RULE_WIDTH);
        self.blank();
        self.plain(&rule);
        self.plain(text);
        self.plain(&rule);
    }

    pub fn pass(&mut self, text: impl Display) {
        self.plain(format_args!("{PASS} {text}"));
    }

    pub fn fail(&mut self, text: impl Display) {
        self.plain(format_args!("{FAIL} {text}"));
    }

    /// Indented informational line.
    pub fn detail(&mut self, text: impl Display) {
        self.plain(format_args!("  {text}"));
    }

    /// Indented list entry.
    pub fn item(&mut self, text: impl Display) {
        self.plain(format_args!("  - {text}"));
    }

    /// A failure followed by the error's cause chain and, when captured, its backtrace.
    pub fn fail_with_trace(&mut self, context: &str, err: &anyhow::Error) {
        self.fail(format_args!("{context}: {err:#}"));
        self.trace(format_args!("{err:?}"));
    }

    /// Every line of `text`, indented under the preceding failure.
    pub fn trace(&mut self, text: impl Display) {
        for line in text.to_string().lines() {
            self.plain(format_args!("    {line}"));
        }
    }

    pub fn flush(&mut self) {
        let _ = self.out.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    fn render(f: impl FnOnce(&mut Transcript<'_>)) -> String {
        let mut buf = Vec::new();
        f(&mut Transcript::new(&mut buf));
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_markers() {
        let text = render(|t| {
            t.pass("ok");
            t.fail("broken");
            t.detail("Version: 1");
            t.item("GTiff");
        });
        assert_eq!(text, "✓ ok\n✗ broken\n  Version: 1\n  - GTiff\n");
    }

    #[test]
    fn test_heading() {
        let text = render(|t| t.heading("Test 1: Import"));
        let rule = "=".repeat(60);
        assert_eq!(text, format!("\n{rule}\nTest 1: Import\n{rule}\n"));
    }

    #[test]
    fn test_trace_indents_every_line() {
        let text = render(|t| t.trace("first\nsecond"));
        assert_eq!(text, "    first\n    second\n");
    }

    #[test]
    fn test_fail_with_trace_includes_cause() {
        let err = Err::<(), _>(std::io::Error::other("disk gone"))
            .context("writing band")
            .unwrap_err();
        let text = render(|t| t.fail_with_trace("Round trip failed", &err));
        assert!(text.starts_with("✗ Round trip failed: writing band: disk gone\n"));
        assert!(text.contains("    Caused by:"));
    }
}
