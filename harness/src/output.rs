//! Console rendering for a validation run.
//!
//! Color is plain ANSI and can be switched off with `--no-color` or the
//! `NO_COLOR` environment variable.

use crate::result::{TestResult, TestStatus, TestSummary};

const RULE_WIDTH: usize = 60;

#[derive(Debug, Clone, Copy)]
pub struct Console {
    color: bool,
}

impl Default for Console {
    fn default() -> Self {
        Self::new(std::env::var_os("NO_COLOR").is_none())
    }
}

impl Console {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    pub fn color_enabled(&self) -> bool {
        self.color
    }

    fn colorize(&self, text: &str, color_code: &str) -> String {
        if self.color {
            format!("\x1b[{}m{}\x1b[0m", color_code, text)
        } else {
            text.to_string()
        }
    }

    fn status_color(status: TestStatus) -> &'static str {
        match status {
            TestStatus::Passed => "92",
            TestStatus::Failed => "91",
            TestStatus::Skipped => "93",
        }
    }

    pub fn format_result(&self, result: &TestResult) -> String {
        let tag = format!("[{}]", result.status.label());
        format!(
            "{} {}: {}",
            self.colorize(&tag, Self::status_color(result.status)),
            result.test_name,
            result.message
        )
    }

    pub fn result(&self, result: &TestResult) {
        println!("{}", self.format_result(result));
    }

    pub fn line(&self, text: &str) {
        println!("{}", text);
    }

    pub fn banner(&self, app_name: &str) {
        println!();
        println!("{}", "=".repeat(RULE_WIDTH));
        println!("ServiceNow Integration Test Suite: {}", app_name);
        println!("{}\n", "=".repeat(RULE_WIDTH));
    }

    pub fn format_summary(&self, summary: &TestSummary) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        let mut out = String::new();
        out.push_str(&format!("\n{}\n", rule));
        out.push_str("TEST SUMMARY\n");
        out.push_str(&format!("{}\n", rule));
        out.push_str(&format!("Total Tests:  {}\n", summary.total_tests));
        out.push_str(&format!(
            "Passed:       {}\n",
            self.colorize(&summary.passed.to_string(), "92")
        ));
        out.push_str(&format!(
            "Failed:       {}\n",
            self.colorize(&summary.failed.to_string(), "91")
        ));
        out.push_str(&format!(
            "Skipped:      {}\n",
            self.colorize(&summary.skipped.to_string(), "93")
        ));
        out.push_str(&format!("Duration:     {}ms\n", summary.duration));
        out.push_str(&format!("{}\n", rule));
        out
    }

    pub fn summary(&self, summary: &TestSummary) {
        println!("{}", self.format_summary(summary));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_result_line() {
        let result = TestResult::new("ACL Validation", TestStatus::Skipped, "No ACL rules found", None);
        let line = Console::plain().format_result(&result);
        assert_eq!(line, "[SKIPPED] ACL Validation: No ACL rules found");
    }

    #[test]
    fn test_colored_result_line() {
        let result = TestResult::new("Table Existence Check", TestStatus::Passed, "ok", None);
        let line = Console::new(true).format_result(&result);
        assert!(line.starts_with("\x1b[92m[PASSED]\x1b[0m"));

        let result = TestResult::new("Table Existence Check", TestStatus::Failed, "boom", None);
        let line = Console::new(true).format_result(&result);
        assert!(line.starts_with("\x1b[91m[FAILED]\x1b[0m"));
    }

    #[test]
    fn test_summary_block() {
        let summary = TestSummary::from_results(
            vec![
                TestResult::new("a", TestStatus::Passed, "", None),
                TestResult::new("b", TestStatus::Failed, "", None),
            ],
            42,
        );
        let text = Console::plain().format_summary(&summary);
        assert!(text.contains("Total Tests:  2"));
        assert!(text.contains("Passed:       1"));
        assert!(text.contains("Failed:       1"));
        assert!(text.contains("Skipped:      0"));
        assert!(text.contains("Duration:     42ms"));
    }
}
