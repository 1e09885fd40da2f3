use crate::result::{TestResult, TestStatus};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
        };
        f.write_str(name)
    }
}

/// Remediation suggested for one failed check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CorrectiveAction {
    pub test: String,
    pub action: String,
    pub severity: Severity,
}

/// (test name fragment, remediation, severity), first match wins.
const REMEDIATIONS: &[(&str, &str, Severity)] = &[
    (
        "Table Existence",
        "Install the ServiceNow package first: now-cli app install <package.zip>",
        Severity::Critical,
    ),
    (
        "System Properties",
        "Run post-install configuration or guided setup to create required properties",
        Severity::High,
    ),
    (
        "Data",
        "Check table permissions and ACL rules. User may lack write access.",
        Severity::High,
    ),
];

const GENERIC_REMEDIATION: &str = "Review test details and ServiceNow system logs for errors";

pub fn corrective_action_for(result: &TestResult) -> CorrectiveAction {
    let (action, severity) = REMEDIATIONS
        .iter()
        .find(|(fragment, _, _)| result.test_name.contains(*fragment))
        .map(|(_, action, severity)| (*action, *severity))
        .unwrap_or((GENERIC_REMEDIATION, Severity::Medium));

    CorrectiveAction {
        test: result.test_name.clone(),
        action: action.to_string(),
        severity,
    }
}

/// One action per failed result, in recorded order.
pub fn corrective_actions(results: &[TestResult]) -> Vec<CorrectiveAction> {
    results
        .iter()
        .filter(|r| r.status == TestStatus::Failed)
        .map(corrective_action_for)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::{
        ACCESS_CONTROL, DATA_ROUND_TRIP, SYSTEM_PROPERTIES, TABLE_EXISTENCE, UPDATE_SET,
    };

    fn failed(name: &str) -> TestResult {
        TestResult::new(name, TestStatus::Failed, "boom", None)
    }

    #[test]
    fn test_categories() {
        let actions = corrective_actions(&[
            failed(TABLE_EXISTENCE),
            failed(SYSTEM_PROPERTIES),
            failed(DATA_ROUND_TRIP),
            failed(ACCESS_CONTROL),
        ]);

        assert_eq!(actions.len(), 4);
        assert_eq!(actions[0].severity, Severity::Critical);
        assert!(actions[0].action.contains("now-cli app install"));
        assert_eq!(actions[1].severity, Severity::High);
        assert_eq!(actions[2].severity, Severity::High);
        assert!(actions[2].action.contains("write access"));
        assert_eq!(actions[3].severity, Severity::Medium);
        assert_eq!(actions[3].action, GENERIC_REMEDIATION);
        assert_eq!(actions[3].test, ACCESS_CONTROL);
    }

    #[test]
    fn test_only_failures_produce_actions() {
        let results = vec![
            TestResult::new(TABLE_EXISTENCE, TestStatus::Skipped, "missing", None),
            TestResult::new(UPDATE_SET, TestStatus::Passed, "ok", None),
        ];
        assert!(corrective_actions(&results).is_empty());
    }

    #[test]
    fn test_severity_serialization() {
        let json = serde_json::to_value(corrective_action_for(&failed(TABLE_EXISTENCE))).unwrap();
        assert_eq!(json["severity"], "critical");
        assert_eq!(json["test"], TABLE_EXISTENCE);
    }
}
