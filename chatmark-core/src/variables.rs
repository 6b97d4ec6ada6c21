//! Template variable reconciliation.
//!
//! Cross-checks three sets of variable names:
//!
//! - **declared**: names listed in the template's metadata
//! - **used**: names referenced in the template body
//! - **supplied**: keys of the values passed by the caller
//!
//! and reports every inconsistency. Reporting never fails; callers decide
//! which issues are fatal.
//!
//! ## Example
//!
//! ```rust
//! use chatmark_core::variables::reconcile;
//! use indexmap::IndexSet;
//!
//! let declared: IndexSet<String> = ["a", "b"].into_iter().map(String::from).collect();
//! let used: IndexSet<String> = ["b", "c"].into_iter().map(String::from).collect();
//! let supplied: IndexSet<String> = ["b"].into_iter().map(String::from).collect();
//!
//! let report = reconcile(&declared, &used, &supplied);
//! assert_eq!(
//!     report.messages(),
//!     vec![
//!         "a: declared but not supplied",
//!         "a: declared but not used",
//!         "c: used but not declared",
//!         "c: used but not supplied",
//!     ]
//! );
//! ```

use indexmap::IndexSet;
use serde::{Serialize, Serializer};
use std::fmt;

/// One inconsistency between the variable sets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VariableIssue {
    /// Declared in metadata, no value supplied.
    DeclaredNotSupplied(String),
    /// Declared in metadata, never referenced in the body.
    DeclaredNotUsed(String),
    /// Value supplied for a name that is not declared.
    SuppliedNotDeclared(String),
    /// Value supplied for a name the body never references.
    SuppliedNotUsed(String),
    /// Referenced in the body without a declaration.
    UsedNotDeclared(String),
    /// Referenced in the body without a supplied value.
    UsedNotSupplied(String),
}

impl VariableIssue {
    /// The variable this issue is about.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::DeclaredNotSupplied(n)
            | Self::DeclaredNotUsed(n)
            | Self::SuppliedNotDeclared(n)
            | Self::SuppliedNotUsed(n)
            | Self::UsedNotDeclared(n)
            | Self::UsedNotSupplied(n) => n,
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Self::DeclaredNotSupplied(_) => "declared but not supplied",
            Self::DeclaredNotUsed(_) => "declared but not used",
            Self::SuppliedNotDeclared(_) => "supplied but not declared",
            Self::SuppliedNotUsed(_) => "supplied but not used",
            Self::UsedNotDeclared(_) => "used but not declared",
            Self::UsedNotSupplied(_) => "used but not supplied",
        }
    }
}

impl fmt::Display for VariableIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name(), self.description())
    }
}

/// Ordered list of variable issues.
///
/// Issues appear in discovery order: the declared pass, then the supplied
/// pass, then the used pass. Serializes as a list of message strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableReport {
    issues: Vec<VariableIssue>,
}

impl VariableReport {
    /// Create an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an issue.
    pub fn push(&mut self, issue: VariableIssue) {
        self.issues.push(issue);
    }

    /// True when all three sets agree.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Number of issues.
    #[must_use]
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Get the issues.
    #[must_use]
    pub fn issues(&self) -> &[VariableIssue] {
        &self.issues
    }

    /// Iterate over the issues.
    pub fn iter(&self) -> std::slice::Iter<'_, VariableIssue> {
        self.issues.iter()
    }

    /// Human-readable diagnostics, one per issue.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }
}

impl<'a> IntoIterator for &'a VariableReport {
    type Item = &'a VariableIssue;
    type IntoIter = std::slice::Iter<'a, VariableIssue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.iter()
    }
}

impl Serialize for VariableReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.issues.iter().map(ToString::to_string))
    }
}

impl fmt::Display for VariableReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

/// Reconcile declared, used and supplied variable names.
///
/// Within each pass, issues follow the iteration order of that pass's set.
pub fn reconcile(
    declared: &IndexSet<String>,
    used: &IndexSet<String>,
    supplied: &IndexSet<String>,
) -> VariableReport {
    let mut report = VariableReport::new();

    for name in declared {
        if !supplied.contains(name) {
            report.push(VariableIssue::DeclaredNotSupplied(name.clone()));
        }
        if !used.contains(name) {
            report.push(VariableIssue::DeclaredNotUsed(name.clone()));
        }
    }

    for name in supplied {
        if !declared.contains(name) {
            report.push(VariableIssue::SuppliedNotDeclared(name.clone()));
        }
        if !used.contains(name) {
            report.push(VariableIssue::SuppliedNotUsed(name.clone()));
        }
    }

    for name in used {
        if !declared.contains(name) {
            report.push(VariableIssue::UsedNotDeclared(name.clone()));
        }
        if !supplied.contains(name) {
            report.push(VariableIssue::UsedNotSupplied(name.clone()));
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn set(names: &[&str]) -> IndexSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_mixed_sets() {
        let report = reconcile(&set(&["a", "b"]), &set(&["b", "c"]), &set(&["b"]));
        assert_eq!(
            report.messages(),
            vec![
                "a: declared but not supplied",
                "a: declared but not used",
                "c: used but not declared",
                "c: used but not supplied",
            ]
        );
        assert!(report.iter().all(|i| i.name() != "b"));
    }

    #[test]
    fn test_consistent_sets() {
        let all = set(&["x", "y"]);
        let report = reconcile(&all, &all, &all);
        assert!(report.is_empty());
        assert_eq!(report.to_string(), "");
    }

    #[test]
    fn test_all_empty() {
        assert!(reconcile(&set(&[]), &set(&[]), &set(&[])).is_empty());
    }

    #[rstest]
    #[case::declared_only(&["v"], &[], &[], vec![
        VariableIssue::DeclaredNotSupplied("v".into()),
        VariableIssue::DeclaredNotUsed("v".into()),
    ])]
    #[case::supplied_only(&[], &[], &["v"], vec![
        VariableIssue::SuppliedNotDeclared("v".into()),
        VariableIssue::SuppliedNotUsed("v".into()),
    ])]
    #[case::used_only(&[], &["v"], &[], vec![
        VariableIssue::UsedNotDeclared("v".into()),
        VariableIssue::UsedNotSupplied("v".into()),
    ])]
    #[case::declared_and_supplied(&["v"], &[], &["v"], vec![
        VariableIssue::DeclaredNotUsed("v".into()),
        VariableIssue::SuppliedNotUsed("v".into()),
    ])]
    #[case::supplied_and_used(&[], &["v"], &["v"], vec![
        VariableIssue::SuppliedNotDeclared("v".into()),
        VariableIssue::UsedNotDeclared("v".into()),
    ])]
    fn test_single_variable(
        #[case] declared: &[&str],
        #[case] used: &[&str],
        #[case] supplied: &[&str],
        #[case] expected: Vec<VariableIssue>,
    ) {
        let report = reconcile(&set(declared), &set(used), &set(supplied));
        assert_eq!(report.issues(), expected.as_slice());
    }

    #[test]
    fn test_pass_order() {
        // declared pass, then supplied pass, then used pass
        let report = reconcile(&set(&["d"]), &set(&["u"]), &set(&["s"]));
        assert_eq!(
            report.messages(),
            vec![
                "d: declared but not supplied",
                "d: declared but not used",
                "s: supplied but not declared",
                "s: supplied but not used",
                "u: used but not declared",
                "u: used but not supplied",
            ]
        );
    }

    #[test]
    fn test_serialize_as_messages() {
        let report = reconcile(&set(&[]), &set(&["q"]), &set(&["q"]));
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            serde_json::json!(["q: supplied but not declared", "q: used but not declared"])
        );
    }
}
