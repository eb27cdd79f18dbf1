// Load-time validation of the per-row total invariants
//
// The cleaned table is expected to satisfy three sums. Nothing upstream
// enforces them, so every record is checked once when the store loads and
// mismatches are reported (or rejected under strict loading).

use crate::record::GrantRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// RULES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvariantRule {
    /// total_ssbg_expenditures = ssbg_expenditures + tanf_transfer_funds
    SsbgTotal,
    /// total_adults = adults_59_and_younger + adults_60_and_older + adults_unknown
    AdultTotal,
    /// total_recipients = children + total_adults
    RecipientTotal,
}

impl InvariantRule {
    pub fn column(&self) -> &'static str {
        match self {
            InvariantRule::SsbgTotal => "total_ssbg_expenditures",
            InvariantRule::AdultTotal => "total_adults",
            InvariantRule::RecipientTotal => "total_recipients",
        }
    }

    fn check(&self, r: &GrantRecord) -> (u64, u64) {
        match self {
            InvariantRule::SsbgTotal => (
                r.ssbg_expenditures.saturating_add(r.tanf_transfer_funds),
                r.total_ssbg_expenditures,
            ),
            InvariantRule::AdultTotal => (
                r.adults_59_and_younger
                    .saturating_add(r.adults_60_and_older)
                    .saturating_add(r.adults_unknown),
                r.total_adults,
            ),
            InvariantRule::RecipientTotal => {
                (r.children.saturating_add(r.total_adults), r.total_recipients)
            }
        }
    }
}

// ============================================================================
// ISSUES & REPORT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// 0-based record position in the loaded table
    pub row: usize,
    pub year: u16,
    pub state_name: String,
    pub service_category: String,
    pub rule: InvariantRule,
    /// Sum of the component columns
    pub expected: u64,
    /// Value found in the total column
    pub actual: u64,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "row {} ({} {} / {}): {} is {} but components sum to {}",
            self.row,
            self.year,
            self.state_name,
            self.service_category,
            self.rule.column(),
            self.actual,
            self.expected
        )
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub checked: usize,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn count(&self, rule: InvariantRule) -> usize {
        self.issues.iter().filter(|i| i.rule == rule).count()
    }

    pub fn summary(&self) -> String {
        format!(
            "checked {} records: {} ssbg total, {} adult total, {} recipient total mismatches",
            self.checked,
            self.count(InvariantRule::SsbgTotal),
            self.count(InvariantRule::AdultTotal),
            self.count(InvariantRule::RecipientTotal),
        )
    }
}

// ============================================================================
// VALIDATOR
// ============================================================================

pub fn validate_record(row: usize, record: &GrantRecord) -> Vec<ValidationIssue> {
    [
        InvariantRule::SsbgTotal,
        InvariantRule::AdultTotal,
        InvariantRule::RecipientTotal,
    ]
    .into_iter()
    .filter_map(|rule| {
        let (expected, actual) = rule.check(record);
        (expected != actual).then(|| ValidationIssue {
            row,
            year: record.year,
            state_name: record.state_name.clone(),
            service_category: record.service_category.clone(),
            rule,
            expected,
            actual,
        })
    })
    .collect()
}

pub fn validate_batch(records: &[GrantRecord]) -> ValidationReport {
    let issues = records
        .iter()
        .enumerate()
        .flat_map(|(row, record)| validate_record(row, record))
        .collect();

    ValidationReport {
        checked: records.len(),
        issues,
    }
}
