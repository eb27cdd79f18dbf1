// Grant Record - one row of the cleaned SSBG table
// One observation per (fiscal year, state/territory, service category)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// GRANT RECORD
// ============================================================================

/// A single SSBG observation.
///
/// Field names match the column headers of the cleaned data file, so the
/// same struct is used to read the source table and to write CSV exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantRecord {
    pub year: u16,
    pub state_name: String,

    /// Form line of the annual report the row was transcribed from
    #[serde(default)]
    pub line_num: Option<u32>,

    pub service_category: String,

    // ------------------------------------------------------------------------
    // Expenditures (whole dollars)
    // ------------------------------------------------------------------------
    pub ssbg_expenditures: u64,
    pub tanf_transfer_funds: u64,
    pub total_ssbg_expenditures: u64,
    pub other_fed_state_and_local_funds: u64,
    pub total_expenditures: u64,

    // ------------------------------------------------------------------------
    // Recipients (head counts)
    // ------------------------------------------------------------------------
    pub children: u64,
    pub adults_59_and_younger: u64,
    pub adults_60_and_older: u64,
    pub adults_unknown: u64,
    pub total_adults: u64,
    pub total_recipients: u64,
}

impl GrantRecord {
    /// Read one numeric column.
    pub fn value(&self, field: NumericField) -> u64 {
        match field {
            NumericField::SsbgExpenditures => self.ssbg_expenditures,
            NumericField::TanfTransferFunds => self.tanf_transfer_funds,
            NumericField::TotalSsbgExpenditures => self.total_ssbg_expenditures,
            NumericField::OtherFedStateAndLocalFunds => self.other_fed_state_and_local_funds,
            NumericField::TotalExpenditures => self.total_expenditures,
            NumericField::Children => self.children,
            NumericField::Adults59AndYounger => self.adults_59_and_younger,
            NumericField::Adults60AndOlder => self.adults_60_and_older,
            NumericField::AdultsUnknown => self.adults_unknown,
            NumericField::TotalAdults => self.total_adults,
            NumericField::TotalRecipients => self.total_recipients,
        }
    }
}

// ============================================================================
// NUMERIC FIELDS
// ============================================================================

/// Every aggregatable column of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericField {
    SsbgExpenditures,
    TanfTransferFunds,
    TotalSsbgExpenditures,
    OtherFedStateAndLocalFunds,
    TotalExpenditures,
    Children,
    #[serde(rename = "adults_59_and_younger")]
    Adults59AndYounger,
    #[serde(rename = "adults_60_and_older")]
    Adults60AndOlder,
    AdultsUnknown,
    TotalAdults,
    TotalRecipients,
}

impl NumericField {
    pub const ALL: [NumericField; 11] = [
        NumericField::SsbgExpenditures,
        NumericField::TanfTransferFunds,
        NumericField::TotalSsbgExpenditures,
        NumericField::OtherFedStateAndLocalFunds,
        NumericField::TotalExpenditures,
        NumericField::Children,
        NumericField::Adults59AndYounger,
        NumericField::Adults60AndOlder,
        NumericField::AdultsUnknown,
        NumericField::TotalAdults,
        NumericField::TotalRecipients,
    ];

    /// Column header in the data file
    pub fn column(&self) -> &'static str {
        match self {
            NumericField::SsbgExpenditures => "ssbg_expenditures",
            NumericField::TanfTransferFunds => "tanf_transfer_funds",
            NumericField::TotalSsbgExpenditures => "total_ssbg_expenditures",
            NumericField::OtherFedStateAndLocalFunds => "other_fed_state_and_local_funds",
            NumericField::TotalExpenditures => "total_expenditures",
            NumericField::Children => "children",
            NumericField::Adults59AndYounger => "adults_59_and_younger",
            NumericField::Adults60AndOlder => "adults_60_and_older",
            NumericField::AdultsUnknown => "adults_unknown",
            NumericField::TotalAdults => "total_adults",
            NumericField::TotalRecipients => "total_recipients",
        }
    }

    /// Human readable column title
    pub fn display_name(&self) -> &'static str {
        match self {
            NumericField::SsbgExpenditures => "SSBG Expenditures",
            NumericField::TanfTransferFunds => "TANF Transfer Funds",
            NumericField::TotalSsbgExpenditures => "Total SSBG Expenditures",
            NumericField::OtherFedStateAndLocalFunds => "All Other Federal/State/Local Funds",
            NumericField::TotalExpenditures => "Total Expenditures",
            NumericField::Children => "Children Served",
            NumericField::Adults59AndYounger => "Adults 59 and Younger Served",
            NumericField::Adults60AndOlder => "Adults 60 and Older Served",
            NumericField::AdultsUnknown => "Adults Unknown Age Served",
            NumericField::TotalAdults => "Total Adults Served",
            NumericField::TotalRecipients => "Total Recipients Served",
        }
    }

    /// Dollar amounts are formatted with a currency sign, counts are not
    pub fn is_currency(&self) -> bool {
        matches!(
            self,
            NumericField::SsbgExpenditures
                | NumericField::TanfTransferFunds
                | NumericField::TotalSsbgExpenditures
                | NumericField::OtherFedStateAndLocalFunds
                | NumericField::TotalExpenditures
        )
    }
}

// ============================================================================
// METRIC TOGGLE
// ============================================================================

/// The user-facing expenditures / recipients switch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Expenditures,
    #[default]
    Recipients,
}

impl Metric {
    /// Column the toggle reads from
    pub fn field(&self) -> NumericField {
        match self {
            Metric::Expenditures => NumericField::TotalSsbgExpenditures,
            Metric::Recipients => NumericField::TotalRecipients,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Expenditures => "expenditures",
            Metric::Recipients => "recipients",
        }
    }

    /// Title-cased label ("Expenditures", "Recipients")
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Expenditures => "Expenditures",
            Metric::Recipients => "Recipients",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "expenditures" => Ok(Metric::Expenditures),
            "recipients" => Ok(Metric::Recipients),
            other => Err(format!("unknown metric '{}' (expected expenditures or recipients)", other)),
        }
    }
}

// ============================================================================
// COLUMN LAYOUT
// ============================================================================

/// Source table column order, also used for exports and the data table
pub const COLUMNS: [&str; 15] = [
    "year",
    "state_name",
    "line_num",
    "service_category",
    "ssbg_expenditures",
    "tanf_transfer_funds",
    "total_ssbg_expenditures",
    "other_fed_state_and_local_funds",
    "total_expenditures",
    "children",
    "adults_59_and_younger",
    "adults_60_and_older",
    "adults_unknown",
    "total_adults",
    "total_recipients",
];

/// Display title for any column header, numeric or not
pub fn display_name(column: &str) -> &str {
    match column {
        "year" => "Year",
        "state_name" => "State",
        "line_num" => "Form Line",
        "service_category" => "Service Category",
        other => NumericField::ALL
            .iter()
            .find(|f| f.column() == other)
            .map(|f| f.display_name())
            .unwrap_or(other),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::GrantRecord;

    /// Build a record whose component columns satisfy every total invariant
    pub fn record(year: u16, state: &str, category: &str, expenditures: u64, recipients: u64) -> GrantRecord {
        let tanf = expenditures / 4;
        let children = recipients / 2;
        let adults = recipients - children;
        GrantRecord {
            year,
            state_name: state.to_string(),
            line_num: Some(1),
            service_category: category.to_string(),
            ssbg_expenditures: expenditures - tanf,
            tanf_transfer_funds: tanf,
            total_ssbg_expenditures: expenditures,
            other_fed_state_and_local_funds: expenditures * 2,
            total_expenditures: expenditures * 3,
            children,
            adults_59_and_younger: adults,
            adults_60_and_older: 0,
            adults_unknown: 0,
            total_adults: adults,
            total_recipients: recipients,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_maps_to_total_columns() {
        assert_eq!(Metric::Expenditures.field(), NumericField::TotalSsbgExpenditures);
        assert_eq!(Metric::Recipients.field(), NumericField::TotalRecipients);
        assert_eq!(Metric::default(), Metric::Recipients);
    }

    #[test]
    fn test_metric_parse() {
        assert_eq!("Expenditures".parse::<Metric>().unwrap(), Metric::Expenditures);
        assert_eq!(" recipients ".parse::<Metric>().unwrap(), Metric::Recipients);
        assert!("dollars".parse::<Metric>().is_err());
    }

    #[test]
    fn test_value_reads_every_field() {
        let r = fixtures::record(2020, "Ohio", "Case Management", 400, 10);
        assert_eq!(r.value(NumericField::TotalSsbgExpenditures), 400);
        assert_eq!(r.value(NumericField::TanfTransferFunds), 100);
        assert_eq!(r.value(NumericField::SsbgExpenditures), 300);
        assert_eq!(r.value(NumericField::Children), 5);
        assert_eq!(r.value(NumericField::TotalAdults), 5);
        assert_eq!(r.value(NumericField::TotalRecipients), 10);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(display_name("line_num"), "Form Line");
        assert_eq!(
            display_name("other_fed_state_and_local_funds"),
            "All Other Federal/State/Local Funds"
        );
        assert_eq!(display_name("mystery"), "mystery");
        assert!(NumericField::TotalExpenditures.is_currency());
        assert!(!NumericField::Children.is_currency());
    }

    #[test]
    fn test_serde_field_names_match_columns() {
        for field in NumericField::ALL {
            let json = serde_json::to_string(&field).unwrap();
            assert_eq!(json, format!("\"{}\"", field.column()));
        }
    }
}
