// Summary cards for the national and state pages

use super::format::{count_f64, currency, currency_f64, percent, ratio, thousands};
use crate::query::Totals;
use crate::record::NumericField;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryCard {
    /// DOM slot the card is drawn into
    pub id: &'static str,
    pub title: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
}

impl SummaryCard {
    fn new(id: &'static str, title: String, value: String, subtitle: impl Into<String>) -> Self {
        SummaryCard {
            id,
            title,
            value,
            subtitle: Some(subtitle.into()),
        }
    }
}

/// Labels shared by every card on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardContext {
    /// "FY22" or "FY10-FY22"
    pub period: String,
    /// First fiscal year of the table, for the "Average since" lines
    pub since_year: u16,
}

fn per_year(totals: &Totals, field: NumericField) -> f64 {
    if totals.years == 0 {
        0.0
    } else {
        totals.get(field) as f64 / totals.years as f64
    }
}

/// The seven national overview cards.
///
/// `current` is the selected year/categories, `all_time` the same category
/// selection across every year.
pub fn national_cards(current: &Totals, all_time: &Totals, ctx: &CardContext) -> Vec<SummaryCard> {
    let total_exp = current.get(NumericField::TotalSsbgExpenditures);
    let total_rec = current.get(NumericField::TotalRecipients);
    let ssbg = current.get(NumericField::SsbgExpenditures);
    let tanf = current.get(NumericField::TanfTransferFunds);
    let children = current.get(NumericField::Children);
    let adults = current.get(NumericField::TotalAdults);

    let all_exp = all_time.get(NumericField::TotalSsbgExpenditures);
    let all_rec = all_time.get(NumericField::TotalRecipients);
    let since = format!("Average since {}", ctx.since_year);

    vec![
        SummaryCard::new(
            "total-ssbg-expenditures",
            format!("Total SSBG Expenditures {}", ctx.period),
            currency(total_exp),
            format!(
                "{}: {}",
                since,
                currency_f64(per_year(all_time, NumericField::TotalSsbgExpenditures))
            ),
        ),
        SummaryCard::new(
            "avg-per-person",
            format!("Average $ per Recipient {}", ctx.period),
            currency_f64(ratio(total_exp, total_rec)),
            format!("{}: {}", since, currency_f64(ratio(all_exp, all_rec))),
        ),
        SummaryCard::new(
            "total-recipients",
            format!("Total Recipients {}", ctx.period),
            thousands(total_rec),
            format!(
                "{}: {}",
                since,
                count_f64(per_year(all_time, NumericField::TotalRecipients))
            ),
        ),
        SummaryCard::new(
            "ssbg-expenditures",
            format!("SSBG Expenditures {}", ctx.period),
            currency(ssbg),
            format!("{} of the Total SSBG Expenditures", percent(ssbg, total_exp)),
        ),
        SummaryCard::new(
            "tanf-transfer",
            format!("TANF Transfer Funds {}", ctx.period),
            currency(tanf),
            format!("{} of the Total SSBG Expenditures", percent(tanf, total_exp)),
        ),
        SummaryCard::new(
            "children",
            format!("Children Served {}", ctx.period),
            thousands(children),
            format!("{} of the Total Recipients", percent(children, total_rec)),
        ),
        SummaryCard::new(
            "adults",
            format!("Adults Served {}", ctx.period),
            thousands(adults),
            format!("{} of the Total Recipients", percent(adults, total_rec)),
        ),
    ]
}

/// The four state report cards.
pub fn state_cards(current: &Totals, all_time: &Totals, ctx: &CardContext) -> Vec<SummaryCard> {
    let total_exp = current.get(NumericField::TotalSsbgExpenditures);
    let total_rec = current.get(NumericField::TotalRecipients);
    let avg_exp = per_year(all_time, NumericField::TotalSsbgExpenditures);
    let avg_rec = per_year(all_time, NumericField::TotalRecipients);
    let since = format!("Average since {}", ctx.since_year);

    let avg_per_recipient_since = if avg_rec > 0.0 { avg_exp / avg_rec } else { 0.0 };

    vec![
        SummaryCard::new(
            "total-ssbg-expenditures",
            format!("Total SSBG Expenditures {}", ctx.period),
            currency(total_exp),
            format!("{}: {}", since, currency_f64(avg_exp)),
        ),
        SummaryCard::new(
            "total-recipients",
            format!("Total Recipients {}", ctx.period),
            thousands(total_rec),
            format!("{}: {}", since, count_f64(avg_rec)),
        ),
        SummaryCard::new(
            "service-categories",
            format!("Service Categories Funded {}", ctx.period),
            current.service_categories.to_string(),
            "service categories funded in whole or in part.",
        ),
        SummaryCard::new(
            "avg-expenditure",
            format!("Average per Recipient {}", ctx.period),
            currency_f64(ratio(total_exp, total_rec)),
            format!("{}: {}", since, currency_f64(avg_per_recipient_since)),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::RecordSet;
    use crate::record::fixtures::record;

    fn ctx() -> CardContext {
        CardContext {
            period: "FY20".to_string(),
            since_year: 2019,
        }
    }

    #[test]
    fn test_national_cards() {
        let records = vec![
            record(2019, "Alabama", "Child Care", 100, 10),
            record(2020, "Alabama", "Adult Day Care", 200, 20),
        ];
        let all = RecordSet::new(&records);
        let current = all.filter_by_year(2020).totals();
        let cards = national_cards(&current, &all.totals(), &ctx());

        assert_eq!(cards.len(), 7);
        assert_eq!(cards[0].title, "Total SSBG Expenditures FY20");
        assert_eq!(cards[0].value, "$200");
        assert_eq!(cards[0].subtitle.as_deref(), Some("Average since 2019: $150"));
        assert_eq!(cards[1].value, "$10");
        assert_eq!(cards[2].value, "20");
        assert_eq!(cards[2].subtitle.as_deref(), Some("Average since 2019: 15"));
        // fixture splits 25% of expenditures into TANF transfers
        assert_eq!(cards[4].value, "$50");
        assert_eq!(
            cards[4].subtitle.as_deref(),
            Some("25% of the Total SSBG Expenditures")
        );
        assert_eq!(cards[5].subtitle.as_deref(), Some("50% of the Total Recipients"));
    }

    #[test]
    fn test_empty_selection_has_no_division_by_zero() {
        let cards = national_cards(&Totals::default(), &Totals::default(), &ctx());
        assert_eq!(cards[1].value, "$0");
        assert_eq!(cards[3].subtitle.as_deref(), Some("0% of the Total SSBG Expenditures"));

        let cards = state_cards(&Totals::default(), &Totals::default(), &ctx());
        assert_eq!(cards[2].value, "0");
        assert_eq!(cards[3].value, "$0");
    }

    #[test]
    fn test_state_cards_count_categories() {
        let records = vec![
            record(2020, "Alaska", "Child Care", 40, 4),
            record(2020, "Alaska", "Transportation", 60, 6),
        ];
        let all = RecordSet::new(&records);
        let cards = state_cards(&all.totals(), &all.totals(), &ctx());

        assert_eq!(cards[2].title, "Service Categories Funded FY20");
        assert_eq!(cards[2].value, "2");
        assert_eq!(cards[3].value, "$10");
        assert_eq!(cards[3].subtitle.as_deref(), Some("Average since 2019: $10"));
    }
}
