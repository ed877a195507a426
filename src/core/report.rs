use std::fmt;

use serde::Serialize;

use super::types::{Advisory, SavingsOutcome, SimulationResult};

const UNSPECIFIED_CUSTOMER: &str = "Not specified";

/// Formats an amount as `€ 1.234,56`.
pub fn format_currency(value: f64) -> String {
    let digits = format!("{:.2}", value.abs());
    let (integer, decimals) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let is_zero = !digits.bytes().any(|b| matches!(b, b'1'..=b'9'));
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };
    format!("€ {sign}{grouped},{decimals}")
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub label: String,
    pub amount: String,
}

/// Presentation-ready view of a simulation, every amount already formatted.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub title: String,
    pub customer: String,
    pub savings: String,
    pub outcome: SavingsOutcome,
    pub total: String,
    pub base_cost: String,
    pub current_invoice: String,
    pub rows: Vec<ReportRow>,
    pub advisories: Vec<String>,
}

impl Report {
    pub fn new(result: &SimulationResult, customer: Option<&str>) -> Self {
        let mut rows: Vec<ReportRow> = result
            .breakdown
            .items
            .iter()
            .map(|item| ReportRow {
                label: item.label.clone(),
                amount: format_currency(item.amount),
            })
            .collect();

        let extras = &result.extras;
        for (label, amount) in [
            ("TV License Fee", extras.tv_license_fee),
            ("Social Bonus", extras.social_bonus),
            ("Adjustments", extras.adjustments),
            ("Other Charges", extras.other_charges),
        ] {
            if amount > 0.0 {
                rows.push(ReportRow {
                    label: label.to_string(),
                    amount: format_currency(amount),
                });
            }
        }

        let months = if result.month_count == 1 { "month" } else { "months" };
        Self {
            title: format!(
                "Offer {} simulation ({} {months})",
                result.offer, result.month_count
            ),
            customer: customer
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .unwrap_or(UNSPECIFIED_CUSTOMER)
                .to_string(),
            savings: format_currency(result.savings),
            outcome: result.outcome,
            total: format_currency(result.total_simulated_cost),
            base_cost: format_currency(result.base_cost),
            current_invoice: format_currency(result.actual_invoice_amount),
            rows,
            advisories: result.advisories.iter().map(advisory_text).collect(),
        }
    }
}

fn advisory_text(advisory: &Advisory) -> String {
    match advisory {
        Advisory::TvLicenseOnGas => {
            "The TV license fee does not apply to gas bills; check the value.".to_string()
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "Customer: {}", self.customer)?;
        writeln!(f)?;

        let width = self
            .rows
            .iter()
            .map(|row| row.label.chars().count())
            .max()
            .unwrap_or(0)
            .max("Estimated total".len());
        for row in &self.rows {
            writeln!(f, "  {:<width$}  {:>14}", row.label, row.amount)?;
        }
        writeln!(f, "  {:<width$}  {:>14}", "Estimated total", self.total)?;
        writeln!(f)?;

        writeln!(f, "Base cost (excl. taxes): {}", self.base_cost)?;
        writeln!(f, "Current invoice:         {}", self.current_invoice)?;
        let verdict = match self.outcome {
            SavingsOutcome::Saving => "Potential saving",
            SavingsOutcome::Overspend => "Extra cost",
        };
        write!(f, "{verdict}: {}", self.savings)?;
        for advisory in &self.advisories {
            write!(f, "\nWarning: {advisory}")?;
        }
        Ok(())
    }
}
