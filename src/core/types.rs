use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::SimulationError;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    Electricity,
    Gas,
}

impl ServiceType {
    pub const ALL: [ServiceType; 2] = [ServiceType::Electricity, ServiceType::Gas];
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Electricity => f.write_str("electricity"),
            Self::Gas => f.write_str("gas"),
        }
    }
}

impl FromStr for ServiceType {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "electricity" | "electric" | "power" | "luce" => Ok(Self::Electricity),
            "gas" => Ok(Self::Gas),
            _ => Err(SimulationError::UnsupportedService(s.to_string())),
        }
    }
}

/// Excise region for gas. Only the two upper annual bands differ by region.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Region {
    #[default]
    #[serde(alias = "centroNord", alias = "centro_nord")]
    CentroNord,
    #[serde(alias = "south", alias = "southAndIslands", alias = "south_and_islands")]
    SouthAndIslands,
}

impl FromStr for Region {
    type Err = SimulationError;

    /// Accepts the serialized names, their camelCase or snake_case spellings, and `south`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_'))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "centronord" => Ok(Self::CentroNord),
            "south" | "southandislands" => Ok(Self::SouthAndIslands),
            _ => Err(SimulationError::InvalidInput(format!("unknown region `{s}`"))),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ServiceInput {
    Electricity {
        consumption_kwh: f64,
        contracted_power_kw: f64,
    },
    Gas {
        consumption_smc: f64,
        /// Drives the excise and VAT bands only.
        annual_consumption_smc: f64,
        region: Region,
    },
}

impl ServiceInput {
    pub fn service_type(&self) -> ServiceType {
        match self {
            Self::Electricity { .. } => ServiceType::Electricity,
            Self::Gas { .. } => ServiceType::Gas,
        }
    }
}

/// Ad-hoc amounts copied from the customer's invoice and added on top of the simulated cost.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraCharges {
    pub social_bonus: f64,
    pub adjustments: f64,
    pub other_charges: f64,
    pub tv_license_fee: f64,
}

impl ExtraCharges {
    pub fn total(&self) -> f64 {
        self.social_bonus + self.adjustments + self.other_charges + self.tv_license_fee
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SimulationInput {
    pub service: ServiceInput,
    /// One (monthly) or two (bimonthly) month identifiers, resolved by the period resolver.
    pub period_months: Vec<String>,
    pub offer_id: String,
    pub current_invoice_amount: f64,
    pub extras: ExtraCharges,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineKind {
    Commodity,
    Network,
    PowerCharge,
    SystemCharges,
    Commission,
    ExciseDuty,
    Vat,
}

/// Structural tax tag of a breakdown line.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineTag {
    Base,
    Excise,
    Vat,
}

impl LineTag {
    pub fn is_tax(self) -> bool {
        matches!(self, Self::Excise | Self::Vat)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub kind: LineKind,
    pub label: String,
    pub amount: f64,
    pub tag: LineTag,
}

impl LineItem {
    pub fn base(kind: LineKind, label: &str, amount: f64) -> Self {
        Self {
            kind,
            label: label.to_string(),
            amount,
            tag: LineTag::Base,
        }
    }

    pub fn excise(label: &str, amount: f64) -> Self {
        Self {
            kind: LineKind::ExciseDuty,
            label: label.to_string(),
            amount,
            tag: LineTag::Excise,
        }
    }

    /// The VAT line; its label embeds the integer percentage of `rate`.
    pub fn vat(rate: f64, amount: f64) -> Self {
        Self {
            kind: LineKind::Vat,
            label: format!("VAT ({:.0}%)", rate * 100.0),
            amount,
            tag: LineTag::Vat,
        }
    }

    pub fn is_tax(&self) -> bool {
        self.tag.is_tax()
    }
}

/// Ordered, service-specific list of cost lines with exactly one VAT line.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub service: ServiceType,
    pub vat_rate: f64,
    pub items: Vec<LineItem>,
}

impl CostBreakdown {
    pub fn total(&self) -> f64 {
        self.items.iter().map(|item| item.amount).sum()
    }

    pub fn tax_total(&self) -> f64 {
        self.items
            .iter()
            .filter(|item| item.is_tax())
            .map(|item| item.amount)
            .sum()
    }

    pub fn base_cost(&self) -> f64 {
        self.total() - self.tax_total()
    }

    pub fn get(&self, kind: LineKind) -> Option<&LineItem> {
        self.items.iter().find(|item| item.kind == kind)
    }

    pub fn amount(&self, kind: LineKind) -> f64 {
        self.get(kind).map_or(0.0, |item| item.amount)
    }

    pub fn vat_line(&self) -> Option<&LineItem> {
        self.items.iter().find(|item| item.tag == LineTag::Vat)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SavingsOutcome {
    Saving,
    /// The simulated offer costs more than the current invoice.
    Overspend,
}

impl SavingsOutcome {
    pub fn from_savings(savings: f64) -> Self {
        if savings < 0.0 {
            Self::Overspend
        } else {
            Self::Saving
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Advisory {
    /// A TV license fee was entered on a gas bill.
    TvLicenseOnGas,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub service: ServiceType,
    pub offer: String,
    pub month_indices: Vec<u32>,
    pub month_count: u32,
    pub breakdown: CostBreakdown,
    pub extras: ExtraCharges,
    pub extra_charges: f64,
    pub total_simulated_cost: f64,
    pub tax_total: f64,
    pub base_cost: f64,
    pub actual_invoice_amount: f64,
    pub savings: f64,
    pub outcome: SavingsOutcome,
    pub advisories: Vec<Advisory>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_names_parse_loosely() {
        assert_eq!(" Luce ".parse::<ServiceType>(), Ok(ServiceType::Electricity));
        assert_eq!("GAS".parse::<ServiceType>(), Ok(ServiceType::Gas));
        assert_eq!(
            "water".parse::<ServiceType>(),
            Err(SimulationError::UnsupportedService("water".to_string()))
        );
    }

    #[test]
    fn region_names_parse_in_any_spelling() {
        for name in ["centro-nord", "centroNord", "CENTRO_NORD"] {
            assert_eq!(name.parse::<Region>(), Ok(Region::CentroNord));
        }
        for name in ["south", "south-and-islands", "southAndIslands"] {
            assert_eq!(name.parse::<Region>(), Ok(Region::SouthAndIslands));
        }
        let err = "north".parse::<Region>().expect_err("not a region");
        assert_eq!(err.kind(), "invalid-input");
    }
}
