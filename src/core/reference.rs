//! Annual reference tariff: a simplified residential/business estimate kept
//! apart from the month and offer resolving engine.

use serde::{Deserialize, Serialize};

use super::error::SimulationError;
use super::types::{CostBreakdown, LineItem, LineKind, ServiceType};

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientType {
    #[default]
    Residential,
    Business,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TariffKind {
    #[default]
    Fixed,
    Variable,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Location {
    #[serde(alias = "north", alias = "northItaly")]
    NorthItaly,
    #[default]
    Other,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ReferenceInput {
    pub service: ServiceType,
    pub client: ClientType,
    pub annual_consumption: f64,
    pub tariff: TariffKind,
    /// Only affects gas.
    pub location: Location,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceEstimate {
    pub breakdown: CostBreakdown,
    pub total: f64,
    pub benchmark: f64,
    pub savings_vs_benchmark: f64,
}

const ELECTRICITY_REFERENCE_PRICE: f64 = 0.12;
const GAS_REFERENCE_PRICE: f64 = 0.45;
const SYSTEM_CHARGES_FIXED: f64 = 100.00;
const SYSTEM_CHARGES_VARIABLE: f64 = 0.015;
const ELECTRICITY_EXCISE: f64 = 0.022;

fn vat_rate(client: ClientType) -> f64 {
    match client {
        ClientType::Residential => 0.10,
        ClientType::Business => 0.22,
    }
}

pub fn estimate(input: &ReferenceInput) -> Result<ReferenceEstimate, SimulationError> {
    let consumption = input.annual_consumption;
    if !consumption.is_finite() || consumption < 0.0 {
        return Err(SimulationError::InvalidInput(format!(
            "annualConsumption must be a finite value >= 0, got {consumption}"
        )));
    }

    let (commodity, transport, system, excise, benchmark_factor) = match input.service {
        ServiceType::Electricity => {
            let unit_price = match input.tariff {
                TariffKind::Fixed => 0.165,
                TariffKind::Variable => ELECTRICITY_REFERENCE_PRICE + 0.02,
            };
            (
                consumption * unit_price,
                0.08 * consumption + 70.0,
                SYSTEM_CHARGES_FIXED + consumption * SYSTEM_CHARGES_VARIABLE,
                consumption * ELECTRICITY_EXCISE,
                1.15,
            )
        }
        ServiceType::Gas => {
            let coefficient = match input.location {
                Location::NorthItaly => 1.05,
                Location::Other => 1.0,
            };
            let corrected = consumption * coefficient;
            let unit_price = match input.tariff {
                TariffKind::Fixed => 0.60,
                TariffKind::Variable => GAS_REFERENCE_PRICE + 0.05,
            };
            (
                corrected * unit_price,
                0.2 * consumption + 50.0,
                45.0 + consumption * 0.005,
                0.05 * corrected,
                1.10,
            )
        }
    };

    let rate = vat_rate(input.client);
    let vat = (commodity + transport + system + excise) * rate;
    let breakdown = CostBreakdown {
        service: input.service,
        vat_rate: rate,
        items: vec![
            LineItem::base(LineKind::Commodity, "Commodity", commodity),
            LineItem::base(LineKind::Network, "Transport & Metering", transport),
            LineItem::base(LineKind::SystemCharges, "System Charges", system),
            LineItem::excise("Excise Duty", excise),
            LineItem::vat(rate, vat),
        ],
    };

    let total = breakdown.total();
    let benchmark = total * benchmark_factor;
    Ok(ReferenceEstimate {
        breakdown,
        total,
        benchmark,
        savings_vs_benchmark: benchmark - total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn residential_fixed_electricity() {
        let estimate = estimate(&ReferenceInput {
            service: ServiceType::Electricity,
            client: ClientType::Residential,
            annual_consumption: 2_700.0,
            tariff: TariffKind::Fixed,
            location: Location::Other,
        })
        .expect("valid input");

        let subtotal = 2_700.0 * 0.165 + (0.08 * 2_700.0 + 70.0) + (100.0 + 2_700.0 * 0.015)
            + 2_700.0 * 0.022;
        assert_approx(estimate.total, subtotal * 1.10);
        assert_approx(estimate.benchmark, estimate.total * 1.15);
        assert_approx(estimate.savings_vs_benchmark, estimate.total * 0.15);
        assert_eq!(estimate.breakdown.items[4].label, "VAT (10%)");
    }

    #[test]
    fn business_variable_gas_in_the_north() {
        let estimate = estimate(&ReferenceInput {
            service: ServiceType::Gas,
            client: ClientType::Business,
            annual_consumption: 1_000.0,
            tariff: TariffKind::Variable,
            location: Location::NorthItaly,
        })
        .expect("valid input");

        let corrected = 1_050.0;
        assert_approx(estimate.breakdown.amount(LineKind::Commodity), corrected * 0.50);
        assert_approx(estimate.breakdown.amount(LineKind::ExciseDuty), corrected * 0.05);
        assert_approx(estimate.breakdown.amount(LineKind::Network), 250.0);
        assert_approx(estimate.breakdown.vat_rate, 0.22);
        assert_approx(estimate.benchmark, estimate.total * 1.10);
    }

    #[test]
    fn breakdown_total_matches_estimate_total() {
        let estimate = estimate(&ReferenceInput {
            service: ServiceType::Gas,
            client: ClientType::Residential,
            annual_consumption: 800.0,
            tariff: TariffKind::Fixed,
            location: Location::Other,
        })
        .expect("valid input");
        assert_approx(estimate.breakdown.total(), estimate.total);
        let breakdown = &estimate.breakdown;
        assert_approx(
            breakdown.tax_total(),
            breakdown.amount(LineKind::ExciseDuty) + breakdown.amount(LineKind::Vat),
        );
    }

    #[test]
    fn rejects_negative_consumption() {
        let err = estimate(&ReferenceInput {
            service: ServiceType::Electricity,
            client: ClientType::Residential,
            annual_consumption: -10.0,
            tariff: TariffKind::Fixed,
            location: Location::Other,
        })
        .expect_err("negative consumption");
        assert_eq!(err.kind(), "invalid-input");
    }
}
