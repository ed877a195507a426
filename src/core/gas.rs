use super::period::Period;
use super::tables::{Offer, average_wholesale};
use super::types::{CostBreakdown, LineItem, LineKind, Region, ServiceType};

pub const CONSUMPTION_CHARGE_RATE: f64 = 0.025;
pub const VARIABLE_DISTRIBUTION_RATE: f64 = 0.171530;
/// 31 days at the daily fixed distribution rate.
pub const FIXED_DISTRIBUTION_FEE: f64 = 31.0 * 0.140658;
pub const SYSTEM_CHARGE_PER_MONTH: f64 = 1.50;
pub const SYSTEM_VARIABLE_RATES: [f64; 2] = [0.07, 0.12];

/// Annual consumption up to which the reduced VAT rate applies, Smc.
pub const REDUCED_VAT_CEILING_SMC: f64 = 480.0;
pub const REDUCED_VAT_RATE: f64 = 0.10;
pub const STANDARD_VAT_RATE: f64 = 0.22;

/// Excise duty per Smc, selected by annual consumption band.
pub fn annual_excise_rate(annual_consumption_smc: f64, region: Region) -> f64 {
    if annual_consumption_smc <= 120.0 {
        0.044
    } else if annual_consumption_smc <= 480.0 {
        0.175
    } else if annual_consumption_smc <= 1560.0 {
        match region {
            Region::CentroNord => 0.170,
            Region::SouthAndIslands => 0.120,
        }
    } else {
        match region {
            Region::CentroNord => 0.186,
            Region::SouthAndIslands => 0.150,
        }
    }
}

pub fn vat_rate(annual_consumption_smc: f64) -> f64 {
    if annual_consumption_smc <= REDUCED_VAT_CEILING_SMC {
        REDUCED_VAT_RATE
    } else {
        STANDARD_VAT_RATE
    }
}

/// Itemised gas bill. Amounts are assumed validated.
pub fn compute(
    consumption_smc: f64,
    annual_consumption_smc: f64,
    region: Region,
    period: &Period,
    offer: &Offer,
) -> CostBreakdown {
    let months = f64::from(period.month_count());

    let final_unit_price = average_wholesale(ServiceType::Gas, period)
        + offer.unit_spread
        + CONSUMPTION_CHARGE_RATE;
    let commodity_cost = consumption_smc * final_unit_price;
    let network_cost =
        VARIABLE_DISTRIBUTION_RATE * consumption_smc + FIXED_DISTRIBUTION_FEE * months;
    let system_charges = SYSTEM_CHARGE_PER_MONTH * months
        + SYSTEM_VARIABLE_RATES[0] * consumption_smc
        + SYSTEM_VARIABLE_RATES[1] * consumption_smc;
    let commission_cost = offer.monthly_commission * months;
    let excise = annual_excise_rate(annual_consumption_smc, region) * consumption_smc;

    let rate = vat_rate(annual_consumption_smc);
    let taxable_base = commodity_cost + network_cost + system_charges + commission_cost + excise;
    let vat = taxable_base * rate;

    CostBreakdown {
        service: ServiceType::Gas,
        vat_rate: rate,
        items: vec![
            LineItem::base(LineKind::Commodity, "Gas Commodity / PSV", commodity_cost),
            LineItem::base(LineKind::Network, "Network (Distribution)", network_cost),
            LineItem::base(LineKind::SystemCharges, "System Charges", system_charges),
            LineItem::base(
                LineKind::Commission,
                "Commission & Fixed Fee",
                commission_cost,
            ),
            LineItem::excise("Excise Duty", excise),
            LineItem::vat(rate, vat),
        ],
    }
}
