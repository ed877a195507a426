use super::error::SimulationError;
use super::period::{Period, resolve_period};
use super::tables::{Offer, find_offer, is_contracted_power};
use super::types::{
    Advisory, CostBreakdown, ExtraCharges, SavingsOutcome, ServiceInput, ServiceType,
    SimulationInput, SimulationResult,
};
use super::{electricity, gas};

/// Runs one simulation. Every validation happens before any arithmetic,
/// so the result is either complete or a single typed error.
pub fn simulate(input: &SimulationInput) -> Result<SimulationResult, SimulationError> {
    validate_amounts(input)?;
    let period = resolve_period(&input.period_months)?;
    let service = input.service.service_type();
    let offer = find_offer(service, &input.offer_id)?;

    let breakdown = match input.service {
        ServiceInput::Electricity {
            consumption_kwh,
            contracted_power_kw,
        } => electricity::compute(consumption_kwh, contracted_power_kw, &period, offer),
        ServiceInput::Gas {
            consumption_smc,
            annual_consumption_smc,
            region,
        } => gas::compute(consumption_smc, annual_consumption_smc, region, &period, offer),
    };

    Ok(compare(breakdown, offer, &period, input.extras, input.current_invoice_amount))
}

/// Combines a breakdown priced under `offer` over `period` with the invoice
/// extras and the customer's current bill.
pub fn compare(
    breakdown: CostBreakdown,
    offer: &Offer,
    period: &Period,
    extras: ExtraCharges,
    current_invoice_amount: f64,
) -> SimulationResult {
    let extra_charges = extras.total();
    let total_simulated_cost = breakdown.total() + extra_charges;
    let savings = current_invoice_amount - total_simulated_cost;

    let mut advisories = Vec::new();
    if breakdown.service == ServiceType::Gas && extras.tv_license_fee > 0.0 {
        advisories.push(Advisory::TvLicenseOnGas);
    }

    SimulationResult {
        service: breakdown.service,
        offer: offer.name.to_string(),
        month_indices: period.month_indices(),
        month_count: period.month_count(),
        tax_total: breakdown.tax_total(),
        base_cost: breakdown.base_cost(),
        breakdown,
        extras,
        extra_charges,
        total_simulated_cost,
        actual_invoice_amount: current_invoice_amount,
        savings,
        outcome: SavingsOutcome::from_savings(savings),
        advisories,
    }
}

fn ensure_non_negative(name: &str, value: f64) -> Result<(), SimulationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(SimulationError::InvalidInput(format!(
            "{name} must be a finite value >= 0, got {value}"
        )));
    }
    Ok(())
}

fn validate_amounts(input: &SimulationInput) -> Result<(), SimulationError> {
    match input.service {
        ServiceInput::Electricity {
            consumption_kwh,
            contracted_power_kw,
        } => {
            ensure_non_negative("consumptionKwh", consumption_kwh)?;
            ensure_non_negative("contractedPowerKw", contracted_power_kw)?;
            if !is_contracted_power(contracted_power_kw) {
                return Err(SimulationError::InvalidInput(format!(
                    "contractedPowerKw {contracted_power_kw} is not an available power level"
                )));
            }
        }
        ServiceInput::Gas {
            consumption_smc,
            annual_consumption_smc,
            ..
        } => {
            ensure_non_negative("consumptionSmc", consumption_smc)?;
            ensure_non_negative("annualConsumptionSmc", annual_consumption_smc)?;
        }
    }

    ensure_non_negative("currentInvoiceAmount", input.current_invoice_amount)?;
    for (name, value) in [
        ("socialBonus", input.extras.social_bonus),
        ("adjustments", input.extras.adjustments),
        ("otherCharges", input.extras.other_charges),
        ("tvLicenseFee", input.extras.tv_license_fee),
    ] {
        ensure_non_negative(name, value)?;
    }
    Ok(())
}
