use serde::Serialize;

use super::error::SimulationError;
use super::period::Period;
use super::types::ServiceType;

/// Monthly PUN wholesale electricity price, €/kWh, January first.
pub const PUN: [f64; 12] = [
    0.14303, 0.15036, 0.12055, 0.09985, 0.09358, 0.11178, 0.11313, 0.10879, 0.10908, 0.11104,
    0.11709, 0.10800,
];

/// Monthly PSV wholesale gas price, €/Smc, January first.
pub const PSV: [f64; 12] = [
    0.388, 0.402, 0.403, 0.418, 0.422, 0.415, 0.410, 0.400, 0.388, 0.345, 0.350, 0.360,
];

/// Contracted power levels offered for residential electricity supply, kW.
pub const CONTRACTED_POWER_KW: [f64; 9] = [1.0, 1.5, 2.0, 2.5, 3.0, 4.5, 5.0, 5.5, 6.0];

pub const DEFAULT_OFFER: &str = "F&F";

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub name: &'static str,
    /// Markup over the wholesale index, per kWh or per Smc.
    pub unit_spread: f64,
    pub monthly_commission: f64,
}

const fn offer(name: &'static str, unit_spread: f64, monthly_commission: f64) -> Offer {
    Offer {
        name,
        unit_spread,
        monthly_commission,
    }
}

pub const ELECTRICITY_OFFERS: [Offer; 4] = [
    offer("Fast", 0.010, 10.0),
    offer("F&F", 0.008, 8.5),
    offer("Sind", 0.005, 7.0),
    offer("Smart", 0.010, 12.5),
];

pub const GAS_OFFERS: [Offer; 4] = [
    offer("Fast", 0.10, 10.0),
    offer("F&F", 0.08, 8.5),
    offer("Sind", 0.05, 7.0),
    offer("Smart", 0.10, 12.5),
];

pub fn offers(service: ServiceType) -> &'static [Offer] {
    match service {
        ServiceType::Electricity => &ELECTRICITY_OFFERS,
        ServiceType::Gas => &GAS_OFFERS,
    }
}

/// Looks an offer up by name, ignoring ASCII case and surrounding whitespace.
pub fn find_offer(service: ServiceType, offer_id: &str) -> Result<&'static Offer, SimulationError> {
    let wanted = offer_id.trim();
    offers(service)
        .iter()
        .find(|offer| offer.name.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| SimulationError::InvalidOffer {
            service,
            offer: offer_id.to_string(),
        })
}

pub fn wholesale_curve(service: ServiceType) -> &'static [f64; 12] {
    match service {
        ServiceType::Electricity => &PUN,
        ServiceType::Gas => &PSV,
    }
}

/// Arithmetic mean of the wholesale curve over the months of a period.
pub fn average_wholesale(service: ServiceType, period: &Period) -> f64 {
    let curve = wholesale_curve(service);
    let sum: f64 = period
        .months()
        .iter()
        .map(|month| curve[month.offset()])
        .sum();
    sum / f64::from(period.month_count())
}

pub fn is_contracted_power(kw: f64) -> bool {
    CONTRACTED_POWER_KW.iter().any(|&allowed| allowed == kw)
}
