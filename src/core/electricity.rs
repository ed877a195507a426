use super::period::Period;
use super::tables::{Offer, average_wholesale};
use super::types::{CostBreakdown, LineItem, LineKind, ServiceType};

pub const DISPATCHING_FEE: f64 = 0.020;
pub const SYSTEM_SURCHARGE_RATE: f64 = 0.03;
pub const NETWORK_UNIT_FEE: f64 = 0.0445;
pub const POWER_CHARGE_PER_MONTH: f64 = 2.10;
pub const SYSTEM_CHARGE_PER_MONTH: f64 = 1.90;
pub const EXCISE_RATE: f64 = 0.0227;
/// Monthly consumption exempt from excise duty, kWh.
pub const EXCISE_FREE_KWH_PER_MONTH: f64 = 150.0;
pub const VAT_RATE: f64 = 0.10;

/// Energy price per kWh before network charges and taxes.
pub fn unit_price(period: &Period, offer: &Offer) -> f64 {
    average_wholesale(ServiceType::Electricity, period)
        + offer.unit_spread
        + DISPATCHING_FEE
        + SYSTEM_SURCHARGE_RATE
}

pub fn excise_duty(consumption_kwh: f64, month_count: u32) -> f64 {
    let allowance = EXCISE_FREE_KWH_PER_MONTH * f64::from(month_count);
    (consumption_kwh - allowance).max(0.0) * EXCISE_RATE
}

/// Itemised electricity bill. Amounts are assumed validated.
pub fn compute(
    consumption_kwh: f64,
    contracted_power_kw: f64,
    period: &Period,
    offer: &Offer,
) -> CostBreakdown {
    let month_count = period.month_count();
    let months = f64::from(month_count);

    let energy_cost = consumption_kwh * unit_price(period, offer);
    let network_cost = consumption_kwh * NETWORK_UNIT_FEE;
    let power_cost = contracted_power_kw * POWER_CHARGE_PER_MONTH * months;
    let system_charges = SYSTEM_CHARGE_PER_MONTH * months;
    let commission_cost = offer.monthly_commission * months;
    let excise = excise_duty(consumption_kwh, month_count);

    let taxable_base =
        energy_cost + network_cost + power_cost + system_charges + commission_cost + excise;
    let vat = taxable_base * VAT_RATE;

    CostBreakdown {
        service: ServiceType::Electricity,
        vat_rate: VAT_RATE,
        items: vec![
            LineItem::base(LineKind::Commodity, "Energy Commodity", energy_cost),
            LineItem::base(LineKind::Network, "Network & Transport", network_cost),
            LineItem::base(LineKind::PowerCharge, "Power Charge", power_cost),
            LineItem::base(LineKind::SystemCharges, "System Charges", system_charges),
            LineItem::base(
                LineKind::Commission,
                "Commission & Fixed Fee",
                commission_cost,
            ),
            LineItem::excise("Excise Duty", excise),
            LineItem::vat(VAT_RATE, vat),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::period::resolve_period;
    use crate::core::tables::find_offer;
    use crate::core::types::LineTag;
    use proptest::prelude::{prop_assert, proptest};

    const EPS: f64 = 1e-9;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn family_offer() -> &'static Offer {
        find_offer(ServiceType::Electricity, "F&F").expect("known offer")
    }

    fn period(months: &[&str]) -> Period {
        resolve_period(months).expect("valid period")
    }

    #[test]
    fn january_monthly_bill_matches_hand_calculation() {
        let january = period(&["GENNAIO"]);
        let breakdown = compute(300.0, 3.0, &january, family_offer());

        assert_approx(unit_price(&january, family_offer()), 0.20103);
        assert_approx(breakdown.amount(LineKind::Commodity), 60.309);
        assert_approx(breakdown.amount(LineKind::Network), 13.35);
        assert_approx(breakdown.amount(LineKind::PowerCharge), 6.3);
        assert_approx(breakdown.amount(LineKind::SystemCharges), 1.9);
        assert_approx(breakdown.amount(LineKind::Commission), 8.5);
        assert_approx(breakdown.amount(LineKind::ExciseDuty), 3.405);

        let taxable = 60.309 + 13.35 + 6.3 + 1.9 + 8.5 + 3.405;
        assert_approx(breakdown.amount(LineKind::Vat), taxable * 0.10);
    }

    #[test]
    fn breakdown_has_seven_lines_in_order() {
        let breakdown = compute(120.0, 1.5, &period(&["APRILE"]), family_offer());
        let kinds: Vec<_> = breakdown.items.iter().map(|item| item.kind).collect();
        assert_eq!(
            kinds,
            vec![
                LineKind::Commodity,
                LineKind::Network,
                LineKind::PowerCharge,
                LineKind::SystemCharges,
                LineKind::Commission,
                LineKind::ExciseDuty,
                LineKind::Vat,
            ]
        );
        assert_eq!(breakdown.items[6].label, "VAT (10%)");
        assert_eq!(breakdown.items[6].tag, LineTag::Vat);
        assert_eq!(breakdown.items[5].tag, LineTag::Excise);
        assert!(breakdown.items[..5].iter().all(|item| !item.is_tax()));
    }

    #[test]
    fn bimonthly_period_averages_prices_and_doubles_fixed_fees() {
        let monthly = compute(200.0, 3.0, &period(&["1"]), family_offer());
        let bimonthly = compute(400.0, 3.0, &period(&["1", "2"]), family_offer());

        for kind in [
            LineKind::PowerCharge,
            LineKind::SystemCharges,
            LineKind::Commission,
        ] {
            assert_approx(bimonthly.amount(kind), 2.0 * monthly.amount(kind));
        }
        let expected_price = (0.14303 + 0.15036) / 2.0 + 0.008 + 0.020 + 0.03;
        assert_approx(bimonthly.amount(LineKind::Commodity), 400.0 * expected_price);
        // Allowance is 300 kWh over two months.
        assert_approx(bimonthly.amount(LineKind::ExciseDuty), 100.0 * EXCISE_RATE);
    }

    #[test]
    fn month_count_comes_from_the_resolved_period() {
        let breakdown = compute(100.0, 3.0, &period(&["MARZO"]), family_offer());
        assert_approx(breakdown.amount(LineKind::ExciseDuty), 0.0);
        assert_approx(breakdown.amount(LineKind::SystemCharges), SYSTEM_CHARGE_PER_MONTH);

        let december = compute(100.0, 3.0, &period(&["12"]), family_offer());
        assert_approx(
            december.amount(LineKind::Commodity),
            100.0 * (0.10800 + 0.008 + DISPATCHING_FEE + SYSTEM_SURCHARGE_RATE),
        );
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_excise_is_zero_within_allowance_and_linear_above(
            month_count in 1u32..3,
            within in 0u32..=300,
            above in 0u32..5_000,
        ) {
            let allowance = 150.0 * f64::from(month_count);
            let inside = f64::from(within).min(allowance);
            prop_assert!(excise_duty(inside, month_count) == 0.0);

            let excess = f64::from(above);
            let duty = excise_duty(allowance + excess, month_count);
            prop_assert!((duty - excess * EXCISE_RATE).abs() <= 1e-9);
        }

        #[test]
        fn prop_vat_is_ten_percent_of_the_other_lines(
            kwh in 0u32..10_000,
            power_idx in 0usize..9,
            month in 1u32..=12,
        ) {
            let kw = crate::core::tables::CONTRACTED_POWER_KW[power_idx];
            let month = month.to_string();
            let breakdown = compute(f64::from(kwh), kw, &period(&[month.as_str()]), family_offer());
            let base: f64 = breakdown.items[..6].iter().map(|item| item.amount).sum();
            prop_assert!((breakdown.amount(LineKind::Vat) - base * 0.10).abs() <= 1e-9);
            prop_assert!(breakdown.items.iter().all(|item| item.amount >= 0.0));
        }
    }
}
