use std::str::FromStr;

use serde::Serialize;

use super::error::SimulationError;

/// Billing month vocabulary, in calendar order.
pub const MONTH_NAMES: [&str; 12] = [
    "GENNAIO",
    "FEBBRAIO",
    "MARZO",
    "APRILE",
    "MAGGIO",
    "GIUGNO",
    "LUGLIO",
    "AGOSTO",
    "SETTEMBRE",
    "OTTOBRE",
    "NOVEMBRE",
    "DICEMBRE",
];

/// Calendar month, stored as its 1-based index.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
pub struct Month(u32);

impl Month {
    pub fn from_index(index: u32) -> Option<Self> {
        (1..=12).contains(&index).then_some(Self(index))
    }

    pub fn index(self) -> u32 {
        self.0
    }

    /// Zero-based position in the 12-entry monthly tables.
    pub fn offset(self) -> usize {
        (self.0 - 1) as usize
    }

    pub fn name(self) -> &'static str {
        MONTH_NAMES[self.offset()]
    }
}

impl FromStr for Month {
    type Err = SimulationError;

    /// Accepts a month name (any case) or an ordinal `1`..`12`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(index) = trimmed.parse::<u32>() {
            return Self::from_index(index)
                .ok_or_else(|| SimulationError::InvalidPeriod(format!("no month number {index}")));
        }
        MONTH_NAMES
            .iter()
            .position(|name| name.eq_ignore_ascii_case(trimmed))
            .map(|position| Self(position as u32 + 1))
            .ok_or_else(|| SimulationError::InvalidPeriod(format!("unknown month `{s}`")))
    }
}

/// One or two distinct months. Only `resolve_period` builds one.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Period {
    months: Vec<Month>,
}

impl Period {
    pub fn month_indices(&self) -> Vec<u32> {
        self.months.iter().map(|month| month.index()).collect()
    }

    /// Scales every per-month fixed charge.
    pub fn month_count(&self) -> u32 {
        self.months.len() as u32
    }

    pub fn months(&self) -> &[Month] {
        &self.months
    }
}

/// Resolves a monthly or bimonthly period from one or two distinct month identifiers.
pub fn resolve_period<S: AsRef<str>>(identifiers: &[S]) -> Result<Period, SimulationError> {
    if identifiers.is_empty() || identifiers.len() > 2 {
        return Err(SimulationError::InvalidPeriod(format!(
            "expected 1 or 2 months, got {}",
            identifiers.len()
        )));
    }

    let months = identifiers
        .iter()
        .map(|id| id.as_ref().parse::<Month>())
        .collect::<Result<Vec<_>, _>>()?;

    if let [first, second] = months.as_slice() {
        if first == second {
            return Err(SimulationError::InvalidPeriod(format!(
                "bimonthly period repeats {}",
                first.name()
            )));
        }
    }

    Ok(Period { months })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_month_names_and_ordinals() {
        let period = resolve_period(&["GENNAIO"]).expect("valid period");
        assert_eq!(period.month_indices(), vec![1]);
        assert_eq!(period.month_count(), 1);

        let period = resolve_period(&["novembre", " 12 "]).expect("valid period");
        assert_eq!(period.month_indices(), vec![11, 12]);
        assert_eq!(period.month_count(), 2);
    }

    #[test]
    fn month_indices_stay_within_the_calendar() {
        assert_eq!(Month::from_index(0), None);
        assert_eq!(Month::from_index(13), None);
        for index in 1..=12 {
            let month = Month::from_index(index).expect("calendar month");
            assert_eq!(month.offset(), index as usize - 1);
            assert_eq!(month.name().parse::<Month>(), Ok(month));
        }

        let err = resolve_period(&["0"]).expect_err("no month zero");
        assert!(matches!(err, SimulationError::InvalidPeriod(_)));
    }

    #[test]
    fn keeps_the_order_of_non_adjacent_months() {
        let period = resolve_period(&["DICEMBRE", "MARZO"]).expect("valid period");
        assert_eq!(period.month_indices(), vec![12, 3]);
        assert_eq!(period.months()[0].name(), "DICEMBRE");
    }

    #[test]
    fn rejects_unknown_month_names() {
        let err = resolve_period(&["JANUARY"]).expect_err("not in vocabulary");
        assert!(matches!(err, SimulationError::InvalidPeriod(_)));

        let err = resolve_period(&["13"]).expect_err("out of range");
        assert!(matches!(err, SimulationError::InvalidPeriod(_)));
    }

    #[test]
    fn rejects_wrong_period_lengths() {
        let empty: [&str; 0] = [];
        assert!(matches!(
            resolve_period(&empty),
            Err(SimulationError::InvalidPeriod(_))
        ));
        assert!(matches!(
            resolve_period(&["1", "2", "3"]),
            Err(SimulationError::InvalidPeriod(_))
        ));
    }

    #[test]
    fn rejects_repeated_month_in_bimonthly_period() {
        let err = resolve_period(&["MAGGIO", "5"]).expect_err("same month twice");
        assert!(matches!(err, SimulationError::InvalidPeriod(_)));
    }
}
