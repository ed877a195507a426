use super::types::ServiceType;

/// Validation failures raised before any tariff arithmetic runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimulationError {
    #[error("invalid period: {0}")]
    InvalidPeriod(String),
    #[error("offer `{offer}` is not available for {service}")]
    InvalidOffer { service: ServiceType, offer: String },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unsupported service `{0}`")]
    UnsupportedService(String),
}

impl SimulationError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidPeriod(_) => "invalid-period",
            Self::InvalidOffer { .. } => "invalid-offer",
            Self::InvalidInput(_) => "invalid-input",
            Self::UnsupportedService(_) => "unsupported-service",
        }
    }
}
