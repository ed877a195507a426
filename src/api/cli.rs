use std::net::IpAddr;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::core::reference::{self, ClientType, Location, ReferenceInput, TariffKind};
use crate::core::tables::DEFAULT_OFFER;
use crate::core::{
    ExtraCharges, Region, Report, ServiceInput, ServiceType, SimulationError, SimulationInput,
    format_currency, simulate,
};

#[derive(Parser, Debug)]
#[command(
    name = "billsim",
    version,
    about = "Electricity and gas bill simulator for fixed-rate offers"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the HTTP API.
    Serve(ServeArgs),
    /// Simulate one bill and compare it against the current invoice.
    Simulate(Box<SimulateArgs>),
    /// Annual estimate with the simplified reference tariff.
    Reference(ReferenceArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, env = "BILLSIM_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,
    #[arg(long, env = "BILLSIM_PORT", default_value_t = 8080)]
    pub port: u16,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliPeriod {
    Monthly,
    Bimonthly,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliRegion {
    CentroNord,
    South,
}

impl From<CliRegion> for Region {
    fn from(value: CliRegion) -> Self {
        match value {
            CliRegion::CentroNord => Region::CentroNord,
            CliRegion::South => Region::SouthAndIslands,
        }
    }
}

impl From<Region> for CliRegion {
    fn from(value: Region) -> Self {
        match value {
            Region::CentroNord => CliRegion::CentroNord,
            Region::SouthAndIslands => CliRegion::South,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    #[arg(
        long,
        default_value = "electricity",
        help = "Service to simulate: electricity (luce) or gas"
    )]
    pub service: ServiceType,
    #[arg(
        long,
        default_value = DEFAULT_OFFER,
        help = "Commercial offer: Fast, F&F, Sind or Smart"
    )]
    pub offer: String,
    #[arg(long, value_enum, default_value_t = CliPeriod::Monthly)]
    pub period: CliPeriod,
    #[arg(long, default_value = "GENNAIO", help = "First billed month, by name or number")]
    pub start_month: String,
    #[arg(long, help = "Second billed month; required for a bimonthly period")]
    pub end_month: Option<String>,
    #[arg(long, default_value_t = 300.0)]
    pub consumption_kwh: f64,
    #[arg(long, default_value_t = 3.0, help = "Contracted power in kW")]
    pub contracted_power_kw: f64,
    #[arg(long, default_value_t = 150.0)]
    pub consumption_smc: f64,
    #[arg(
        long,
        default_value_t = 1800.0,
        help = "Annual gas consumption, selects excise and VAT bands"
    )]
    pub annual_consumption_smc: f64,
    #[arg(long, value_enum, default_value_t = CliRegion::CentroNord)]
    pub region: CliRegion,
    #[arg(long, default_value_t = 250.0, help = "Total of the customer's current invoice")]
    pub current_invoice: f64,
    #[arg(long, default_value_t = 0.0)]
    pub social_bonus: f64,
    #[arg(long, default_value_t = 0.0)]
    pub adjustments: f64,
    #[arg(long, default_value_t = 0.0)]
    pub other_charges: f64,
    #[arg(long, default_value_t = 0.0, help = "TV license fee (electricity bills only)")]
    pub tv_license_fee: f64,
    #[arg(long)]
    pub customer: Option<String>,
    #[arg(long, help = "Print the JSON result instead of the report")]
    pub json: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliClient {
    Residential,
    Business,
}

impl From<CliClient> for ClientType {
    fn from(value: CliClient) -> Self {
        match value {
            CliClient::Residential => ClientType::Residential,
            CliClient::Business => ClientType::Business,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliTariff {
    Fixed,
    Variable,
}

impl From<CliTariff> for TariffKind {
    fn from(value: CliTariff) -> Self {
        match value {
            CliTariff::Fixed => TariffKind::Fixed,
            CliTariff::Variable => TariffKind::Variable,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ReferenceArgs {
    #[arg(long, default_value = "electricity")]
    pub service: ServiceType,
    #[arg(long, value_enum, default_value_t = CliClient::Residential)]
    pub client: CliClient,
    #[arg(long, default_value_t = 2700.0, help = "Annual consumption in kWh or Smc")]
    pub annual_consumption: f64,
    #[arg(long, value_enum, default_value_t = CliTariff::Fixed)]
    pub tariff: CliTariff,
    #[arg(long, help = "Gas supply in northern Italy")]
    pub north: bool,
    #[arg(long)]
    pub json: bool,
}

pub fn default_simulate_args() -> SimulateArgs {
    SimulateArgs {
        service: ServiceType::Electricity,
        offer: DEFAULT_OFFER.to_string(),
        period: CliPeriod::Monthly,
        start_month: "GENNAIO".to_string(),
        end_month: None,
        consumption_kwh: 300.0,
        contracted_power_kw: 3.0,
        consumption_smc: 150.0,
        annual_consumption_smc: 1800.0,
        region: CliRegion::CentroNord,
        current_invoice: 250.0,
        social_bonus: 0.0,
        adjustments: 0.0,
        other_charges: 0.0,
        tv_license_fee: 0.0,
        customer: None,
        json: false,
    }
}

pub fn build_input(args: &SimulateArgs) -> Result<SimulationInput, SimulationError> {
    let mut period_months = vec![args.start_month.clone()];
    if args.period == CliPeriod::Bimonthly {
        let Some(end_month) = &args.end_month else {
            return Err(SimulationError::InvalidPeriod(
                "a bimonthly period needs an end month".to_string(),
            ));
        };
        period_months.push(end_month.clone());
    }

    let service = match args.service {
        ServiceType::Electricity => ServiceInput::Electricity {
            consumption_kwh: args.consumption_kwh,
            contracted_power_kw: args.contracted_power_kw,
        },
        ServiceType::Gas => ServiceInput::Gas {
            consumption_smc: args.consumption_smc,
            annual_consumption_smc: args.annual_consumption_smc,
            region: args.region.into(),
        },
    };

    Ok(SimulationInput {
        service,
        period_months,
        offer_id: args.offer.clone(),
        current_invoice_amount: args.current_invoice,
        extras: ExtraCharges {
            social_bonus: args.social_bonus,
            adjustments: args.adjustments,
            other_charges: args.other_charges,
            tv_license_fee: args.tv_license_fee,
        },
    })
}

pub fn build_reference_input(args: &ReferenceArgs) -> ReferenceInput {
    ReferenceInput {
        service: args.service,
        client: args.client.into(),
        annual_consumption: args.annual_consumption,
        tariff: args.tariff.into(),
        location: if args.north {
            Location::NorthItaly
        } else {
            Location::Other
        },
    }
}

/// Runs the `simulate` subcommand and returns the text to print.
pub fn run_simulate(args: &SimulateArgs) -> Result<String, SimulationError> {
    let input = build_input(args)?;
    let result = simulate(&input)?;
    if args.json {
        return Ok(serde_json::to_string_pretty(&result).expect("results serialize"));
    }
    Ok(Report::new(&result, args.customer.as_deref()).to_string())
}

/// Runs the `reference` subcommand and returns the text to print.
pub fn run_reference(args: &ReferenceArgs) -> Result<String, SimulationError> {
    let estimate = reference::estimate(&build_reference_input(args))?;
    if args.json {
        return Ok(serde_json::to_string_pretty(&estimate).expect("estimates serialize"));
    }

    let mut lines: Vec<String> = estimate
        .breakdown
        .items
        .iter()
        .map(|item| format!("  {:<22}  {:>14}", item.label, format_currency(item.amount)))
        .collect();
    lines.push(format!("  {:<22}  {:>14}", "Annual total", format_currency(estimate.total)));
    lines.push(format!("Benchmark: {}", format_currency(estimate.benchmark)));
    lines.push(format!(
        "Savings vs benchmark: {}",
        format_currency(estimate.savings_vs_benchmark)
    ));
    Ok(lines.join("\n"))
}
