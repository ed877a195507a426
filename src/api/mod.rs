pub mod cli;

use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::reference::{self, ClientType, Location, ReferenceInput, TariffKind};
use crate::core::tables::{self, CONTRACTED_POWER_KW, DEFAULT_OFFER, Offer};
use crate::core::{
    MONTH_NAMES, Region, Report, ServiceType, SimulationError, SimulationResult, simulate,
};

use cli::{CliPeriod, SimulateArgs, build_input, default_simulate_args};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SimulatePayload {
    service: Option<String>,
    offer: Option<String>,
    period: Option<String>,
    start_month: Option<String>,
    end_month: Option<String>,

    consumption_kwh: Option<f64>,
    contracted_power_kw: Option<f64>,
    consumption_smc: Option<f64>,
    annual_consumption_smc: Option<f64>,
    region: Option<String>,

    current_invoice: Option<f64>,
    social_bonus: Option<f64>,
    adjustments: Option<f64>,
    other_charges: Option<f64>,
    tv_license_fee: Option<f64>,
    customer: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ReferencePayload {
    service: Option<String>,
    client: Option<ClientType>,
    annual_consumption: Option<f64>,
    tariff: Option<TariffKind>,
    location: Option<Location>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulateResponse {
    result: SimulationResult,
    report: Report,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ServiceCatalog {
    service: ServiceType,
    offers: &'static [Offer],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CatalogResponse {
    services: Vec<ServiceCatalog>,
    default_offer: &'static str,
    months: [&'static str; 12],
    contracted_power_kw: [f64; 9],
    regions: [Region; 2],
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    kind: &'static str,
}

pub fn router() -> Router {
    Router::new()
        .route(
            "/api/simulate",
            get(simulate_get_handler).post(simulate_post_handler),
        )
        .route(
            "/api/reference",
            get(reference_get_handler).post(reference_post_handler),
        )
        .route("/api/catalog", get(catalog_handler))
        .fallback(not_found_handler)
}

pub async fn run_http_server(addr: SocketAddr) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "billsim HTTP API listening");
    axum::serve(listener, router()).await
}

async fn not_found_handler() -> Response {
    json_response(
        StatusCode::NOT_FOUND,
        serde_json::json!({ "error": "Not found" }),
    )
}

async fn simulate_get_handler(payload: Result<Query<SimulatePayload>, QueryRejection>) -> Response {
    match payload {
        Ok(Query(payload)) => simulate_handler_impl(payload),
        Err(rejection) => rejected(&malformed(rejection.body_text())),
    }
}

async fn simulate_post_handler(payload: Result<Json<SimulatePayload>, JsonRejection>) -> Response {
    match payload {
        Ok(Json(payload)) => simulate_handler_impl(payload),
        Err(rejection) => rejected(&malformed(rejection.body_text())),
    }
}

fn simulate_handler_impl(payload: SimulatePayload) -> Response {
    let customer = payload.customer.clone();
    let outcome = args_from_payload(payload)
        .and_then(|args| build_input(&args))
        .and_then(|input| simulate(&input));

    match outcome {
        Ok(result) => {
            tracing::info!(
                service = %result.service,
                offer = %result.offer,
                months = result.month_count,
                total = result.total_simulated_cost,
                savings = result.savings,
                "simulation completed"
            );
            let report = Report::new(&result, customer.as_deref());
            json_response(StatusCode::OK, SimulateResponse { result, report })
        }
        Err(err) => rejected(&err),
    }
}

async fn reference_get_handler(
    payload: Result<Query<ReferencePayload>, QueryRejection>,
) -> Response {
    match payload {
        Ok(Query(payload)) => reference_handler_impl(payload),
        Err(rejection) => rejected(&malformed(rejection.body_text())),
    }
}

async fn reference_post_handler(
    payload: Result<Json<ReferencePayload>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(payload)) => reference_handler_impl(payload),
        Err(rejection) => rejected(&malformed(rejection.body_text())),
    }
}

fn reference_handler_impl(payload: ReferencePayload) -> Response {
    let outcome =
        reference_input_from_payload(payload).and_then(|input| reference::estimate(&input));

    match outcome {
        Ok(estimate) => {
            tracing::info!(
                service = %estimate.breakdown.service,
                total = estimate.total,
                "reference estimate completed"
            );
            json_response(StatusCode::OK, estimate)
        }
        Err(err) => rejected(&err),
    }
}

async fn catalog_handler() -> Response {
    json_response(StatusCode::OK, catalog())
}

fn catalog() -> CatalogResponse {
    CatalogResponse {
        services: ServiceType::ALL
            .iter()
            .map(|&service| ServiceCatalog {
                service,
                offers: tables::offers(service),
            })
            .collect(),
        default_offer: DEFAULT_OFFER,
        months: MONTH_NAMES,
        contracted_power_kw: CONTRACTED_POWER_KW,
        regions: [Region::CentroNord, Region::SouthAndIslands],
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn malformed(detail: String) -> SimulationError {
    SimulationError::InvalidInput(format!("malformed request: {detail}"))
}

fn rejected(err: &SimulationError) -> Response {
    tracing::warn!(kind = err.kind(), %err, "request rejected");
    json_response(
        StatusCode::BAD_REQUEST,
        ErrorResponse {
            error: err.to_string(),
            kind: err.kind(),
        },
    )
}

#[cfg(test)]
fn args_from_json(json: &str) -> Result<SimulateArgs, SimulationError> {
    let payload = serde_json::from_str::<SimulatePayload>(json)
        .map_err(|e| SimulationError::InvalidInput(format!("invalid JSON payload: {e}")))?;
    args_from_payload(payload)
}

fn parse_period(value: &str) -> Result<CliPeriod, SimulationError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "monthly" | "mensile" => Ok(CliPeriod::Monthly),
        "bimonthly" | "bimestrale" => Ok(CliPeriod::Bimonthly),
        _ => Err(SimulationError::InvalidPeriod(format!(
            "unknown billing period `{value}`, expected monthly or bimonthly"
        ))),
    }
}

fn args_from_payload(payload: SimulatePayload) -> Result<SimulateArgs, SimulationError> {
    let mut args = default_simulate_args();

    if let Some(v) = payload.service {
        args.service = v.parse()?;
    }
    if let Some(v) = payload.offer {
        args.offer = v;
    }
    if let Some(v) = payload.period {
        args.period = parse_period(&v)?;
    }
    if let Some(v) = payload.start_month {
        args.start_month = v;
    }
    if let Some(v) = payload.end_month {
        args.end_month = Some(v);
    }

    if let Some(v) = payload.consumption_kwh {
        args.consumption_kwh = v;
    }
    if let Some(v) = payload.contracted_power_kw {
        args.contracted_power_kw = v;
    }
    if let Some(v) = payload.consumption_smc {
        args.consumption_smc = v;
    }
    if let Some(v) = payload.annual_consumption_smc {
        args.annual_consumption_smc = v;
    }
    if let Some(v) = payload.region {
        args.region = v.parse::<Region>()?.into();
    }

    if let Some(v) = payload.current_invoice {
        args.current_invoice = v;
    }
    if let Some(v) = payload.social_bonus {
        args.social_bonus = v;
    }
    if let Some(v) = payload.adjustments {
        args.adjustments = v;
    }
    if let Some(v) = payload.other_charges {
        args.other_charges = v;
    }
    if let Some(v) = payload.tv_license_fee {
        args.tv_license_fee = v;
    }
    args.customer = payload.customer;

    Ok(args)
}

fn reference_input_from_payload(
    payload: ReferencePayload,
) -> Result<ReferenceInput, SimulationError> {
    let service = match payload.service {
        Some(v) => v.parse()?,
        None => ServiceType::Electricity,
    };
    Ok(ReferenceInput {
        service,
        client: payload.client.unwrap_or_default(),
        annual_consumption: payload.annual_consumption.unwrap_or(2_700.0),
        tariff: payload.tariff.unwrap_or_default(),
        location: payload.location.unwrap_or_default(),
    })
}
