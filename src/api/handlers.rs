use actix_web::{get, web, HttpResponse, Responder};

use crate::{
    app_state::AppState,
    errors::ApiError,
    models::{
        api_response::HealthResponse,
        token::{BalanceResponse, HistoricalBalanceResponse},
    },
    services::address::parse_address,
};

#[get("/")]
async fn index(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(format!("{} Balance Checker", state.token_name))
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse::ok())
}

#[get("/balance/{address}")]
async fn get_balance(
    state: web::Data<AppState>,
    address: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let address = address.into_inner();
    let owner = parse_address(&address).map_err(|_| ApiError::InvalidAddress)?;

    let balance = state
        .client
        .get_token_balance(owner, None)
        .await
        .map_err(|e| {
            log::error!("Error fetching balance for {}: {}", address, e);
            ApiError::Balance(e)
        })?;

    Ok(HttpResponse::Ok().json(BalanceResponse {
        address,
        balance: state.client.format_balance(balance),
    }))
}

#[get("/historical-balance/{address}")]
async fn get_historical_balance(
    state: web::Data<AppState>,
    address: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let address = address.into_inner();
    let owner = parse_address(&address).map_err(|_| ApiError::InvalidAddress)?;

    let balances = state
        .client
        .get_historical_balances(owner)
        .await
        .map_err(|e| {
            log::error!("Error fetching historical balance for {}: {}", address, e);
            ApiError::HistoricalBalance(e)
        })?;

    Ok(HttpResponse::Ok().json(HistoricalBalanceResponse {
        address,
        current_balance: state.client.format_balance(balances.current),
        one_day_ago_balance: state.client.format_balance(balances.one_day_ago),
        one_week_ago_balance: state.client.format_balance(balances.one_week_ago),
        blocks: balances.blocks,
    }))
}
