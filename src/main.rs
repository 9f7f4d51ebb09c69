use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::{io, time::Duration};

use moxie_balance_checker::{api, config::Config, AppState};

const CHAIN_CHECK_TIMEOUT: Duration = Duration::from_secs(10);

fn build_cors(allowed_origins: &[String]) -> Cors {
    if allowed_origins.is_empty() {
        return Cors::permissive();
    }

    allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let state = AppState::from_config(&config)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    log::info!(
        "Querying token {:?} on {} (chain {}) via {}",
        config.token_address,
        config.network.name,
        config.network.chain_id,
        config.rpc_url
    );
    // runs alongside the server; a silent node must not hold up bind
    state.client.spawn_chain_check(CHAIN_CHECK_TIMEOUT);

    let static_dir = if config.static_dir.is_dir() {
        Some(config.static_dir.clone())
    } else {
        log::warn!(
            "Static directory {} not found, not serving static files",
            config.static_dir.display()
        );
        None
    };

    let state = web::Data::new(state);
    let cors_allowed_origins = config.cors_allowed_origins.clone();

    log::info!("Server running at http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        let app = App::new()
            .app_data(state.clone())
            .wrap(build_cors(&cors_allowed_origins))
            .wrap(Logger::default())
            .configure(api::config);

        match &static_dir {
            Some(dir) => app.service(api::static_files(dir)),
            None => app,
        }
    })
    .bind((config.host, config.port))?
    .run()
    .await
}
