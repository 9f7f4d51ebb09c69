use std::path::Path;

use actix_files::Files;
use actix_web::web;

mod handlers;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(handlers::index)
        .service(handlers::health)
        .service(handlers::get_balance)
        .service(handlers::get_historical_balance);
}

/// Static files mounted at the root. Register after [`config`] so the explicit
/// routes take precedence.
pub fn static_files(dir: &Path) -> Files {
    Files::new("/", dir)
}
