mod blueprints;

use actix_web::web;

use crate::{
    routes::util::not_found,
    util::{ApiError, INVALID_BODY},
};

/// Bodies that fail to deserialize are answered with the usual envelope.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        log::debug!("rejected request body: {}", err);
        ApiError::Validation(INVALID_BODY.to_owned()).into()
    })
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .app_data(json_config())
            .configure(blueprints::config)
            .default_service(web::to(not_found)),
    );
}
