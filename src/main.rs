use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{
    middleware::{self, Logger},
    web, App, HttpServer,
};
use anyhow::Context;
use clap::Parser;

mod blueprint;
mod config;
mod db;
mod models;
mod routes;
mod util;

use crate::{
    blueprint::BlueprintsService,
    config::{Config, StoreKind},
    db::{BlueprintStore, MemoryStore, MongoStore},
};

fn cors(origin: Option<&str>) -> Cors {
    match origin {
        Some(origin) => Cors::default()
            .allowed_origin(origin)
            .allowed_methods(vec!["GET", "POST", "PUT"])
            .allow_any_header(),
        None => Cors::default(),
    }
}

async fn open_store(config: &Config) -> anyhow::Result<Arc<dyn BlueprintStore>> {
    let store: Arc<dyn BlueprintStore> = match config.store {
        StoreKind::Mongo => {
            let store = MongoStore::connect(&config.mongodb_uri, &config.database)
                .await
                .with_context(|| format!("connecting to MongoDB at {}", config.mongodb_uri))?;
            log::info!("storing blueprints in MongoDB database '{}'", config.database);
            Arc::new(store)
        }
        StoreKind::Memory => {
            log::warn!("storing blueprints in memory; nothing survives a restart");
            Arc::new(MemoryStore::new())
        }
    };
    Ok(store)
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::parse();

    let filter = match config.filter() {
        Ok(filter) => filter,
        Err(err) => {
            log::error!("{}", err);
            return Err(err).context("resolving the point filter");
        }
    };
    log::info!("using the {} point filter", filter);

    let store = open_store(&config).await?;
    let service = web::Data::new(BlueprintsService::new(store, filter));

    let cors_origin = config.cors_origin.clone();
    log::info!("listening on {}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::NormalizePath::trim())
            .wrap(Logger::default())
            .wrap(middleware::Compress::default())
            .wrap(cors(cors_origin.as_deref()))
            .app_data(service.clone())
            .configure(routes::v1::config)
            .default_service(web::to(routes::util::not_found))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    log::info!("bye!");
    Ok(())
}
