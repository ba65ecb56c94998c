use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use crm_backend::auth::TokenVerifier;
use crm_backend::cache::RedisCache;
use crm_backend::config::AppConfig;
use crm_backend::create_pool;
use crm_backend::error::{ApiError, ValidationError};
use crm_backend::handlers;
use dotenv::dotenv;
use migration::{Migrator, MigratorTrait};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn startup_error(e: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(e.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = AppConfig::from_env().map_err(startup_error)?;

    let db = create_pool(&config.database_url)
        .await
        .map_err(startup_error)?;
    Migrator::up(&db, None).await.map_err(startup_error)?;
    tracing::info!("Database ready");
    let db_data = web::Data::new(db);

    let redis_cache = RedisCache::new(&config.redis_url)
        .await
        .map_err(startup_error)?;
    let redis_data = web::Data::new(Arc::new(redis_cache));
    tracing::info!("Connected to Redis");

    let verifier = TokenVerifier::from_config(&config.auth);
    tracing::info!(provider = verifier.provider(), "Token verification configured");
    let verifier_data = web::Data::new(verifier);
    let cache_config = web::Data::new(config.cache.clone());

    let bind_addr = config.bind_addr();
    tracing::info!("Server running at http://{bind_addr}");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);

        // Malformed bodies and unknown enum values are validation failures.
        let json_config = web::JsonConfig::default().error_handler(|err, _req| {
            ApiError::from(ValidationError::Malformed(err.to_string())).into()
        });
        let query_config = web::QueryConfig::default().error_handler(|err, _req| {
            ApiError::from(ValidationError::Malformed(err.to_string())).into()
        });
        let path_config = web::PathConfig::default().error_handler(|err, _req| {
            ApiError::from(ValidationError::Malformed(err.to_string())).into()
        });

        App::new()
            .wrap(cors)
            .app_data(json_config)
            .app_data(query_config)
            .app_data(path_config)
            .app_data(db_data.clone())
            .app_data(redis_data.clone())
            .app_data(verifier_data.clone())
            .app_data(cache_config.clone())
            .service(web::scope("/api").configure(handlers::init_routes))
    })
    .bind(&bind_addr)?
    .run()
    .await
}
