use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use sqlx::PgPool;

use taskdeck::auth::RevocationList;
use taskdeck::bootstrap;
use taskdeck::config::Config;
use taskdeck::routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let pool = PgPool::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    bootstrap::ensure_admin(&pool)
        .await
        .expect("Failed to bootstrap administrator account");

    let server_host = config.server_host.clone();
    let server_port = config.server_port;
    log::info!("starting taskdeck server at {}", config.server_url());

    let config_data = web::Data::new(config);
    let revocations = web::Data::new(RevocationList::new());

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(config_data.clone())
            .app_data(revocations.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(routes::health::health)
            .configure(routes::config)
    })
    .bind((server_host, server_port))?
    .run()
    .await
}
