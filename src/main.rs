use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::Context;
use chrono::Local;
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use peduli_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    external::{MidtransService, StorageService},
    handlers,
    middlewares::{AuthMiddleware, create_cors},
    services::*,
    swagger::swagger_config,
    utils::JwtService,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    let config = Config::from_toml()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .context("failed to load configuration")?;

    let pool = create_pool(&config.database)
        .await
        .context("failed to create database connection pool")?;

    run_migrations(&pool)
        .await
        .context("failed to run database migrations")?;

    let jwt_service = JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expires_in,
        config.jwt.refresh_token_expires_in,
    );

    let midtrans_service = MidtransService::new(config.midtrans.clone());
    let storage_service = StorageService::new(config.storage.clone());

    let auth_service = AuthService::new(pool.clone(), jwt_service.clone());
    let user_service = UserService::new(pool.clone());
    let donation_service = DonationService::new(pool.clone(), midtrans_service.clone());
    let logistics_service = LogisticsService::new(pool.clone());
    let program_service = ProgramService::new(pool.clone(), storage_service);
    let expense_service = ExpenseService::new(pool.clone());
    let report_service = ReportService::new(pool.clone());

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .wrap(AuthMiddleware::new(jwt_service.clone()))
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(donation_service.clone()))
            .app_data(web::Data::new(logistics_service.clone()))
            .app_data(web::Data::new(program_service.clone()))
            .app_data(web::Data::new(expense_service.clone()))
            .app_data(web::Data::new(report_service.clone()))
            .app_data(web::Data::new(midtrans_service.clone()))
            .configure(swagger_config)
            .configure(handlers::webhook_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::auth_config)
                    .configure(handlers::user_config)
                    .configure(handlers::donation_config)
                    .configure(handlers::admin_config)
                    .configure(handlers::program_config)
                    .configure(handlers::expense_config)
                    .configure(handlers::report_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await?;

    Ok(())
}
