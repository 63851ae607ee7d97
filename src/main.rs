use actix_web::{middleware::Logger, web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

use taskadmin::{
    auth::{AuthMiddleware, AuthService},
    mailer::{LogMailer, Mailer},
    routes::{self, health},
    AppError, Config,
};

async fn prepare() -> Result<(Config, sqlx::PgPool), AppError> {
    let config = Config::from_env()?;
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    Ok((config, pool))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let (config, pool) = prepare().await.map_err(|err| {
        log::error!("failed to start: {}", err);
        std::io::Error::new(std::io::ErrorKind::Other, err.to_string())
    })?;

    let bind = (config.server_host.clone(), config.server_port);
    log::info!("starting task admin at {}/admin", config.server_url());

    let auth = web::Data::new(AuthService::from_config(&config));
    let mailer: web::Data<dyn Mailer> =
        web::Data::from(Arc::new(LogMailer::new(config.mail_from.clone())) as Arc<dyn Mailer>);
    let config = web::Data::new(config);
    let pool = web::Data::new(pool);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(pool.clone())
            .app_data(config.clone())
            .app_data(auth.clone())
            .app_data(mailer.clone())
            .service(health::health)
            .service(
                web::scope("/admin")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            )
    })
    .bind(bind)?
    .run()
    .await
}
