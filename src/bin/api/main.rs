use actix_web::middleware::Logger;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::Context;
use env_logger::Env;
use reelrate::cache::RedisCache;
use reelrate::unit_of_work::UnitOfWork;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set.")?;
    let redis_url =
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_owned());
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_owned());

    let db = reelrate::db::connect(&database_url)
        .await
        .context("Failed to connect to database.")?;

    // Schema must exist before the first request is accepted.
    reelrate::db::migrate(&db)
        .await
        .context("Failed to run migrations.")?;

    let cache = RedisCache::connect(&redis_url)
        .await
        .context("Failed to connect to redis.")?;

    let uow = Data::new(UnitOfWork::new(db, Arc::new(cache)));

    log::info!("listening on {}", bind_addr);
    HttpServer::new(move || {
        App::new()
            .app_data(uow.clone())
            .wrap(Logger::new("%a %{User-Agent}i"))
            .configure(reelrate::web::configure)
    })
    .bind(&bind_addr)?
    .run()
    .await?;

    Ok(())
}
