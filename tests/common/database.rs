//! Test database setup and management
#![allow(dead_code)]

use reelrate::cache::MemoryCache;
use reelrate::unit_of_work::UnitOfWork;
use sea_orm::{ConnectionTrait, DbErr, Statement};
use std::env;
use std::sync::Arc;

/// Everything an integration test needs: the unit of work under test and a
/// handle on the raw cache so entries can be inspected directly.
pub struct TestContext {
    pub uow: UnitOfWork,
    pub cache: Arc<MemoryCache>,
}

/// Connect to the test database and run migrations.
///
/// Returns None when TEST_DATABASE_URL is unset so the suite can be run
/// without a database; callers should return early in that case. Tests use
/// the in-memory cache so no redis instance is required.
pub async fn setup_test_database() -> Result<Option<TestContext>, DbErr> {
    let database_url = match env::var("TEST_DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("TEST_DATABASE_URL not set, skipping integration test");
            return Ok(None);
        }
    };

    let db = reelrate::db::connect(&database_url).await?;
    reelrate::db::migrate(&db).await?;

    let cache = Arc::new(MemoryCache::new());
    let uow = UnitOfWork::new(db, cache.clone());

    Ok(Some(TestContext { uow, cache }))
}

/// Cleanup function to remove test data
///
/// Truncates all tables in reverse dependency order. RESTART IDENTITY resets
/// sequences so fixture ids are stable between tests.
pub async fn cleanup_test_data(ctx: &TestContext) -> Result<(), DbErr> {
    ctx.uow
        .db()
        .execute(Statement::from_string(
            ctx.uow.db().get_database_backend(),
            "TRUNCATE TABLE
                rating_report,
                rating_info,
                user_info,
                movie_info
            RESTART IDENTITY CASCADE;"
                .to_string(),
        ))
        .await?;

    Ok(())
}
