//! Test fixtures for creating test data
#![allow(dead_code)]

use chrono::Utc;
use reelrate::orm::{movie_info, user_info};
use sea_orm::{ActiveValue::Set, DatabaseConnection, DbErr, EntityTrait};

/// Create a test user with a hashed password.
pub async fn create_test_user(
    db: &DatabaseConnection,
    name: &str,
    password: &str,
) -> Result<user_info::Model, DbErr> {
    let password_hash = reelrate::auth::hash_password(password)
        .map_err(|e| DbErr::Custom(format!("Password hashing failed: {}", e)))?;

    let now = Utc::now().naive_utc();
    let user = user_info::ActiveModel {
        name: Set(name.to_string()),
        password: Set(password_hash),
        active: Set(true),
        activation_code: Set(None),
        activation_expiry_date: Set(None),
        date_created: Set(now),
        date_updated: Set(now),
        ..Default::default()
    };

    let result = user_info::Entity::insert(user).exec(db).await?;
    user_info::Entity::find_by_id(result.last_insert_id)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound("user_info".to_string()))
}

/// Create a test movie.
pub async fn create_test_movie(
    db: &DatabaseConnection,
    title: &str,
) -> Result<movie_info::Model, DbErr> {
    let now = Utc::now().naive_utc();
    let movie = movie_info::ActiveModel {
        title: Set(title.to_string()),
        description: Set(Some(format!("{} (test fixture)", title))),
        release_year: Set(Some(2020)),
        active: Set(true),
        date_created: Set(now),
        date_updated: Set(now),
        ..Default::default()
    };

    let result = movie_info::Entity::insert(movie).exec(db).await?;
    movie_info::Entity::find_by_id(result.last_insert_id)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound("movie_info".to_string()))
}
