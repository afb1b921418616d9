//! Rating and rating-report storage operations.
//!
//! The rating report is a materialized per-movie average kept consistent
//! with the rating rows through a write-invalidate / read-populate cache
//! policy: report writes recompute the average from the store, invalidate
//! both cache keys, and leave repopulation to the next read.

use super::RepoError;
use crate::cache::{self, ReportCache};
use crate::orm::{movie_info, rating_info, rating_report, user_info};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    entity::*, query::*, DatabaseTransaction, DbBackend, FromQueryResult, Statement,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// A persisted rating with its movie and user rows resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct Rating {
    pub id: i32,
    pub movie: movie_info::Model,
    pub user: user_info::Model,
    pub rating: i32,
    pub review: Option<String>,
    pub active: bool,
    pub date_created: chrono::NaiveDateTime,
    pub date_updated: chrono::NaiveDateTime,
}

/// The materialized average rating for a movie. Serialized copies of this
/// struct are what the cache stores, under both key forms.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RatingReport {
    pub id: i32,
    pub movie: movie_info::Model,
    pub accumulated_rating: Decimal,
    pub date_created: chrono::NaiveDateTime,
    pub date_updated: chrono::NaiveDateTime,
}

pub struct CreateRating {
    pub user_info_id: i32,
    pub movie_info_id: i32,
    pub rating: i32,
    pub review: Option<String>,
}

#[derive(FromQueryResult)]
struct AverageRow {
    average_rating: Decimal,
}

pub struct RatingRepository<'a> {
    txn: &'a DatabaseTransaction,
    cache: Arc<dyn ReportCache>,
}

impl<'a> RatingRepository<'a> {
    pub(super) fn new(txn: &'a DatabaseTransaction, cache: Arc<dyn ReportCache>) -> Self {
        Self { txn, cache }
    }

    /// Arithmetic mean of all rating rows for a movie, two decimal places.
    /// Zero when the movie has no ratings. Always computed against the
    /// store; the cache is never consulted.
    pub async fn average_rating_for_movie(
        &self,
        movie_info_id: i32,
    ) -> Result<Decimal, RepoError> {
        let row = AverageRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"SELECT COALESCE(AVG(rating), 0)::numeric(10,2) AS average_rating
               FROM rating_info WHERE movie_info_id = $1"#,
            vec![movie_info_id.into()],
        ))
        .one(self.txn)
        .await?;
        Ok(row.map(|r| r.average_rating).unwrap_or(Decimal::ZERO))
    }

    /// Upsert a rating for (movie, user): update the existing row when one
    /// exists, insert otherwise. An update overwrites rating and review and
    /// re-activates the row.
    pub async fn create_or_update_rating(
        &self,
        request: CreateRating,
    ) -> Result<Rating, RepoError> {
        if let Some(existing) = self
            .find_rating_row(request.movie_info_id, request.user_info_id)
            .await?
        {
            return self.update_rating_row(existing.id, &request).await;
        }

        let now = Utc::now().naive_utc();
        let rating = rating_info::ActiveModel {
            movie_info_id: Set(request.movie_info_id),
            user_info_id: Set(request.user_info_id),
            rating: Set(request.rating),
            review: Set(request.review),
            active: Set(true),
            date_created: Set(now),
            date_updated: Set(now),
            ..Default::default()
        };
        let res = rating_info::Entity::insert(rating).exec(self.txn).await?;
        let row = rating_info::Entity::find_by_id(res.last_insert_id)
            .one(self.txn)
            .await?
            .ok_or_else(|| RepoError::DataIntegrity("inserted rating row not found".to_owned()))?;
        self.resolve_rating(row).await
    }

    async fn update_rating_row(
        &self,
        rating_id: i32,
        request: &CreateRating,
    ) -> Result<Rating, RepoError> {
        let res = rating_info::Entity::update_many()
            .col_expr(rating_info::Column::Rating, Expr::value(request.rating))
            .col_expr(
                rating_info::Column::Review,
                Expr::value(request.review.clone()),
            )
            .col_expr(rating_info::Column::Active, Expr::value(true))
            .col_expr(
                rating_info::Column::DateUpdated,
                Expr::value(Utc::now().naive_utc()),
            )
            .filter(rating_info::Column::Id.eq(rating_id))
            .exec(self.txn)
            .await?;
        if res.rows_affected == 0 {
            return Err(RepoError::DataIntegrity(format!(
                "rating {} update affected no rows",
                rating_id
            )));
        }
        let row = rating_info::Entity::find_by_id(rating_id)
            .one(self.txn)
            .await?
            .ok_or_else(|| {
                RepoError::DataIntegrity(format!("rating {} missing after update", rating_id))
            })?;
        self.resolve_rating(row).await
    }

    pub async fn get_rating(&self, rating_id: i32) -> Result<Option<Rating>, RepoError> {
        match rating_info::Entity::find_by_id(rating_id)
            .one(self.txn)
            .await?
        {
            Some(row) => Ok(Some(self.resolve_rating(row).await?)),
            None => Ok(None),
        }
    }

    pub async fn get_rating_by_movie_and_user(
        &self,
        movie_info_id: i32,
        user_info_id: i32,
    ) -> Result<Option<Rating>, RepoError> {
        match self.find_rating_row(movie_info_id, user_info_id).await? {
            Some(row) => Ok(Some(self.resolve_rating(row).await?)),
            None => Ok(None),
        }
    }

    /// Ratings submitted by a user, oldest first, paginated.
    pub async fn list_ratings_for_user(
        &self,
        user_info_id: i32,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Rating>, RepoError> {
        let rows = rating_info::Entity::find()
            .filter(rating_info::Column::UserInfoId.eq(user_info_id))
            .order_by_asc(rating_info::Column::DateCreated)
            .offset(offset)
            .limit(limit)
            .all(self.txn)
            .await?;
        self.resolve_ratings(rows).await
    }

    /// Recompute and persist the report for a movie.
    ///
    /// The existing report is read with the cache bypassed so the upsert
    /// never acts on a value staler than the average it just computed. Both
    /// cache keys are invalidated before the row update; the write path
    /// never repopulates the cache, the next read does.
    pub async fn upsert_report_for_movie(
        &self,
        movie_info_id: i32,
    ) -> Result<RatingReport, RepoError> {
        let average = self.average_rating_for_movie(movie_info_id).await?;

        if let Some(existing) = self.get_report_for_movie(movie_info_id, false).await? {
            self.invalidate_report(existing.id, movie_info_id).await?;
            return self.update_report_row(existing.id, average).await;
        }

        let now = Utc::now().naive_utc();
        let report = rating_report::ActiveModel {
            movie_info_id: Set(movie_info_id),
            accumulated_rating: Set(average),
            date_created: Set(now),
            date_updated: Set(now),
            ..Default::default()
        };
        let res = rating_report::Entity::insert(report).exec(self.txn).await?;
        let row = rating_report::Entity::find_by_id(res.last_insert_id)
            .one(self.txn)
            .await?
            .ok_or_else(|| {
                RepoError::DataIntegrity("inserted rating report row not found".to_owned())
            })?;
        self.resolve_report(row).await
    }

    async fn update_report_row(
        &self,
        report_id: i32,
        average: Decimal,
    ) -> Result<RatingReport, RepoError> {
        let res = rating_report::Entity::update_many()
            .col_expr(
                rating_report::Column::AccumulatedRating,
                Expr::value(average),
            )
            .col_expr(
                rating_report::Column::DateUpdated,
                Expr::value(Utc::now().naive_utc()),
            )
            .filter(rating_report::Column::Id.eq(report_id))
            .exec(self.txn)
            .await?;
        if res.rows_affected == 0 {
            return Err(RepoError::DataIntegrity(format!(
                "rating report {} update affected no rows",
                report_id
            )));
        }
        let row = rating_report::Entity::find_by_id(report_id)
            .one(self.txn)
            .await?
            .ok_or_else(|| {
                RepoError::DataIntegrity(format!("rating report {} missing after update", report_id))
            })?;
        self.resolve_report(row).await
    }

    /// Report for a movie. With `use_cache`, a hit under the movie key is
    /// returned directly; otherwise the store is queried and a found report
    /// is cached under both keys.
    pub async fn get_report_for_movie(
        &self,
        movie_info_id: i32,
        use_cache: bool,
    ) -> Result<Option<RatingReport>, RepoError> {
        if use_cache {
            if let Some(bytes) = self.cache.get(&cache::movie_key(movie_info_id)).await? {
                let report: RatingReport = serde_json::from_slice(&bytes)?;
                log::info!("cache hit: rating report for movie {}", movie_info_id);
                return Ok(Some(report));
            }
        }

        let row = rating_report::Entity::find()
            .filter(rating_report::Column::MovieInfoId.eq(movie_info_id))
            .one(self.txn)
            .await?;
        match row {
            Some(row) => {
                let report = self.resolve_report(row).await?;
                self.save_report_in_cache(&report).await?;
                Ok(Some(report))
            }
            None => Ok(None),
        }
    }

    /// Report by its own id, same cache protocol under the report key.
    pub async fn get_report(&self, report_id: i32) -> Result<Option<RatingReport>, RepoError> {
        if let Some(bytes) = self.cache.get(&cache::report_key(report_id)).await? {
            let report: RatingReport = serde_json::from_slice(&bytes)?;
            log::info!("cache hit: rating report {}", report_id);
            return Ok(Some(report));
        }

        let row = rating_report::Entity::find_by_id(report_id)
            .one(self.txn)
            .await?;
        match row {
            Some(row) => {
                let report = self.resolve_report(row).await?;
                self.save_report_in_cache(&report).await?;
                Ok(Some(report))
            }
            None => Ok(None),
        }
    }

    async fn save_report_in_cache(&self, report: &RatingReport) -> Result<(), RepoError> {
        let bytes = serde_json::to_vec(report)?;
        self.cache
            .set(&cache::report_key(report.id), bytes.clone())
            .await?;
        self.cache
            .set(&cache::movie_key(report.movie.id), bytes)
            .await?;
        Ok(())
    }

    async fn invalidate_report(
        &self,
        report_id: i32,
        movie_info_id: i32,
    ) -> Result<(), RepoError> {
        self.cache.delete(&cache::report_key(report_id)).await?;
        self.cache.delete(&cache::movie_key(movie_info_id)).await?;
        log::info!(
            "invalidated cached rating report {} (movie {})",
            report_id,
            movie_info_id
        );
        Ok(())
    }

    async fn find_rating_row(
        &self,
        movie_info_id: i32,
        user_info_id: i32,
    ) -> Result<Option<rating_info::Model>, RepoError> {
        Ok(rating_info::Entity::find()
            .filter(rating_info::Column::MovieInfoId.eq(movie_info_id))
            .filter(rating_info::Column::UserInfoId.eq(user_info_id))
            .one(self.txn)
            .await?)
    }

    async fn resolve_rating(&self, row: rating_info::Model) -> Result<Rating, RepoError> {
        let movie = movie_info::Entity::find_by_id(row.movie_info_id)
            .one(self.txn)
            .await?
            .ok_or_else(|| {
                RepoError::DataIntegrity(format!(
                    "movie {} missing for rating {}",
                    row.movie_info_id, row.id
                ))
            })?;
        let user = user_info::Entity::find_by_id(row.user_info_id)
            .one(self.txn)
            .await?
            .ok_or_else(|| {
                RepoError::DataIntegrity(format!(
                    "user {} missing for rating {}",
                    row.user_info_id, row.id
                ))
            })?;
        Ok(Rating {
            id: row.id,
            movie,
            user,
            rating: row.rating,
            review: row.review,
            active: row.active,
            date_created: row.date_created,
            date_updated: row.date_updated,
        })
    }

    async fn resolve_ratings(
        &self,
        rows: Vec<rating_info::Model>,
    ) -> Result<Vec<Rating>, RepoError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let movie_ids: Vec<i32> = rows.iter().map(|r| r.movie_info_id).collect();
        let user_ids: Vec<i32> = rows.iter().map(|r| r.user_info_id).collect();

        let movies: HashMap<i32, movie_info::Model> = movie_info::Entity::find()
            .filter(movie_info::Column::Id.is_in(movie_ids))
            .all(self.txn)
            .await?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();
        let users: HashMap<i32, user_info::Model> = user_info::Entity::find()
            .filter(user_info::Column::Id.is_in(user_ids))
            .all(self.txn)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        rows.into_iter()
            .map(|row| {
                let movie = movies.get(&row.movie_info_id).cloned().ok_or_else(|| {
                    RepoError::DataIntegrity(format!(
                        "movie {} missing for rating {}",
                        row.movie_info_id, row.id
                    ))
                })?;
                let user = users.get(&row.user_info_id).cloned().ok_or_else(|| {
                    RepoError::DataIntegrity(format!(
                        "user {} missing for rating {}",
                        row.user_info_id, row.id
                    ))
                })?;
                Ok(Rating {
                    id: row.id,
                    movie,
                    user,
                    rating: row.rating,
                    review: row.review,
                    active: row.active,
                    date_created: row.date_created,
                    date_updated: row.date_updated,
                })
            })
            .collect()
    }

    async fn resolve_report(
        &self,
        row: rating_report::Model,
    ) -> Result<RatingReport, RepoError> {
        let movie = movie_info::Entity::find_by_id(row.movie_info_id)
            .one(self.txn)
            .await?
            .ok_or_else(|| {
                RepoError::DataIntegrity(format!(
                    "movie {} missing for rating report {}",
                    row.movie_info_id, row.id
                ))
            })?;
        Ok(RatingReport {
            id: row.id,
            movie,
            accumulated_rating: row.accumulated_rating,
            date_created: row.date_created,
            date_updated: row.date_updated,
        })
    }
}
