//! Movie storage operations.

use super::RepoError;
use crate::orm::movie_info;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{entity::*, query::*, DatabaseTransaction, DbBackend, FromQueryResult, Statement};

pub struct CreateMovie {
    pub title: String,
    pub description: Option<String>,
    pub release_year: Option<i64>,
}

/// Partial update; unset fields keep their current value.
pub struct UpdateMovie {
    pub id: i32,
    pub title: Option<String>,
    pub description: Option<String>,
    pub active: Option<bool>,
}

#[derive(FromQueryResult)]
struct CountRow {
    count: i64,
}

pub struct MovieRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> MovieRepository<'a> {
    pub(super) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub async fn create_movie(
        &self,
        request: CreateMovie,
    ) -> Result<movie_info::Model, RepoError> {
        let now = Utc::now().naive_utc();
        let movie = movie_info::ActiveModel {
            title: Set(request.title),
            description: Set(request.description),
            release_year: Set(request.release_year),
            active: Set(true),
            date_created: Set(now),
            date_updated: Set(now),
            ..Default::default()
        };
        let res = movie_info::Entity::insert(movie).exec(self.txn).await?;
        movie_info::Entity::find_by_id(res.last_insert_id)
            .one(self.txn)
            .await?
            .ok_or_else(|| RepoError::DataIntegrity("inserted movie row not found".to_owned()))
    }

    pub async fn get_movie(&self, movie_id: i32) -> Result<Option<movie_info::Model>, RepoError> {
        Ok(movie_info::Entity::find_by_id(movie_id)
            .one(self.txn)
            .await?)
    }

    /// Movies newest-first, optionally filtered by a title substring.
    pub async fn list_movies(
        &self,
        query: Option<&str>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<movie_info::Model>, RepoError> {
        let mut select = movie_info::Entity::find();
        if let Some(query) = query {
            select = select.filter(movie_info::Column::Title.contains(query));
        }
        Ok(select
            .order_by_desc(movie_info::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(self.txn)
            .await?)
    }

    pub async fn count_movies(&self, query: Option<&str>) -> Result<i64, RepoError> {
        let row = CountRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"SELECT COUNT(*) AS count FROM movie_info
               WHERE $1::text IS NULL OR title LIKE '%' || $1 || '%'"#,
            vec![query.map(str::to_owned).into()],
        ))
        .one(self.txn)
        .await?;
        Ok(row.map(|r| r.count).unwrap_or(0))
    }

    pub async fn update_movie(
        &self,
        request: UpdateMovie,
    ) -> Result<movie_info::Model, RepoError> {
        let mut update = movie_info::Entity::update_many()
            .col_expr(
                movie_info::Column::DateUpdated,
                Expr::value(Utc::now().naive_utc()),
            )
            .filter(movie_info::Column::Id.eq(request.id));
        if let Some(title) = request.title {
            update = update.col_expr(movie_info::Column::Title, Expr::value(title));
        }
        if let Some(description) = request.description {
            update = update.col_expr(movie_info::Column::Description, Expr::value(description));
        }
        if let Some(active) = request.active {
            update = update.col_expr(movie_info::Column::Active, Expr::value(active));
        }
        let res = update.exec(self.txn).await?;
        if res.rows_affected == 0 {
            return Err(RepoError::DataIntegrity(format!(
                "movie {} update affected no rows",
                request.id
            )));
        }
        self.get_movie(request.id).await?.ok_or_else(|| {
            RepoError::DataIntegrity(format!("movie {} missing after update", request.id))
        })
    }
}
