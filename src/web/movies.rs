//! Movie endpoints.

use crate::orm::movie_info;
use crate::repository::movies::CreateMovie;
use crate::repository::RepoError;
use crate::unit_of_work::UnitOfWork;
use actix_web::{error, get, post, web, Error, HttpResponse};
use serde::{Deserialize, Serialize};
use validator::Validate;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(create_movie)
        .service(list_movies)
        .service(view_movie);
}

#[derive(Deserialize, Validate)]
pub struct CreateMovieRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(max = 4096))]
    pub description: Option<String>,
    pub release_year: Option<i64>,
}

#[derive(Deserialize)]
pub struct MovieListQuery {
    pub query: Option<String>,
    #[serde(default)]
    pub offset: u64,
    pub limit: Option<u64>,
}

#[derive(Serialize)]
pub struct MovieResponse {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub release_year: Option<i64>,
    pub active: bool,
}

impl From<movie_info::Model> for MovieResponse {
    fn from(movie: movie_info::Model) -> Self {
        Self {
            id: movie.id,
            title: movie.title,
            description: movie.description,
            release_year: movie.release_year,
            active: movie.active,
        }
    }
}

#[derive(Serialize)]
pub struct MovieListResponse {
    pub movies: Vec<MovieResponse>,
    pub total_count: i64,
}

fn map_repo_error(err: RepoError) -> Error {
    log::error!("movie operation failed: {}", err);
    error::ErrorInternalServerError("Internal error")
}

#[post("/movies")]
pub async fn create_movie(
    uow: web::Data<UnitOfWork>,
    body: web::Json<CreateMovieRequest>,
) -> Result<HttpResponse, Error> {
    body.validate().map_err(|e| {
        log::debug!("movie creation failed validation: {}", e);
        error::ErrorBadRequest("Invalid movie data")
    })?;

    let request = body.into_inner();
    let movie = uow
        .perform(move |repos| {
            Box::pin(async move {
                repos
                    .movies
                    .create_movie(CreateMovie {
                        title: request.title,
                        description: request.description,
                        release_year: request.release_year,
                    })
                    .await
            })
        })
        .await
        .map_err(map_repo_error)?;

    Ok(HttpResponse::Ok().json(MovieResponse::from(movie)))
}

#[get("/movies")]
pub async fn list_movies(
    uow: web::Data<UnitOfWork>,
    query: web::Query<MovieListQuery>,
) -> Result<HttpResponse, Error> {
    let filter = query.query.clone();
    let offset = query.offset;
    let limit = query.limit.unwrap_or(10).min(100);

    let (movies, total_count) = uow
        .perform(move |repos| {
            Box::pin(async move {
                let movies = repos
                    .movies
                    .list_movies(filter.as_deref(), offset, limit)
                    .await?;
                let total_count = repos.movies.count_movies(filter.as_deref()).await?;
                Ok((movies, total_count))
            })
        })
        .await
        .map_err(map_repo_error)?;

    Ok(HttpResponse::Ok().json(MovieListResponse {
        movies: movies.into_iter().map(MovieResponse::from).collect(),
        total_count,
    }))
}

#[get("/movies/{movie_id}")]
pub async fn view_movie(
    uow: web::Data<UnitOfWork>,
    path: web::Path<i32>,
) -> Result<HttpResponse, Error> {
    let movie_id = path.into_inner();

    let movie = uow
        .perform(move |repos| Box::pin(async move { repos.movies.get_movie(movie_id).await }))
        .await
        .map_err(map_repo_error)?
        .ok_or_else(|| error::ErrorNotFound("Movie not found."))?;

    Ok(HttpResponse::Ok().json(MovieResponse::from(movie)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_is_required() {
        let request = CreateMovieRequest {
            title: String::new(),
            description: None,
            release_year: None,
        };
        assert!(request.validate().is_err());
    }
}
