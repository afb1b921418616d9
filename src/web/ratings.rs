//! Rating submission and report read endpoints.

use crate::repository::ratings::{CreateRating, Rating, RatingReport};
use crate::repository::RepoError;
use crate::unit_of_work::UnitOfWork;
use actix_web::{error, get, post, web, Error, HttpResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(create_rating)
        .service(list_ratings_for_user)
        .service(view_movie_report);
}

/// Hard cap on page size for rating listings.
const MAX_PAGE_SIZE: u64 = 20;

#[derive(Deserialize, Validate)]
pub struct CreateRatingRequest {
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    pub movie_info_id: i32,
    pub user_info_id: i32,
    #[validate(length(max = 4096))]
    pub review: Option<String>,
}

#[derive(Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub offset: u64,
    pub limit: Option<u64>,
}

#[derive(Serialize)]
pub struct RatingResponse {
    pub id: i32,
    pub movie_info_id: i32,
    pub movie_title: String,
    pub user_info_id: i32,
    pub user_name: String,
    pub rating: i32,
    pub review: Option<String>,
}

impl From<Rating> for RatingResponse {
    fn from(rating: Rating) -> Self {
        Self {
            id: rating.id,
            movie_info_id: rating.movie.id,
            movie_title: rating.movie.title,
            user_info_id: rating.user.id,
            user_name: rating.user.name,
            rating: rating.rating,
            review: rating.review,
        }
    }
}

#[derive(Serialize)]
pub struct RatingReportResponse {
    pub id: Option<i32>,
    pub movie_info_id: i32,
    pub rating: Decimal,
}

impl RatingReportResponse {
    fn from_report(movie_info_id: i32, report: Option<RatingReport>) -> Self {
        match report {
            Some(report) => Self {
                id: Some(report.id),
                movie_info_id,
                rating: report.accumulated_rating,
            },
            // No report row yet; callers see an aggregate rating of zero.
            None => Self {
                id: None,
                movie_info_id,
                rating: Decimal::ZERO,
            },
        }
    }
}

fn map_repo_error(err: RepoError) -> Error {
    log::error!("rating operation failed: {}", err);
    error::ErrorInternalServerError("Internal error")
}

#[post("/ratings")]
pub async fn create_rating(
    uow: web::Data<UnitOfWork>,
    body: web::Json<CreateRatingRequest>,
) -> Result<HttpResponse, Error> {
    body.validate().map_err(|e| {
        log::debug!("rating submission failed validation: {}", e);
        error::ErrorBadRequest("Invalid rating data")
    })?;

    let request = body.into_inner();
    let movie_info_id = request.movie_info_id;

    let rating = uow
        .perform(move |repos| {
            Box::pin(async move {
                repos
                    .ratings
                    .create_or_update_rating(CreateRating {
                        user_info_id: request.user_info_id,
                        movie_info_id: request.movie_info_id,
                        rating: request.rating,
                        review: request.review,
                    })
                    .await
            })
        })
        .await
        .map_err(map_repo_error)?;

    // The materialized report is refreshed after every successful rating
    // upsert, in its own transaction.
    uow.perform(move |repos| {
        Box::pin(async move { repos.ratings.upsert_report_for_movie(movie_info_id).await })
    })
    .await
    .map_err(map_repo_error)?;

    Ok(HttpResponse::Ok().json(RatingResponse::from(rating)))
}

#[get("/ratings/user/{user_id}")]
pub async fn list_ratings_for_user(
    uow: web::Data<UnitOfWork>,
    path: web::Path<i32>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, Error> {
    let user_id = path.into_inner();
    let offset = query.offset;
    let limit = query.limit.unwrap_or(10).min(MAX_PAGE_SIZE);

    let ratings = uow
        .perform(move |repos| {
            Box::pin(async move {
                repos
                    .ratings
                    .list_ratings_for_user(user_id, offset, limit)
                    .await
            })
        })
        .await
        .map_err(map_repo_error)?;

    let ratings: Vec<RatingResponse> = ratings.into_iter().map(RatingResponse::from).collect();
    Ok(HttpResponse::Ok().json(ratings))
}

#[get("/movies/{movie_id}/report")]
pub async fn view_movie_report(
    uow: web::Data<UnitOfWork>,
    path: web::Path<i32>,
) -> Result<HttpResponse, Error> {
    let movie_id = path.into_inner();

    let report = uow
        .perform(move |repos| {
            Box::pin(async move { repos.ratings.get_report_for_movie(movie_id, true).await })
        })
        .await
        .map_err(map_repo_error)?;

    Ok(HttpResponse::Ok().json(RatingReportResponse::from_report(movie_id, report)))
}
