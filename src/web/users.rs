//! User registration endpoints.

use crate::repository::users::CreateUser;
use crate::repository::RepoError;
use crate::unit_of_work::UnitOfWork;
use actix_web::{error, get, post, web, Error, HttpResponse};
use serde::{Deserialize, Serialize};
use validator::Validate;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(register_user).service(view_user);
}

#[derive(Deserialize, Validate)]
pub struct RegisterUserRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 8, max = 1000))]
    pub password: String,
}

#[derive(Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub active: bool,
}

impl From<crate::orm::user_info::Model> for UserResponse {
    fn from(user: crate::orm::user_info::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
            active: user.active,
        }
    }
}

#[post("/users")]
pub async fn register_user(
    uow: web::Data<UnitOfWork>,
    body: web::Json<RegisterUserRequest>,
) -> Result<HttpResponse, Error> {
    body.validate().map_err(|e| {
        log::debug!("user registration failed validation: {}", e);
        error::ErrorBadRequest("Invalid registration data")
    })?;

    let request = body.into_inner();
    let name = request.name.trim().to_owned();

    // Hash at the boundary; the storage layer only ever sees the PHC string.
    let password_hash = crate::auth::hash_password(&request.password).map_err(|e| {
        log::error!("failed to hash password: {}", e);
        error::ErrorInternalServerError("Failed to create user")
    })?;

    let user = uow
        .perform(move |repos| {
            Box::pin(async move {
                if repos.users.get_user_by_name(&name).await?.is_some() {
                    return Err(RepoError::DataIntegrity(format!(
                        "user name {} already taken",
                        name
                    )));
                }
                repos
                    .users
                    .create_user(CreateUser {
                        name,
                        password_hash,
                    })
                    .await
            })
        })
        .await
        .map_err(|err| match err {
            RepoError::DataIntegrity(msg) => {
                log::debug!("user registration rejected: {}", msg);
                error::ErrorConflict("User name already taken")
            }
            other => {
                log::error!("user registration failed: {}", other);
                error::ErrorInternalServerError("Failed to create user")
            }
        })?;

    log::info!("new user registered: {} (user_id: {})", user.name, user.id);
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

#[get("/users/{user_id}")]
pub async fn view_user(
    uow: web::Data<UnitOfWork>,
    path: web::Path<i32>,
) -> Result<HttpResponse, Error> {
    let user_id = path.into_inner();

    let user = uow
        .perform(move |repos| Box::pin(async move { repos.users.get_user(user_id).await }))
        .await
        .map_err(|err| {
            log::error!("user lookup failed: {}", err);
            error::ErrorInternalServerError("Internal error")
        })?
        .ok_or_else(|| error::ErrorNotFound("User not found."))?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}
