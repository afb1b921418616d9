//! User storage operations.
//!
//! Passwords arrive here already hashed; this layer never sees plaintext.

use super::RepoError;
use crate::orm::user_info;
use chrono::Utc;
use sea_orm::{entity::*, query::*, DatabaseTransaction};

pub struct CreateUser {
    pub name: String,
    /// Argon2 PHC string produced by `auth::hash_password`.
    pub password_hash: String,
}

pub struct UserRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> UserRepository<'a> {
    pub(super) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub async fn create_user(&self, request: CreateUser) -> Result<user_info::Model, RepoError> {
        let now = Utc::now().naive_utc();
        let user = user_info::ActiveModel {
            name: Set(request.name),
            password: Set(request.password_hash),
            active: Set(true),
            activation_code: Set(None),
            activation_expiry_date: Set(None),
            date_created: Set(now),
            date_updated: Set(now),
            ..Default::default()
        };
        let res = user_info::Entity::insert(user).exec(self.txn).await?;
        user_info::Entity::find_by_id(res.last_insert_id)
            .one(self.txn)
            .await?
            .ok_or_else(|| RepoError::DataIntegrity("inserted user row not found".to_owned()))
    }

    pub async fn get_user(&self, user_id: i32) -> Result<Option<user_info::Model>, RepoError> {
        Ok(user_info::Entity::find_by_id(user_id).one(self.txn).await?)
    }

    pub async fn get_user_by_name(
        &self,
        name: &str,
    ) -> Result<Option<user_info::Model>, RepoError> {
        Ok(user_info::Entity::find()
            .filter(user_info::Column::Name.eq(name))
            .one(self.txn)
            .await?)
    }
}
