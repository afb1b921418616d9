//! SeaORM Entity for user_info table

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "user_info")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// Argon2 PHC string. Compared only through `auth::verify_password`.
    pub password: String,
    pub active: bool,
    pub activation_code: Option<String>,
    pub activation_expiry_date: Option<DateTime>,
    pub date_created: DateTime,
    pub date_updated: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::rating_info::Entity")]
    RatingInfo,
}

impl Related<super::rating_info::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RatingInfo.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
