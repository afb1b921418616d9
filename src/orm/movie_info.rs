//! SeaORM Entity for movie_info table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "movie_info")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub release_year: Option<i64>,
    pub active: bool,
    pub date_created: DateTime,
    pub date_updated: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::rating_info::Entity")]
    RatingInfo,
    #[sea_orm(has_many = "super::rating_report::Entity")]
    RatingReport,
}

impl Related<super::rating_info::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RatingInfo.def()
    }
}

impl Related<super::rating_report::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RatingReport.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
