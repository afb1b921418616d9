//! SeaORM Entity for rating_info table

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "rating_info")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub movie_info_id: i32,
    pub user_info_id: i32,
    pub rating: i32,
    pub review: Option<String>,
    pub active: bool,
    pub date_created: DateTime,
    pub date_updated: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::movie_info::Entity",
        from = "Column::MovieInfoId",
        to = "super::movie_info::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    MovieInfo,
    #[sea_orm(
        belongs_to = "super::user_info::Entity",
        from = "Column::UserInfoId",
        to = "super::user_info::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    UserInfo,
}

impl Related<super::movie_info::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieInfo.def()
    }
}

impl Related<super::user_info::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserInfo.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
