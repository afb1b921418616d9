//! SeaORM Entity for rating_report table

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "rating_report")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub movie_info_id: i32,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub accumulated_rating: Decimal,
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
}

impl Related<super::movie_info::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieInfo.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
