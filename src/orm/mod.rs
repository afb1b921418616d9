//! SeaORM entities for the rating schema.

pub mod movie_info;
pub mod rating_info;
pub mod rating_report;
pub mod user_info;
