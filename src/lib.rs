//! Movie-rating service: ratings are aggregated into a materialized
//! per-movie report, cached with a write-invalidate / read-populate policy.

pub mod auth;
pub mod cache;
pub mod db;
pub mod orm;
pub mod repository;
pub mod unit_of_work;
pub mod web;
