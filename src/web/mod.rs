pub mod movies;
pub mod ratings;
pub mod users;

/// Configures the web app by adding services from each web file.
///
/// @see https://docs.rs/actix-web/4.0.1/actix_web/struct.App.html#method.configure
pub fn configure(conf: &mut actix_web::web::ServiceConfig) {
    ratings::configure(conf);
    movies::configure(conf);
    users::configure(conf);
}
