#[macro_use]
extern crate rocket;

mod api;
mod auth;
mod config;
mod db;
mod error;
mod models;
mod telemetry;
#[cfg(test)]
mod test;
mod validation;

use api::{
    admin_courses, admin_courses_post, api_create_course, api_delete_course, api_login, api_logout,
    course_form, index, login_form,
};
use auth::{forbidden, unauthorized};
use config::AppConfig;
use db::clean_expired_sessions;
use telemetry::TelemetryFairing;
use telemetry::init_tracing;

use rocket::{Build, Rocket};
use sqlx::SqlitePool;
use tracing::{error, info, warn};

#[launch]
async fn rocket() -> _ {
    init_tracing();

    if let Err(e) = config::load_environment() {
        warn!("Failed to load environment files: {}", e);
    }

    let app_config = AppConfig::from_env().expect("Failed to load application config");

    let pool = SqlitePool::connect(&app_config.database_url)
        .await
        .expect("Failed to connect to SQLite database");

    info!("Running database migrations...");
    match sqlx::migrate!("./migrations").run(&pool).await {
        Ok(_) => info!("Migrations completed successfully"),
        Err(e) => {
            error!("Failed to run migrations: {}", e);
            panic!("Database migration failed: {}", e);
        }
    }

    // One-shot sweep at startup; a recurring cleanup task is out of scope.
    match clean_expired_sessions(&pool).await {
        Ok(count) => {
            if count > 0 {
                info!("Cleaned up {} expired sessions", count);
            }
        }
        Err(e) => {
            error!("Failed to clean expired sessions: {}", e);
        }
    }

    init_rocket(pool).await
}

pub async fn init_rocket(pool: SqlitePool) -> Rocket<Build> {
    info!("Starting course catalog");

    rocket::build()
        .manage(pool)
        .mount(
            "/",
            routes![
                index,
                login_form,
                api_login,
                api_logout,
                course_form,
                api_create_course,
                api_delete_course,
                admin_courses,
                admin_courses_post,
            ],
        )
        .register("/", catchers![unauthorized, forbidden])
        .attach(TelemetryFairing)
}
