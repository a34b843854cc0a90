//! Out-of-band user provisioning. The application has no registration
//! route; accounts are created with this tool:
//!
//!     cargo run --bin create_user -- <username> <password> [member|admin]

use std::process::exit;

use sqlx::SqlitePool;

#[tokio::main]
async fn main() {
    let args: Vec<String> = std::env::args().collect();

    let (username, password, role) = match args.as_slice() {
        [_, username, password] => (username.clone(), password.clone(), "member".to_string()),
        [_, username, password, role] => (username.clone(), password.clone(), role.clone()),
        _ => {
            eprintln!("Usage: create_user <username> <password> [member|admin]");
            exit(2);
        }
    };

    if role != "member" && role != "admin" {
        eprintln!("Unknown role '{}', expected 'member' or 'admin'", role);
        exit(2);
    }

    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("DATABASE_URL environment variable not set");
            exit(2);
        }
    };

    let pool = SqlitePool::connect(&database_url)
        .await
        .expect("Failed to connect to SQLite database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let existing = sqlx::query("SELECT id FROM users WHERE username = ?")
        .bind(&username)
        .fetch_optional(&pool)
        .await
        .expect("Failed to query users");

    if existing.is_some() {
        eprintln!("Username '{}' already exists", username);
        exit(1);
    }

    let hashed_password =
        bcrypt::hash(&password, bcrypt::DEFAULT_COST).expect("Failed to hash password");

    sqlx::query("INSERT INTO users (username, password, role) VALUES (?, ?, ?)")
        .bind(&username)
        .bind(&hashed_password)
        .bind(&role)
        .execute(&pool)
        .await
        .expect("Failed to insert user");

    println!("Created {} user '{}'", role, username);
}
