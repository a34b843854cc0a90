use crate::auth::Role;
use crate::db::{create_course, create_user};
use crate::error::AppError;
use crate::init_rocket;
use rocket::http::{ContentType, Cookie, Status};
use rocket::local::asynchronous::Client;
use serde_json::json;
use sqlx::{Pool, Sqlite, SqlitePool};
use std::collections::HashMap;
use std::sync::Once;

static INIT: Once = Once::new();
pub static STANDARD_PASSWORD: &str = "password123";

#[derive(Default)]
pub struct TestDbBuilder {
    users: Vec<TestUser>,
    courses: Vec<TestCourse>,
}

pub struct TestUser {
    pub username: String,
    pub role: Role,
    pub password: String,
}

pub struct TestCourse {
    pub name: String,
    pub description: String,
    pub category: String,
}

impl TestDbBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn member(mut self, username: &str) -> Self {
        self.users.push(TestUser {
            username: username.to_string(),
            role: Role::Member,
            password: STANDARD_PASSWORD.to_string(),
        });
        self
    }

    pub fn admin(mut self, username: &str) -> Self {
        self.users.push(TestUser {
            username: username.to_string(),
            role: Role::Admin,
            password: STANDARD_PASSWORD.to_string(),
        });
        self
    }

    pub fn user_with_password(mut self, username: &str, role: Role, password: &str) -> Self {
        self.users.push(TestUser {
            username: username.to_string(),
            role,
            password: password.to_string(),
        });
        self
    }

    pub fn course(mut self, name: &str, description: &str, category: &str) -> Self {
        self.courses.push(TestCourse {
            name: name.to_string(),
            description: description.to_string(),
            category: category.to_string(),
        });
        self
    }

    pub async fn build(self) -> Result<TestDb, AppError> {
        INIT.call_once(|| {
            let _ = tracing_subscriber::fmt()
                .with_test_writer()
                .try_init();
        });

        let pool = SqlitePool::connect("sqlite::memory:").await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        let mut user_id_map: HashMap<String, i64> = HashMap::new();
        let mut course_id_map: HashMap<String, i64> = HashMap::new();

        for user in &self.users {
            let user_id =
                create_user(&pool, &user.username, &user.password, user.role.as_str()).await?;

            user_id_map.insert(user.username.clone(), user_id);
        }

        for course in &self.courses {
            let created =
                create_course(&pool, &course.name, &course.description, &course.category).await?;

            course_id_map.insert(course.name.clone(), created.id);
        }

        Ok(TestDb {
            pool,
            user_id_map,
            course_id_map,
        })
    }
}

pub struct TestDb {
    pub pool: Pool<Sqlite>,
    pub user_id_map: HashMap<String, i64>,
    pub course_id_map: HashMap<String, i64>,
}

impl TestDb {
    pub fn user_id(&self, username: &str) -> Option<i64> {
        self.user_id_map.get(username).copied()
    }

    pub fn course_id(&self, name: &str) -> Option<i64> {
        self.course_id_map.get(name).copied()
    }
}

pub async fn create_standard_test_db() -> TestDb {
    TestDbBuilder::new()
        .admin("admin_user")
        .member("member_user")
        .course("Algebra", "Introductory algebra", "Math")
        .course("Watercolour Basics", "Painting fundamentals", "Art")
        .build()
        .await
        .expect("Failed to build test database")
}

pub async fn setup_test_client(test_db: TestDb) -> (Client, TestDb) {
    let rocket = init_rocket(test_db.pool.clone()).await;

    let client = Client::tracked(rocket)
        .await
        .expect("Failed to build test client");

    (client, test_db)
}

pub async fn login_test_user(
    client: &Client,
    username: &str,
    password: &str,
) -> Vec<Cookie<'static>> {
    let response = client
        .post("/login")
        .header(ContentType::JSON)
        .body(
            json!({
                "username": username,
                "password": password
            })
            .to_string(),
        )
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::Ok);

    response
        .cookies()
        .iter()
        .map(|c| c.clone().into_owned())
        .collect()
}
