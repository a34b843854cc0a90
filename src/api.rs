use rocket::State;
use rocket::http::Status;
use rocket::response::Redirect;
use rocket::response::status::Custom;
use rocket::serde::{Deserialize, Serialize, json::Json};
use sqlx::{Pool, Sqlite};
use validator::Validate;

use crate::auth::{AdminUser, User, UserSession};
use crate::db::{
    authenticate_user, create_course, create_user_session, delete_course, get_all_courses,
    invalidate_session,
};
use crate::models::Course;
use crate::validation::AppErrorExt;
use crate::validation::JsonValidateExt;
use crate::validation::ValidationResponse;

#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    password: String,
}

#[derive(Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub user: Option<UserData>,
    pub error: Option<String>,
    pub redirect_url: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct UserData {
    pub id: i64,
    pub username: String,
    pub role: String,
}

impl From<User> for UserData {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role.to_string(),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct CourseResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub category: String,
}

impl From<Course> for CourseResponse {
    fn from(course: Course) -> Self {
        Self {
            id: course.id,
            name: course.name,
            description: course.description,
            category: course.category,
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct CoursesResponse {
    pub courses: Vec<CourseResponse>,
}

/// Public course listing. No authentication required.
#[get("/")]
pub async fn index(db: &State<Pool<Sqlite>>) -> Result<Json<CoursesResponse>, Status> {
    let courses = get_all_courses(db).await?;

    Ok(Json(CoursesResponse {
        courses: courses.into_iter().map(CourseResponse::from).collect(),
    }))
}

#[derive(Serialize, Deserialize)]
pub struct LoginFormResponse {
    pub username: String,
    pub error: Option<String>,
}

/// Login form state for the frontend to render; echoes the attempted
/// username and error message back after a failed attempt.
#[get("/login?<username>&<error>")]
pub fn login_form(username: Option<String>, error: Option<String>) -> Json<LoginFormResponse> {
    Json(LoginFormResponse {
        username: username.unwrap_or_default(),
        error,
    })
}

#[post("/login", data = "<login>")]
pub async fn api_login(
    login: Json<LoginRequest>,
    cookies: &rocket::http::CookieJar<'_>,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<LoginResponse>, Custom<Json<ValidationResponse>>> {
    use chrono::Utc;
    use rocket::http::{Cookie, SameSite};

    let validated = login.validate_custom()?;

    tracing::info!(username = %validated.username, "Login attempt");

    match authenticate_user(db, &validated.username, &validated.password)
        .await
        .validate_custom()?
    {
        Some(user) => {
            let token = UserSession::generate_token();
            let expires_at = Utc::now() + chrono::Duration::hours(1);

            create_user_session(db, user.id, &token, expires_at.naive_utc())
                .await
                .validate_custom()?;

            let cookie = Cookie::build(("session_token", token))
                .same_site(SameSite::Lax)
                .http_only(true)
                .max_age(rocket::time::Duration::hours(1));
            cookies.add_private(cookie);

            cookies.add_private(
                Cookie::build(("logged_in", validated.username))
                    .same_site(SameSite::Lax)
                    .max_age(rocket::time::Duration::hours(1)),
            );

            cookies.add_private(
                Cookie::build(("user_role", user.role.to_string()))
                    .same_site(SameSite::Lax)
                    .max_age(rocket::time::Duration::hours(1)),
            );

            let redirect_url = match user.role.as_str() {
                "admin" => "/admin".to_string(),
                _ => "/".to_string(),
            };

            Ok(Json(LoginResponse {
                success: true,
                user: Some(UserData::from(user)),
                error: None,
                redirect_url: Some(redirect_url),
            }))
        }
        None => Ok(Json(LoginResponse {
            success: false,
            user: None,
            error: Some("Invalid username or password".to_string()),
            redirect_url: None,
        })),
    }
}

#[get("/logout")]
pub async fn api_logout(
    cookies: &rocket::http::CookieJar<'_>,
    db: &State<Pool<Sqlite>>,
) -> Redirect {
    let token = cookies
        .get_private("session_token")
        .map(|cookie| cookie.value().to_string());

    if let Some(token) = token {
        let _ = invalidate_session(db, &token).await;
    }

    cookies.remove_private(rocket::http::Cookie::build("session_token"));
    cookies.remove_private(rocket::http::Cookie::build("logged_in"));
    cookies.remove_private(rocket::http::Cookie::build("user_role"));

    Redirect::to("/")
}

#[derive(Serialize, Deserialize, Default)]
pub struct CourseFormResponse {
    pub name: String,
    pub description: String,
    pub category: String,
}

/// Blank course form for the frontend to render.
#[get("/course/new")]
pub fn course_form(_admin: AdminUser) -> Json<CourseFormResponse> {
    Json(CourseFormResponse::default())
}

#[derive(Deserialize, Validate, Clone)]
pub struct CourseCreateRequest {
    #[validate(length(min = 1, message = "Course name is required"))]
    name: String,
    #[validate(length(min = 1, message = "Description is required"))]
    description: String,
    #[validate(length(min = 1, message = "Category is required"))]
    category: String,
}

#[post("/course/new", data = "<course>")]
pub async fn api_create_course(
    course: Json<CourseCreateRequest>,
    _admin: AdminUser,
    db: &State<Pool<Sqlite>>,
) -> Result<Custom<Json<CourseResponse>>, Custom<Json<ValidationResponse>>> {
    let validated = course.validate_custom()?;

    let created = create_course(
        db,
        &validated.name,
        &validated.description,
        &validated.category,
    )
    .await
    .validate_custom()?;

    Ok(Custom(Status::Created, Json(CourseResponse::from(created))))
}

#[get("/course/delete/<id>")]
pub async fn api_delete_course(
    id: i64,
    _admin: AdminUser,
    db: &State<Pool<Sqlite>>,
) -> Result<Redirect, Status> {
    delete_course(db, id).await?;

    Ok(Redirect::to("/admin"))
}

/// Management listing. Same data as the public listing; the guard is the
/// point.
#[get("/admin")]
pub async fn admin_courses(
    _admin: AdminUser,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<CoursesResponse>, Status> {
    let courses = get_all_courses(db).await?;

    Ok(Json(CoursesResponse {
        courses: courses.into_iter().map(CourseResponse::from).collect(),
    }))
}

// The source exposed the management view on both methods.
#[post("/admin")]
pub async fn admin_courses_post(
    admin: AdminUser,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<CoursesResponse>, Status> {
    admin_courses(admin, db).await
}
