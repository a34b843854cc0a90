use serde::Serialize;

#[derive(Serialize, Clone)]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub category: String,
}

#[derive(sqlx::FromRow, Clone)]
pub struct DbCourse {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

impl From<DbCourse> for Course {
    fn from(course: DbCourse) -> Self {
        Self {
            id: course.id.unwrap_or_default(),
            name: course.name.unwrap_or_default(),
            description: course.description.unwrap_or_default(),
            category: course.category.unwrap_or_default(),
        }
    }
}
