#[cfg(test)]
mod tests {
    use crate::auth::Role;
    use crate::db::{
        authenticate_user, create_course, create_user, delete_course, find_user_by_username,
        get_all_courses, get_course, get_user,
    };
    use crate::error::AppError;
    use crate::test::utils::TestDbBuilder;

    use rocket::tokio;
    use sqlx::{Pool, Sqlite, sqlite::SqlitePoolOptions};

    async fn setup_test_db() -> Pool<Sqlite> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        pool
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let pool = setup_test_db().await;

        create_user(&pool, "test_user", "password123", "member")
            .await
            .expect("Failed to create test user");

        let user = find_user_by_username(&pool, "test_user")
            .await
            .expect("Failed to get user");

        match user {
            Some(user) => {
                assert_eq!(user.username, "test_user");
                assert_eq!(user.role, Role::Member);
            }
            _ => panic!("User wasn't found after creation"),
        }

        let missing = find_user_by_username(&pool, "nobody")
            .await
            .expect("Lookup of unknown username should not error");
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_get_user_by_id() {
        let pool = setup_test_db().await;

        let user_id = create_user(&pool, "test_user", "password123", "admin")
            .await
            .expect("Failed to create test user");

        let user = get_user(&pool, user_id).await.expect("Failed to get user");
        assert_eq!(user.username, "test_user");
        assert_eq!(user.role, Role::Admin);

        let result = get_user(&pool, user_id + 1000).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let pool = setup_test_db().await;

        create_user(&pool, "test_user", "password123", "member")
            .await
            .expect("Failed to create test user");

        let result = create_user(&pool, "test_user", "other_password", "member").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_unknown_role_rejected() {
        let pool = setup_test_db().await;

        let result = create_user(&pool, "test_user", "password123", "superuser").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_authenticate_user() {
        let pool = setup_test_db().await;

        create_user(&pool, "test_user", "password123", "member")
            .await
            .expect("Failed to create test user");

        let user = authenticate_user(&pool, "test_user", "password123")
            .await
            .expect("Authentication should not error");
        assert_eq!(
            user.expect("Correct credentials should authenticate").username,
            "test_user"
        );

        let rejected = authenticate_user(&pool, "test_user", "wrong_password")
            .await
            .expect("Authentication should not error");
        assert!(rejected.is_none(), "Wrong password was accepted");

        let unknown = authenticate_user(&pool, "nobody", "password123")
            .await
            .expect("Authentication should not error");
        assert!(unknown.is_none(), "Unknown username was accepted");
    }

    #[tokio::test]
    async fn test_create_course_appears_in_listing() {
        let test_db = TestDbBuilder::new()
            .course("Algebra", "Introductory algebra", "Math")
            .build()
            .await
            .expect("Failed to build test database");

        let before = get_all_courses(&test_db.pool)
            .await
            .expect("Failed to list courses");

        let created = create_course(&test_db.pool, "Pottery", "Wheel throwing", "Art")
            .await
            .expect("Failed to create course");

        assert_eq!(created.name, "Pottery");
        assert_eq!(created.description, "Wheel throwing");
        assert_eq!(created.category, "Art");

        let after = get_all_courses(&test_db.pool)
            .await
            .expect("Failed to list courses");

        assert_eq!(after.len(), before.len() + 1);

        let matching: Vec<_> = after.iter().filter(|c| c.name == "Pottery").collect();
        assert_eq!(matching.len(), 1, "Exactly one new record expected");

        let ids: std::collections::HashSet<i64> = after.iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), after.len(), "Course ids must be unique");
    }

    #[tokio::test]
    async fn test_listing_preserves_insertion_order() {
        let pool = setup_test_db().await;

        create_course(&pool, "First", "d", "c")
            .await
            .expect("Failed to create course");
        create_course(&pool, "Second", "d", "c")
            .await
            .expect("Failed to create course");
        create_course(&pool, "Third", "d", "c")
            .await
            .expect("Failed to create course");

        let names: Vec<String> = get_all_courses(&pool)
            .await
            .expect("Failed to list courses")
            .into_iter()
            .map(|c| c.name)
            .collect();

        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[tokio::test]
    async fn test_delete_course() {
        let test_db = TestDbBuilder::new()
            .course("Algebra", "Introductory algebra", "Math")
            .build()
            .await
            .expect("Failed to build test database");

        let course_id = test_db.course_id("Algebra").expect("Course not found");

        delete_course(&test_db.pool, course_id)
            .await
            .expect("Failed to delete course");

        let result = get_course(&test_db.pool, course_id).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));

        // Re-deleting must report NotFound, not silently succeed.
        let result = delete_course(&test_db.pool, course_id).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_nonexistent_course_leaves_listing_untouched() {
        let test_db = TestDbBuilder::new()
            .course("Algebra", "Introductory algebra", "Math")
            .build()
            .await
            .expect("Failed to build test database");

        let before = get_all_courses(&test_db.pool)
            .await
            .expect("Failed to list courses");

        let result = delete_course(&test_db.pool, 9999).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));

        let after = get_all_courses(&test_db.pool)
            .await
            .expect("Failed to list courses");
        assert_eq!(after.len(), before.len());
    }
}
