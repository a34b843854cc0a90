#[cfg(test)]
mod tests {
    use crate::config::AppConfig;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_config_from_env() {
        temp_env::with_var("DATABASE_URL", Some("sqlite:courses.db"), || {
            let config = AppConfig::from_env().expect("Config should load from environment");
            assert_eq!(config.database_url, "sqlite:courses.db");
        });
    }

    #[test]
    #[serial]
    fn test_config_missing_database_url() {
        temp_env::with_var_unset("DATABASE_URL", || {
            let result = AppConfig::from_env();
            assert!(result.is_err(), "Missing DATABASE_URL should be an error");
        });
    }
}
