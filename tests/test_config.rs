use civic_site::config::AppConfig;

/// Every environment variable this binary touches is set in this one test so
/// that parallel tests never observe a half-written environment.
#[test]
fn test_environment_values_keep_their_text() {
    std::env::set_var("SANITY_PROJECT_ID", "0123");
    std::env::set_var("SANITY_REVALIDATE_SECRET", "007");
    std::env::set_var("RESEND_API_KEY", "1e5");
    std::env::set_var("SANITY_USE_CDN", "false");
    std::env::set_var("HTTP_TIMEOUT_SECS", "5");

    let config = AppConfig::load(None).expect("Failed to load config from environment");

    assert_eq!(config.sanity_project_id, "0123");
    assert_eq!(config.revalidate_secret(), Some("007"));
    assert_eq!(config.mail_api_key(), Some("1e5"));
    assert!(!config.sanity_use_cdn);
    assert_eq!(config.http_timeout_secs, 5);
    assert_eq!(config.sanity_dataset, "production");
}
