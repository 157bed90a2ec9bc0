use super::*;

#[test]
fn test_defaults_when_sections_missing() {
    let cfg = parse("").unwrap();
    assert_eq!(cfg.bot.api_server, "https://api.telegram.org");
    assert_eq!(cfg.bot.request_timeout_secs, 10);
    assert_eq!(cfg.polling.limit, 100);
    assert_eq!(cfg.polling.timeout_secs, 25);
    assert_eq!(cfg.polling.buffer, 1);
    assert_eq!(cfg.polling.retry_delay_ms, 0);
    assert!(cfg.polling.allowed_updates.is_empty());
    assert_eq!(cfg.log.level, "info");
    assert!(cfg.log.dir.is_empty());
}

#[test]
fn test_polling_from_toml() {
    let toml_str = r#"
        [bot]
        token = "123:abc"
        api_server = "http://localhost:8081"

        [polling]
        limit = 50
        timeout_secs = 10
        allowed_updates = ["message", "callback_query"]
        buffer = 16
    "#;
    let cfg = parse(toml_str).unwrap();
    assert_eq!(cfg.bot.token, "123:abc");
    assert_eq!(cfg.bot.api_server, "http://localhost:8081");
    assert_eq!(cfg.polling.limit, 50);
    assert_eq!(cfg.polling.timeout_secs, 10);
    assert_eq!(
        cfg.polling.allowed_updates,
        vec!["message".to_string(), "callback_query".to_string()]
    );
    assert_eq!(cfg.polling.buffer, 16);
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_invalid_toml_is_config_error() {
    let err = parse("[polling\nlimit = ").unwrap_err();
    assert!(matches!(err, CourierError::Config(_)));
}

#[test]
fn test_limit_out_of_range_rejected() {
    let mut polling = PollingConfig::default();
    polling.limit = 0;
    assert!(polling.validate().is_err());
    polling.limit = 101;
    assert!(polling.validate().is_err());
    polling.limit = 1;
    assert!(polling.validate().is_ok());
}

#[test]
fn test_zero_buffer_rejected() {
    let polling = PollingConfig {
        buffer: 0,
        ..PollingConfig::default()
    };
    let err = polling.validate().unwrap_err();
    assert!(err.to_string().contains("buffer"));
}

#[test]
fn test_token_fallback_only_when_empty() {
    let mut cfg = Config::default();
    cfg.apply_token_fallback(Some("from-env".into()));
    assert_eq!(cfg.bot.token, "from-env");

    cfg.apply_token_fallback(Some("other".into()));
    assert_eq!(cfg.bot.token, "from-env", "file value must win");

    let mut empty = Config::default();
    empty.apply_token_fallback(Some(String::new()));
    assert!(empty.bot.token.is_empty());
}

#[test]
fn test_load_missing_file_uses_defaults() {
    let cfg = read(Path::new("/nonexistent/__courier_test__/courier.toml")).unwrap();
    assert_eq!(cfg.polling.limit, 100);
}

#[test]
fn test_load_reads_file() {
    let tmp = std::env::temp_dir().join("__courier_test_config__.toml");
    std::fs::write(&tmp, "[polling]\nlimit = 7\n").unwrap();

    let cfg = read(&tmp).unwrap();
    assert_eq!(cfg.polling.limit, 7);

    let _ = std::fs::remove_file(&tmp);
}

#[test]
fn test_bot_config_with_token() {
    let bot = BotConfig::with_token("42:xyz");
    assert_eq!(bot.token, "42:xyz");
    assert_eq!(bot.api_server, DEFAULT_API_SERVER);
}
