use std::collections::HashMap;

use notifybot_core::errors::ConfigError;
use notifybot_core::settings::{IntentsConfig, LogLevel, Settings, parse_keywords};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn env(vars: &[(&str, &str)]) -> HashMap<String, String> {
    vars.iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

#[test]
fn test_defaults_when_environment_is_empty() {
    let settings = Settings::from_source(&env(&[])).expect("Failed to load settings");

    assert_eq!(settings.discord_token, "");
    assert_eq!(settings.command_prefix, "!");
    assert_eq!(settings.database_path, "notification.db");
    assert_eq!(settings.max_notifications_display, 25);
    assert_eq!(settings.cleanup_days, 7);
    assert_eq!(
        settings.notification_keywords,
        vec!["urgent", "important", "reminder", "help", "@everyone", "@here"]
    );
    assert_eq!(settings.log_level, LogLevel::Info);
    assert_eq!(settings.log_file, "bot.log");
    assert_eq!(settings.intents, IntentsConfig::default());
    assert!(!settings.validate());
}

#[test]
fn test_defaults_match_default_impl() {
    let settings = Settings::from_source(&env(&[])).expect("Failed to load settings");

    assert_eq!(settings, Settings::default());
}

#[test]
fn test_explicit_values_override_defaults() {
    let settings = Settings::from_source(&env(&[
        ("DISCORD_TOKEN", "abc.def.ghi"),
        ("COMMAND_PREFIX", "?"),
        ("DATABASE_PATH", "data/alerts.db"),
        ("MAX_NOTIFICATIONS_DISPLAY", "10"),
        ("CLEANUP_DAYS", "30"),
        ("LOG_LEVEL", "debug"),
        ("LOG_FILE", "logs/bot.log"),
    ]))
    .expect("Failed to load settings");

    assert_eq!(settings.discord_token, "abc.def.ghi");
    assert_eq!(settings.command_prefix, "?");
    assert_eq!(settings.database_path, "data/alerts.db");
    assert_eq!(settings.max_notifications_display, 10);
    assert_eq!(settings.cleanup_days, 30);
    assert_eq!(settings.log_level, LogLevel::Debug);
    assert_eq!(settings.log_file, "logs/bot.log");
    assert!(settings.validate());
}

#[test]
fn test_keywords_are_trimmed_and_lowercased() {
    let settings = Settings::from_source(&env(&[(
        "NOTIFICATION_KEYWORDS",
        " Urgent , Important,HELP ",
    )]))
    .expect("Failed to load settings");

    assert_eq!(settings.notification_keywords, vec!["urgent", "important", "help"]);
}

#[rstest]
#[case("urgent,,help", vec!["urgent", "help"])]
#[case(" , ,deploy", vec!["deploy"])]
#[case("@Here", vec!["@here"])]
#[case("one", vec!["one"])]
fn test_parse_keywords(#[case] raw: &str, #[case] expected: Vec<&str>) {
    assert_eq!(parse_keywords(raw), expected);
}

#[test]
fn test_malformed_integer_is_an_error() {
    let result = Settings::from_source(&env(&[("MAX_NOTIFICATIONS_DISPLAY", "abc")]));

    match result {
        Err(ConfigError::InvalidInteger { key, value, .. }) => {
            assert_eq!(key, "MAX_NOTIFICATIONS_DISPLAY");
            assert_eq!(value, "abc");
        }
        other => panic!("Expected InvalidInteger, got {other:?}"),
    }
}

#[test]
fn test_malformed_cleanup_days_is_an_error() {
    let result = Settings::from_source(&env(&[("CLEANUP_DAYS", "7 days")]));

    assert!(matches!(
        result,
        Err(ConfigError::InvalidInteger { key: "CLEANUP_DAYS", .. })
    ));
}

#[test]
fn test_empty_integer_falls_back_to_default() {
    let settings = Settings::from_source(&env(&[("MAX_NOTIFICATIONS_DISPLAY", "")]))
        .expect("Failed to load settings");

    assert_eq!(settings.max_notifications_display, 25);
}

#[rstest]
#[case("DEBUG", LogLevel::Debug)]
#[case("info", LogLevel::Info)]
#[case("Warning", LogLevel::Warning)]
#[case(" error ", LogLevel::Error)]
#[case("critical", LogLevel::Critical)]
fn test_log_level_is_case_insensitive(#[case] raw: &str, #[case] expected: LogLevel) {
    let settings =
        Settings::from_source(&env(&[("LOG_LEVEL", raw)])).expect("Failed to load settings");

    assert_eq!(settings.log_level, expected);
}

#[rstest]
#[case("verbose")]
#[case("warn")]
#[case("5")]
fn test_unknown_log_level_is_an_error(#[case] raw: &str) {
    let result = Settings::from_source(&env(&[("LOG_LEVEL", raw)]));

    assert!(matches!(
        result,
        Err(ConfigError::InvalidLogLevel { key: "LOG_LEVEL", .. })
    ));
}

#[test]
fn test_log_level_names() {
    let names: Vec<String> = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warning,
        LogLevel::Error,
        LogLevel::Critical,
    ]
    .iter()
    .map(ToString::to_string)
    .collect();

    assert_eq!(names, vec!["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"]);
}

#[test]
fn test_intents_are_all_enabled() {
    let entries = IntentsConfig::default().entries();

    assert_eq!(
        entries,
        [
            ("message_content", true),
            ("guilds", true),
            ("members", true),
            ("guild_messages", true),
            ("dm_messages", true),
        ]
    );
}

#[test]
fn test_empty_token_fails_validation() {
    let settings =
        Settings::from_source(&env(&[("DISCORD_TOKEN", "")])).expect("Failed to load settings");

    assert_eq!(settings.discord_token, "");
    assert!(!settings.validate());
}

#[test]
fn test_whitespace_token_is_kept_and_passes_validation() {
    let settings =
        Settings::from_source(&env(&[("DISCORD_TOKEN", "   ")])).expect("Failed to load settings");

    assert_eq!(settings.discord_token, "   ");
    assert!(settings.validate());
}

#[test]
fn test_whitespace_command_prefix_is_kept() {
    let settings =
        Settings::from_source(&env(&[("COMMAND_PREFIX", " ")])).expect("Failed to load settings");

    assert_eq!(settings.command_prefix, " ");
}

#[test]
fn test_debug_output_redacts_token() {
    let settings = Settings::from_source(&env(&[("DISCORD_TOKEN", "super-secret-token")]))
        .expect("Failed to load settings");

    let debug = format!("{settings:?}");

    assert!(!debug.contains("super-secret-token"));
    assert!(debug.contains("<redacted>"));
}
