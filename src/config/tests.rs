use super::*;
use tempfile::TempDir;

fn write_config(dir: &TempDir, json: &str) {
    fs::write(dir.path().join(CONFIG_FILE_NAME), json).unwrap();
}

#[test]
fn test_missing_config_is_reported() {
    let dir = TempDir::new().unwrap();
    let err = load(dir.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Missing(_)));
    assert!(err.to_string().contains("--setup"));
}

#[test]
fn test_load_anthropic_config() {
    let dir = TempDir::new().unwrap();
    write_config(
        &dir,
        r#"{
            "provider": "anthropic-compatible",
            "model": "claude-3-haiku-20240307",
            "temperature": 0.3,
            "targetBranch": "origin/main",
            "claudeApiKey": "sk-ant-test"
        }"#,
    );

    let config = load(dir.path()).unwrap();
    assert_eq!(config.provider, Provider::AnthropicCompatible);
    assert_eq!(config.model, "claude-3-haiku-20240307");
    assert_eq!(config.api_key(), Some("sk-ant-test"));
    assert_eq!(config.base_url(), ANTHROPIC_BASE_URL);
}

#[test]
fn test_load_accepts_legacy_provider_names() {
    let dir = TempDir::new().unwrap();
    write_config(
        &dir,
        r#"{"provider": "gpt", "model": "gpt-4o", "openaiApiKey": "sk-test"}"#,
    );

    let config = load(dir.path()).unwrap();
    assert_eq!(config.provider, Provider::OpenAiCompatible);
    assert_eq!(config.temperature, DEFAULT_TEMPERATURE);
    assert_eq!(config.target_branch, DEFAULT_TARGET_BRANCH);
}

#[test]
fn test_unknown_provider_is_rejected() {
    let dir = TempDir::new().unwrap();
    write_config(
        &dir,
        r#"{"provider": "gemini", "model": "x", "openaiApiKey": "sk-test"}"#,
    );
    assert!(matches!(
        load(dir.path()).unwrap_err(),
        ConfigError::Parse { .. }
    ));
}

#[test]
fn test_key_must_match_provider() {
    let dir = TempDir::new().unwrap();
    write_config(
        &dir,
        r#"{"provider": "openai-compatible", "model": "gpt-4o", "claudeApiKey": "sk-ant"}"#,
    );
    let err = load(dir.path()).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::MissingApiKey {
            provider: Provider::OpenAiCompatible,
            field: "openaiApiKey"
        }
    ));
}

#[test]
fn test_both_keys_are_rejected() {
    let config = ProviderConfig {
        claude_api_key: Some("sk-ant".to_string()),
        ..ProviderConfig::new(
            Provider::OpenAiCompatible,
            "gpt-4o".to_string(),
            0.3,
            "origin/main".to_string(),
            "sk-test".to_string(),
        )
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ConflictingApiKey { .. })
    ));
}

#[test]
fn test_temperature_range() {
    let mut config = ProviderConfig::new(
        Provider::AnthropicCompatible,
        "claude-3-haiku-20240307".to_string(),
        0.3,
        "origin/main".to_string(),
        "sk-ant".to_string(),
    );
    assert!(config.validate().is_ok());

    config.temperature = 3.5;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Temperature(_))
    ));
}

#[test]
fn test_save_then_load() {
    let dir = TempDir::new().unwrap();
    let config = ProviderConfig::new(
        Provider::OpenAiCompatible,
        "gpt-4o".to_string(),
        0.5,
        "origin/develop".to_string(),
        "sk-test".to_string(),
    );

    let path = save(dir.path(), &config).unwrap();
    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("\"targetBranch\": \"origin/develop\""));
    assert!(written.contains("\"openaiApiKey\""));
    assert!(!written.contains("claudeApiKey"));
    assert!(!written.contains("baseUrl"));

    assert_eq!(load(dir.path()).unwrap(), config);
}

#[test]
fn test_base_url_override_trims_slash() {
    let config = ProviderConfig {
        base_url: Some("http://localhost:8080/".to_string()),
        ..ProviderConfig::new(
            Provider::OpenAiCompatible,
            "local".to_string(),
            0.3,
            "main".to_string(),
            "sk-test".to_string(),
        )
    };
    assert_eq!(config.base_url(), "http://localhost:8080");
}

#[test]
fn test_gitignore_created_when_absent() {
    let dir = TempDir::new().unwrap();
    assert_eq!(
        ensure_gitignored(dir.path()).unwrap(),
        GitignoreUpdate::Created
    );
    assert_eq!(
        fs::read_to_string(dir.path().join(".gitignore")).unwrap(),
        ".autocommitrc\n"
    );
}

#[test]
fn test_gitignore_appended_once() {
    let dir = TempDir::new().unwrap();
    let gitignore = dir.path().join(".gitignore");
    fs::write(&gitignore, "target").unwrap();

    assert_eq!(
        ensure_gitignored(dir.path()).unwrap(),
        GitignoreUpdate::Appended
    );
    assert_eq!(
        ensure_gitignored(dir.path()).unwrap(),
        GitignoreUpdate::AlreadyPresent
    );
    assert_eq!(
        fs::read_to_string(&gitignore).unwrap(),
        "target\n.autocommitrc\n"
    );
}

#[test]
fn test_gitignore_rooted_entry_counts() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".gitignore"), "/.autocommitrc\n").unwrap();
    assert_eq!(
        ensure_gitignored(dir.path()).unwrap(),
        GitignoreUpdate::AlreadyPresent
    );
}
