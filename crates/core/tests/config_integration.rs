//! purlscope.toml 통합 설정 테스트
//!
//! - purlscope.toml.example 파싱 테스트
//! - 부분 설정 로딩 테스트
//! - 환경변수 우선순위 테스트
//! - 빈 파일 / 잘못된 형식 에러 테스트

use purlscope_core::config::PurlscopeConfig;
use purlscope_core::error::{ConfigError, PurlscopeError};
use serial_test::serial;

// =============================================================================
// purlscope.toml.example 파싱 테스트
// =============================================================================

#[test]
fn example_config_parses_successfully() {
    let content = include_str!("../../../purlscope.toml.example");
    let config = PurlscopeConfig::parse(content).expect("example config should parse");

    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.general.log_format, "pretty");
    assert_eq!(config.evidence.language, "java");
}

#[test]
fn example_config_passes_validation() {
    let content = include_str!("../../../purlscope.toml.example");
    let config = PurlscopeConfig::parse(content).expect("should parse");
    config
        .validate()
        .expect("example config should pass validation");
}

#[test]
fn example_config_matches_code_defaults() {
    let content = include_str!("../../../purlscope.toml.example");
    let example = PurlscopeConfig::parse(content).expect("should parse");
    let defaults = PurlscopeConfig::default();

    assert_eq!(example.general.log_level, defaults.general.log_level);
    assert_eq!(example.general.log_format, defaults.general.log_format);
    assert_eq!(example.evidence.language, defaults.evidence.language);
    assert_eq!(example.evidence.db_path, defaults.evidence.db_path);
    assert_eq!(
        example.evidence.with_data_flow,
        defaults.evidence.with_data_flow
    );
    assert_eq!(
        example.evidence.with_reachables,
        defaults.evidence.with_reachables
    );
    assert_eq!(
        example.evidence.include_crypto,
        defaults.evidence.include_crypto
    );
    assert_eq!(example.evidence.annotate, defaults.evidence.annotate);
    assert_eq!(
        example.evidence.min_slice_bytes,
        defaults.evidence.min_slice_bytes
    );
    assert_eq!(
        example.evidence.max_slice_bytes,
        defaults.evidence.max_slice_bytes
    );
}

// =============================================================================
// 부분 설정
// =============================================================================

#[test]
fn partial_config_general_only() {
    let config = PurlscopeConfig::parse("[general]\nlog_level = \"warn\"\n").expect("should parse");
    assert_eq!(config.general.log_level, "warn");
    assert_eq!(config.evidence.min_slice_bytes, 1024);
}

#[test]
fn partial_config_evidence_only() {
    let toml = r#"
[evidence]
language = "typescript"
include_crypto = true
"#;
    let config = PurlscopeConfig::parse(toml).expect("should parse");
    assert_eq!(config.evidence.language, "typescript");
    assert!(config.evidence.include_crypto);
    assert_eq!(config.general.log_format, "pretty");
}

// =============================================================================
// 환경변수 우선순위
// =============================================================================

#[tokio::test]
#[serial]
async fn env_override_takes_precedence_over_toml() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("purlscope.toml");
    std::fs::write(&path, "[evidence]\nlanguage = \"java\"\n").expect("write config");

    // SAFETY: serial 테스트이므로 환경변수 조작이 다른 테스트와 겹치지 않습니다.
    unsafe { std::env::set_var("PURLSCOPE_EVIDENCE_LANGUAGE", "ruby") };
    let result = PurlscopeConfig::load(&path).await;
    unsafe { std::env::remove_var("PURLSCOPE_EVIDENCE_LANGUAGE") };

    let config = result.expect("should load");
    assert_eq!(config.evidence.language, "ruby");
}

#[tokio::test]
#[serial]
async fn env_override_invalid_value_fails_validation() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("purlscope.toml");
    std::fs::write(&path, "").expect("write config");

    // SAFETY: serial 테스트이므로 환경변수 조작이 다른 테스트와 겹치지 않습니다.
    unsafe { std::env::set_var("PURLSCOPE_GENERAL_LOG_FORMAT", "xml") };
    let result = PurlscopeConfig::load(&path).await;
    unsafe { std::env::remove_var("PURLSCOPE_GENERAL_LOG_FORMAT") };

    let err = result.expect_err("xml log format should be rejected");
    assert!(err.to_string().contains("log_format"));
}

// =============================================================================
// 에러 케이스
// =============================================================================

#[test]
fn comments_only_parses_with_defaults() {
    let config = PurlscopeConfig::parse("# nothing here\n# still nothing\n").expect("should parse");
    assert_eq!(config.evidence.language, "java");
}

#[test]
fn malformed_toml_returns_parse_error() {
    let err = PurlscopeConfig::parse("[evidence\nlanguage = 1").expect_err("should fail");
    assert!(matches!(
        err,
        PurlscopeError::Config(ConfigError::ParseFailed { .. })
    ));
}

#[test]
fn wrong_type_for_numeric_field() {
    let err = PurlscopeConfig::parse("[evidence]\nmin_slice_bytes = \"big\"\n")
        .expect_err("string for u64 should fail");
    assert!(matches!(
        err,
        PurlscopeError::Config(ConfigError::ParseFailed { .. })
    ));
}

#[test]
fn unknown_section_is_ignored() {
    let config = PurlscopeConfig::parse("[future]\nflag = true\n").expect("should parse");
    config.validate().expect("defaults are valid");
}

#[tokio::test]
async fn from_file_nonexistent_returns_file_not_found() {
    let err = PurlscopeConfig::from_file("/nonexistent/purlscope.toml")
        .await
        .expect_err("should fail");
    assert!(matches!(
        err,
        PurlscopeError::Config(ConfigError::FileNotFound { .. })
    ));
}
