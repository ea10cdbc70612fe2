use super::*;

#[test]
fn test_record_parse_error_messages_include_position() {
    let err = RecordParseError::UnexpectedCharacter {
        column: 4,
        character: '{',
    };
    assert_eq!(err.to_string(), "unexpected character '{' at column 4");

    let err = RecordParseError::UnexpectedToken {
        column: 9,
        expected: "':'",
        found: "','".to_string(),
    };
    assert_eq!(err.to_string(), "expected ':' at column 9, found ','");
}

#[test]
fn test_restricted_names_error_converts_into_warden_error() {
    let err: WardenError = RestrictedNamesError::UnbalancedSuffixGroup {
        entry: "admin(1/2".to_string(),
    }
    .into();

    assert_eq!(
        err.to_string(),
        "Invalid restricted name list: entry 'admin(1/2' has an unbalanced suffix group"
    );
}

#[test]
fn test_config_load_error_display() {
    assert_eq!(
        ConfigLoadError::NotFound("warden.toml".to_string()).to_string(),
        "Configuration file not found: warden.toml"
    );
    assert_eq!(
        ConfigLoadError::UnsupportedSchemaVersion(3).to_string(),
        "Unsupported configuration schema version: 3"
    );
}
