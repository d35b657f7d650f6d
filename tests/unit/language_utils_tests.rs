/*!
 * Tests for language code utilities
 */

use subsync::language_utils::{
    get_language_name, language_codes_match, normalize_for_engine, validate_language_code,
};

/// Test validation of 2-letter codes
#[test]
fn test_validate_language_code_withPart1Code_shouldSucceed() {
    assert!(validate_language_code("en").is_ok());
    assert!(validate_language_code("fr").is_ok());
    assert!(validate_language_code(" ES ").is_ok());
}

/// Test validation of 3-letter codes including bibliographic variants
#[test]
fn test_validate_language_code_withPart2Codes_shouldSucceed() {
    assert!(validate_language_code("eng").is_ok());
    assert!(validate_language_code("fra").is_ok());
    // ISO 639-2/B aliases
    assert!(validate_language_code("fre").is_ok());
    assert!(validate_language_code("ger").is_ok());
}

/// Test rejection of invalid codes
#[test]
fn test_validate_language_code_withInvalidCode_shouldFail() {
    assert!(validate_language_code("").is_err());
    assert!(validate_language_code("x").is_err());
    assert!(validate_language_code("zz").is_err());
    assert!(validate_language_code("notacode").is_err());
}

/// Test normalization to the engine-facing 2-letter form
#[test]
fn test_normalize_for_engine_withVariousForms_shouldYieldPart1() {
    assert_eq!(normalize_for_engine("en").unwrap(), "en");
    assert_eq!(normalize_for_engine("eng").unwrap(), "en");
    assert_eq!(normalize_for_engine("fre").unwrap(), "fr");
    assert_eq!(normalize_for_engine("DEU").unwrap(), "de");
}

/// Test language code matching across code systems
#[test]
fn test_language_codes_match_withEquivalentCodes_shouldReturnTrue() {
    assert!(language_codes_match("en", "eng"));
    assert!(language_codes_match("fr", "fre"));
    assert!(language_codes_match("de", "ger"));
    assert!(!language_codes_match("en", "fr"));
    assert!(!language_codes_match("en", "zz"));
}

/// Test language name lookup
#[test]
fn test_get_language_name_withValidCode_shouldReturnEnglishName() {
    assert_eq!(get_language_name("en").unwrap(), "English");
    assert_eq!(get_language_name("fra").unwrap(), "French");
    assert!(get_language_name("zz").is_err());
}
