//! Environment variable parsing utilities.

use std::str::FromStr;

use super::ConfigError;

/// Get environment variable with default value.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get optional environment variable (None if empty or missing).
pub fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.is_empty())
}

/// Parse environment variable as boolean.
/// Treats "1", "true" (case-insensitive) as true.
pub fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| parse_bool(&v))
        .unwrap_or(default)
}

/// "1" and "true" (case-insensitive) are true, everything else false.
pub fn parse_bool(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

/// Parse environment variable with type conversion.
pub fn env_parse<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(v) if !v.is_empty() => v.parse().map_err(|e: T::Err| ConfigError::Parse {
            key: key.into(),
            value: v,
            error: e.to_string(),
        }),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("1"));
        assert!(parse_bool("true"));
        assert!(parse_bool("TRUE"));
        assert!(!parse_bool("0"));
        assert!(!parse_bool("yes"));
        assert!(!parse_bool(""));
    }

    #[test]
    fn test_env_parse_missing_uses_default() {
        let v: u16 = env_parse("TOKIO_MVC_TEST_UNSET_PORT", 8080).unwrap();
        assert_eq!(v, 8080);
    }
}
