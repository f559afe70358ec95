//! Environment variable parsing with warn-level logging for invalid values.

/// Parse an environment variable with a default fallback.
///
/// - Unset or blank: returns `default` silently.
/// - Set but unparseable: logs a warning and returns `default`.
pub fn env_parse_with_default<T: std::str::FromStr + std::fmt::Display>(
    var: &str,
    default: T,
) -> T {
    match env_non_empty(var) {
        Some(v) => match v.parse() {
            Ok(n) => n,
            Err(_) => {
                tracing::warn!(
                    var,
                    value = %v,
                    default = %default,
                    "invalid env var value, using default"
                );
                default
            },
        },
        None => default,
    }
}

/// Read an environment variable, treating blank values as unset.
pub fn env_non_empty(var: &str) -> Option<String> {
    std::env::var(var).ok().map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test owns a distinct variable name, so no cross-test locking is needed.

    #[test]
    fn parses_valid_page_size() {
        let var = "ECCO_VIEW_TEST_PAGE_SIZE_41877";
        unsafe { std::env::set_var(var, "50") };
        let result: usize = env_parse_with_default(var, 20);
        assert_eq!(result, 50);
        unsafe { std::env::remove_var(var) };
    }

    #[test]
    fn falls_back_on_garbage() {
        let var = "ECCO_VIEW_TEST_FOLLOW_UP_41878";
        unsafe { std::env::set_var(var, "a week") };
        let result: i64 = env_parse_with_default(var, 7);
        assert_eq!(result, 7);
        unsafe { std::env::remove_var(var) };
    }

    #[test]
    fn blank_value_counts_as_unset() {
        let var = "ECCO_VIEW_TEST_TOKEN_41879";
        unsafe { std::env::set_var(var, "   ") };
        assert!(env_non_empty(var).is_none());
        let result: u64 = env_parse_with_default(var, 30);
        assert_eq!(result, 30);
        unsafe { std::env::remove_var(var) };
    }

    #[test]
    fn missing_var_uses_default() {
        let var = "ECCO_VIEW_TEST_MISSING_41880";
        unsafe { std::env::remove_var(var) };
        assert!(env_non_empty(var).is_none());
        let result: u32 = env_parse_with_default(var, 10);
        assert_eq!(result, 10);
    }
}
