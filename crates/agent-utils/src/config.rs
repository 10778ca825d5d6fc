//! Environment configuration helpers
//!
//! Blank values are treated the same as unset ones, so an exported but empty
//! `GEMINI_API_KEY=` does not count as configured.

/// Read an environment variable, ignoring blank values
pub fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Return the first non-blank variable among `names`, in order
pub fn first_env_var(names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| env_var(name))
}

/// Read a boolean flag (`1`, `true`, `yes`, `on`; case-insensitive)
pub fn env_flag(name: &str) -> Option<bool> {
    env_var(name).map(|value| {
        matches!(
            value.to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_is_unset() {
        // SAFETY: test-local variable names, not read by other tests
        unsafe {
            std::env::set_var("AGENT_UTILS_TEST_BLANK", "   ");
        }
        assert_eq!(env_var("AGENT_UTILS_TEST_BLANK"), None);
    }

    #[test]
    fn test_first_env_var_order() {
        // SAFETY: test-local variable names, not read by other tests
        unsafe {
            std::env::remove_var("AGENT_UTILS_TEST_PRIMARY");
            std::env::set_var("AGENT_UTILS_TEST_ALIAS", "from-alias");
        }
        assert_eq!(
            first_env_var(&["AGENT_UTILS_TEST_PRIMARY", "AGENT_UTILS_TEST_ALIAS"]),
            Some("from-alias".to_string())
        );

        unsafe {
            std::env::set_var("AGENT_UTILS_TEST_PRIMARY", "from-primary");
        }
        assert_eq!(
            first_env_var(&["AGENT_UTILS_TEST_PRIMARY", "AGENT_UTILS_TEST_ALIAS"]),
            Some("from-primary".to_string())
        );
    }

    #[test]
    fn test_env_flag() {
        // SAFETY: test-local variable names, not read by other tests
        unsafe {
            std::env::set_var("AGENT_UTILS_TEST_FLAG_ON", "TRUE");
            std::env::set_var("AGENT_UTILS_TEST_FLAG_OFF", "0");
        }
        assert_eq!(env_flag("AGENT_UTILS_TEST_FLAG_ON"), Some(true));
        assert_eq!(env_flag("AGENT_UTILS_TEST_FLAG_OFF"), Some(false));
        assert_eq!(env_flag("AGENT_UTILS_TEST_FLAG_MISSING"), None);
    }
}
