use anyhow::Result;
use regex::Regex;
use std::env;
use tracing::{debug, warn};

const PLACEHOLDER: &str = r"\$\{(\w+)\}|\$([A-Za-z_]\w*)";

/// Substitute environment variables in the format ${VAR_NAME} or $VAR_NAME.
///
/// Unset variables keep their placeholder; validation reports them.
pub fn substitute_env_vars(content: &str) -> Result<String> {
    let re = Regex::new(PLACEHOLDER)?;
    let mut missing_vars = Vec::new();

    let result = re.replace_all(content, |caps: &regex::Captures| {
        let placeholder = &caps[0];
        let var_name = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map_or("", |m| m.as_str());

        match env::var(var_name) {
            Ok(value) => {
                debug!("Substituting environment variable: {}", var_name);
                value
            }
            Err(_) => {
                warn!("Environment variable '{}' not set", var_name);
                missing_vars.push(var_name.to_string());
                placeholder.to_string()
            }
        }
    });

    if !missing_vars.is_empty() {
        debug!(
            "Environment variables not set (will fail validation if used): {:?}",
            missing_vars
        );
    }

    Ok(result.into_owned())
}

/// Check if a string contains unresolved environment variable placeholders
pub fn has_unresolved_env_vars(content: &str) -> bool {
    Regex::new(PLACEHOLDER)
        .map(|re| re.is_match(content))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitutes_both_forms() {
        env::set_var("PARB_TEST_HOST", "127.0.0.1");
        env::set_var("PARB_TEST_PORT", "9000");

        let out = substitute_env_vars("host: ${PARB_TEST_HOST}\nport: $PARB_TEST_PORT").unwrap();
        assert_eq!(out, "host: 127.0.0.1\nport: 9000");
    }

    #[test]
    fn test_missing_var_keeps_placeholder() {
        env::remove_var("PARB_TEST_MISSING");

        let out = substitute_env_vars("url: ${PARB_TEST_MISSING}/api").unwrap();
        assert_eq!(out, "url: ${PARB_TEST_MISSING}/api");
        assert!(has_unresolved_env_vars(&out));
    }

    #[test]
    fn test_dollar_amounts_are_not_placeholders() {
        assert!(!has_unresolved_env_vars("note: costs $5"));
        assert!(!has_unresolved_env_vars("https://www.okx.com"));
    }
}
