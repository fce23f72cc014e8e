//! `${VAR}` expansion for account settings.

/// Expand `${VAR}` and `${VAR:-default}` references in `value`.
///
/// Every unset variable without a default is collected, so a single load
/// reports all of them. `$VAR` without braces is left alone, and a value
/// with no `${` is returned as is.
pub(crate) fn expand_env(value: &str) -> Result<String, Vec<String>> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    let mut unset: Vec<String> = Vec::new();
    loop {
        let expanded = shellexpand::env_with_context(value, |var| -> Result<Option<String>, NotSet> {
            if unset.iter().any(|name| name == var) {
                return Ok(Some(String::new()));
            }
            std::env::var(var).map(Some).map_err(|_| NotSet)
        });

        match expanded {
            Ok(expanded) if unset.is_empty() => return Ok(expanded.into_owned()),
            Ok(_) => return Err(unset),
            Err(e) => unset.push(e.var_name),
        }
    }
}

/// Lookup failure for a variable that is not in the environment.
struct NotSet;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_expand_simple_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("SS_EXPAND_SIMPLE", "demo");
        }
        assert_eq!(expand_env("${SS_EXPAND_SIMPLE}"), Ok("demo".to_owned()));
        unsafe {
            std::env::remove_var("SS_EXPAND_SIMPLE");
        }
    }

    #[test]
    fn test_unset_var_uses_default() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("SS_EXPAND_UNSET");
        }
        assert_eq!(
            expand_env("${SS_EXPAND_UNSET:-www.supersaas.com}"),
            Ok("www.supersaas.com".to_owned())
        );
    }

    #[test]
    fn test_empty_default_expands_to_empty() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("SS_EXPAND_NO_PASSWORD");
        }
        assert_eq!(expand_env("${SS_EXPAND_NO_PASSWORD:-}"), Ok(String::new()));
    }

    #[test]
    fn test_every_unset_var_reported() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("SS_EXPAND_HOST");
            std::env::remove_var("SS_EXPAND_PATH");
            std::env::set_var("SS_EXPAND_SCHEME", "https");
        }
        let result = expand_env("${SS_EXPAND_SCHEME}://${SS_EXPAND_HOST}/${SS_EXPAND_PATH}/${SS_EXPAND_HOST}");
        assert_eq!(
            result,
            Err(vec!["SS_EXPAND_HOST".to_owned(), "SS_EXPAND_PATH".to_owned()])
        );
        unsafe {
            std::env::remove_var("SS_EXPAND_SCHEME");
        }
    }

    #[test]
    fn test_expand_embedded_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("SS_EXPAND_ACCOUNT", "demo");
        }
        assert_eq!(
            expand_env("/schedule/${SS_EXPAND_ACCOUNT}/Therapists"),
            Ok("/schedule/demo/Therapists".to_owned())
        );
        unsafe {
            std::env::remove_var("SS_EXPAND_ACCOUNT");
        }
    }

    #[test]
    fn test_bare_dollar_not_expanded() {
        assert_eq!(expand_env("pa$$word"), Ok("pa$$word".to_owned()));
    }
}
