//! Querying the primary package manager's persisted registry setting.

use std::time::Duration;

use thiserror::Error;

use crate::detection::PackageManager;
use crate::error::AutodepError;
use crate::shell::{execute_quiet, CommandOptions, Invocation};

use super::resolver::REGISTRY_CHILD_ENV;

/// Why the registry query produced no usable URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The manager could not be started.
    #[error("could not run '{command}'")]
    Spawn { command: String },

    /// The manager exited unsuccessfully.
    #[error("'{command}' exited with code {code:?}")]
    NonZeroExit { command: String, code: Option<i32> },

    /// The manager did not answer in time.
    #[error("'{command}' timed out after {seconds}s")]
    TimedOut { command: String, seconds: u64 },

    /// The manager answered with nothing usable.
    #[error("'{command}' returned no registry")]
    EmptyOutput { command: String },
}

/// The query command: `npm config get registry`.
pub fn registry_query_command() -> Invocation {
    Invocation::new(PackageManager::Npm.program(), ["config", "get", "registry"])
}

/// Options for the query subprocess.
///
/// Both spellings of the inherited registry override are removed so a
/// wrapper (for example `yarn run`) cannot shadow the user's configured value.
/// The timeout is at least one second.
pub fn registry_query_options(timeout: Duration) -> CommandOptions {
    CommandOptions {
        env_remove: vec![
            REGISTRY_CHILD_ENV.to_string(),
            REGISTRY_CHILD_ENV.to_lowercase(),
        ],
        timeout: Some(timeout.as_secs().max(1)),
        ..Default::default()
    }
}

/// Ask npm for its configured registry.
pub fn query_npm_registry(timeout: Duration) -> Result<String, QueryError> {
    let invocation = registry_query_command();
    let command = invocation.to_string();
    let options = registry_query_options(timeout);

    let result = execute_quiet(&invocation, &options).map_err(|e| match e {
        AutodepError::CommandTimedOut { seconds, .. } => QueryError::TimedOut {
            command: command.clone(),
            seconds,
        },
        _ => QueryError::Spawn {
            command: command.clone(),
        },
    })?;

    if !result.success {
        return Err(QueryError::NonZeroExit {
            command,
            code: result.exit_code,
        });
    }

    parse_query_output(&result.stdout).ok_or(QueryError::EmptyOutput { command })
}

/// Trim the answer; `undefined` and `null` count as unset.
fn parse_query_output(stdout: &str) -> Option<String> {
    let url = stdout.trim();
    match url {
        "" | "undefined" | "null" => None,
        _ => Some(url.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_command_reads_npm_config() {
        let inv = registry_query_command();
        assert!(inv.program.starts_with("npm"));
        assert_eq!(inv.args, vec!["config", "get", "registry"]);
    }

    #[test]
    fn query_clears_both_registry_override_spellings() {
        let opts = registry_query_options(Duration::from_secs(10));
        assert!(opts.env_remove.iter().any(|k| k == "NPM_CONFIG_REGISTRY"));
        assert!(opts.env_remove.iter().any(|k| k == "npm_config_registry"));
        assert!(opts.env.is_empty());
        assert_eq!(opts.timeout, Some(10));
    }

    #[test]
    fn query_timeout_is_at_least_one_second() {
        let opts = registry_query_options(Duration::ZERO);
        assert_eq!(opts.timeout, Some(1));
    }

    #[test]
    fn output_is_trimmed() {
        assert_eq!(
            parse_query_output("https://registry.npmjs.org/\n"),
            Some("https://registry.npmjs.org/".to_string())
        );
    }

    #[test]
    fn unset_outputs_are_rejected() {
        assert_eq!(parse_query_output("\n"), None);
        assert_eq!(parse_query_output("undefined\n"), None);
        assert_eq!(parse_query_output("null"), None);
    }

    #[test]
    fn query_error_messages_name_the_command() {
        let err = QueryError::NonZeroExit {
            command: "npm config get registry".into(),
            code: Some(1),
        };
        assert!(err.to_string().contains("npm config get registry"));
    }
}
