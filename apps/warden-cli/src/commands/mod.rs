pub mod auth_url;
pub mod hash;
pub mod keys;
pub mod vault;

use std::io::Read;

use crate::error::{CliError, CliResult};

/// Use `value` when given, otherwise read one value from stdin.
pub(crate) fn value_or_stdin(value: Option<String>, what: &str) -> CliResult<String> {
    match value {
        Some(v) => Ok(v),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            let trimmed = buf.trim_end_matches(['\r', '\n']).to_string();
            if trimmed.is_empty() {
                return Err(CliError::Validation(format!("No {what} given on stdin")));
            }
            Ok(trimmed)
        }
    }
}
