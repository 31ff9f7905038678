use anyhow::{anyhow, Result};
use cadence_core::error::CoreError;
use serde::Serialize;
use uuid::Uuid;

/// Parses a full task/occurrence/project id given on the command line.
pub fn parse_id(input: &str, what: &str) -> Result<Uuid> {
    input
        .trim()
        .parse::<Uuid>()
        .map_err(|_| anyhow!(CoreError::validation(format!("'{input}' is not a valid {what} id"))))
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let id = Uuid::now_v7();
        assert_eq!(parse_id(&id.to_string(), "task").unwrap(), id);

        let err = parse_id("abc", "task").unwrap_err();
        assert!(matches!(err.downcast_ref::<CoreError>(), Some(CoreError::Validation(_))));
        assert_eq!(err.to_string(), "'abc' is not a valid task id");
    }
}
