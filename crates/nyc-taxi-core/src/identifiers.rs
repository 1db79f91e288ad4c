use crate::error::{Error, Result};

/// Accepts `table` or `schema.table`, each part a plain SQL identifier.
///
/// Table names are interpolated into statements, so anything that is not a
/// bare identifier is rejected before a connection is opened.
pub fn validate_table_name(table_name: &str) -> Result<()> {
    if table_name.is_empty() {
        return Err(invalid(table_name, "table name is empty"));
    }
    let parts: Vec<&str> = table_name.split('.').collect();
    if parts.len() > 2 {
        return Err(invalid(table_name, "at most one schema qualifier is allowed"));
    }
    for part in parts {
        validate_identifier(part).map_err(|reason| invalid(table_name, reason))?;
    }
    Ok(())
}

/// Database names are created with a quoted identifier, but they are still
/// held to the same character set as table names.
pub fn validate_database_name(name: &str) -> Result<()> {
    validate_identifier(name).map_err(|reason| invalid(name, reason))
}

/// Double-quotes an identifier for use in DDL.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn validate_identifier(value: &str) -> std::result::Result<(), &'static str> {
    let mut chars = value.chars();
    let Some(first) = chars.next() else {
        return Err("identifier is empty");
    };
    if !is_ident_start(first) || !chars.all(is_ident_continue) {
        return Err("must be alphanumeric or underscore and start with a letter or underscore");
    }
    Ok(())
}

fn invalid(name: &str, reason: &'static str) -> Error {
    Error::InvalidIdentifier {
        name: name.to_string(),
        reason,
    }
}

fn is_ident_start(value: char) -> bool {
    value == '_' || value.is_ascii_alphabetic()
}

fn is_ident_continue(value: char) -> bool {
    is_ident_start(value) || value.is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_and_qualified_names() {
        assert!(validate_table_name("trips").is_ok());
        assert!(validate_table_name("_staging_trips2").is_ok());
        assert!(validate_table_name("public.trips").is_ok());
    }

    #[test]
    fn rejects_injection_and_malformed_names() {
        for bad in [
            "",
            "trips; DROP TABLE trips",
            "1trips",
            "public.",
            ".trips",
            "a.b.c",
            "trips-2024",
            "\"trips\"",
        ] {
            assert!(
                matches!(validate_table_name(bad), Err(Error::InvalidIdentifier { .. })),
                "expected '{bad}' to be rejected"
            );
        }
    }

    #[test]
    fn database_names_must_be_single_identifiers() {
        assert!(validate_database_name("nyc_taxi").is_ok());
        assert!(validate_database_name("public.nyc_taxi").is_err());
    }

    #[test]
    fn quoting_escapes_embedded_quotes() {
        assert_eq!(quote_identifier("nyc_taxi"), "\"nyc_taxi\"");
        assert_eq!(quote_identifier("we\"ird"), "\"we\"\"ird\"");
    }
}
