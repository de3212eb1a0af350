use rust_embed::RustEmbed;
use sqlx::{Executor, PgPool};
use tracing::{debug, info};

use crate::error::{DbError, Result};

pub const BUILD_ORDER: &str = "00_build_order.sql";

#[derive(RustEmbed)]
#[folder = "schema/"]
struct SchemaAssets;

/// Reads the build order and applies all SQL files in a single transaction.
pub async fn rebuild_database(pool: &PgPool) -> Result<()> {
    let full_script = build_script()?;

    let mut tx = pool.begin().await.map_err(|e| DbError::Database(e.to_string()))?;
    tx.execute(full_script.as_str())
        .await
        .map_err(|e| DbError::Schema(e.to_string()))?;
    tx.commit().await.map_err(|e| DbError::Database(e.to_string()))?;

    info!("schema rebuilt");
    Ok(())
}

/// The manifest with every `-- @include` line replaced by the file it names.
/// Other comment lines are dropped.
pub fn build_script() -> Result<String> {
    let manifest = get_file_content(BUILD_ORDER)?;

    let mut full_script = String::new();
    for line in manifest.lines() {
        let trimmed = line.trim();

        if let Some(path) = parse_include_directive(trimmed) {
            debug!(file = path, "including schema file");
            full_script.push_str(&get_file_content(path)?);
            full_script.push('\n');
        } else if !trimmed.starts_with("--") {
            full_script.push_str(line);
            full_script.push('\n');
        }
    }

    Ok(full_script)
}

fn get_file_content(path: &str) -> Result<String> {
    let file = SchemaAssets::get(path)
        .ok_or_else(|| DbError::Schema(format!("missing schema file: {}", path)))?;
    String::from_utf8(file.data.into_owned())
        .map_err(|e| DbError::Schema(format!("{} is not UTF-8: {}", path, e)))
}

fn parse_include_directive(line: &str) -> Option<&str> {
    if line.starts_with("--") && line.contains("@include") {
        line.split_whitespace().last()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn include_directive() {
        assert_eq!(
            parse_include_directive("-- @include tables/pix_codes.sql"),
            Some("tables/pix_codes.sql")
        );
        assert_eq!(parse_include_directive("-- plain comment"), None);
        assert_eq!(parse_include_directive("CREATE TABLE x ();"), None);
    }

    #[test]
    fn script_creates_accounts_before_codes() {
        let script = build_script().unwrap();
        let accounts = script.find("CREATE TABLE estabelecimentos").unwrap();
        let codes = script.find("CREATE TABLE pix_codes").unwrap();
        assert!(accounts < codes);
        assert!(script.contains("idx_pix_codes_codigo_pix"));
        assert!(!script.contains("@include"));
    }

    #[test]
    fn unknown_file_is_a_schema_error() {
        assert!(matches!(get_file_content("nope.sql"), Err(DbError::Schema(_))));
    }
}
