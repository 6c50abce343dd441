//! `purlscope index` command handler

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use purlscope_core::pipeline::NamespaceIndex;
use purlscope_evidence::SqliteNamespaceIndex;
use purlscope_evidence::resolver::index::parse_namespace_entries;

use crate::cli::{IndexAction, IndexArgs};
use crate::commands::{load_config, resolve_db_path};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `index` command.
pub async fn execute(
    args: IndexArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let config = load_config(config_path).await?;
    match args.action {
        IndexAction::Import { source, db_path } => {
            let db_path = require_db_path(resolve_db_path(db_path, &config))?;
            let report = import(&source, &db_path).await?;
            writer.render(&report)
        }
        IndexAction::Query { needle, db_path } => {
            let db_path = require_db_path(resolve_db_path(db_path, &config))?;
            let report = query(&db_path, needle).await?;
            writer.render(&report)
        }
    }
}

fn require_db_path(db_path: Option<String>) -> Result<PathBuf, CliError> {
    db_path.map(PathBuf::from).ok_or_else(|| {
        CliError::Config("no namespace index path: pass --db-path or set evidence.db_path".to_owned())
    })
}

/// Load a `{purl: namespaces}` JSON file into the SQLite index.
async fn import(source: &Path, db_path: &Path) -> Result<ImportReport, CliError> {
    let json = tokio::fs::read_to_string(source).await?;
    let entries = parse_namespace_entries(&json)?;

    info!(
        source = %source.display(),
        db = %db_path.display(),
        entries = entries.len(),
        "importing namespace index"
    );

    let db = db_path.to_path_buf();
    let (imported, total) = tokio::task::spawn_blocking(move || {
        let index = SqliteNamespaceIndex::open(&db)?;
        let imported = index.import(entries)?;
        let total = index.count()?;
        Ok::<_, purlscope_core::error::PurlscopeError>((imported, total))
    })
    .await
    .map_err(|e| CliError::Command(format!("index import task failed: {e}")))??;

    Ok(ImportReport {
        source: source.display().to_string(),
        db_path: db_path.display().to_string(),
        imported,
        total,
    })
}

/// Run one substring lookup against the SQLite index.
async fn query(db_path: &Path, needle: String) -> Result<QueryReport, CliError> {
    if !tokio::fs::try_exists(db_path).await.unwrap_or(false) {
        return Err(CliError::Command(format!(
            "namespace index not found: {}",
            db_path.display()
        )));
    }

    let db = db_path.to_path_buf();
    let lookup = needle.clone();
    let purls = tokio::task::spawn_blocking(move || {
        let index = SqliteNamespaceIndex::open(&db)?;
        index.find(&lookup)
    })
    .await
    .map_err(|e| CliError::Command(format!("index query task failed: {e}")))??;

    Ok(QueryReport {
        db_path: db_path.display().to_string(),
        needle,
        purls,
    })
}

/// Result of `index import`.
#[derive(Debug, Serialize)]
pub struct ImportReport {
    pub source: String,
    pub db_path: String,
    pub imported: usize,
    pub total: u64,
}

impl Render for ImportReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Namespace Index: {}", self.db_path.bold())?;
        writeln!(
            w,
            "  Imported {} entries from {} ({} total)",
            self.imported.to_string().green(),
            self.source,
            self.total
        )?;
        Ok(())
    }
}

/// Result of `index query`.
#[derive(Debug, Serialize)]
pub struct QueryReport {
    pub db_path: String,
    pub needle: String,
    pub purls: Vec<String>,
}

impl Render for QueryReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(
            w,
            "Namespace Index: {} (query: {})",
            self.db_path.bold(),
            self.needle
        )?;
        if self.purls.is_empty() {
            writeln!(w, "  {}", "no matching packages".dimmed())?;
        } else {
            for purl in &self.purls {
                writeln!(w, "  {purl}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAMESPACES: &str = r#"{
        "pkg:maven/org.slf4j/slf4j-api@2.0.9": "org.slf4j.Logger\norg.slf4j.LoggerFactory",
        "pkg:maven/com.google.guava/guava@32.1.2-jre": "com.google.common.collect.ImmutableList"
    }"#;

    #[tokio::test]
    async fn test_import_then_query() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = dir.path().join("namespaces.json");
        let db = dir.path().join("ns.db");
        std::fs::write(&source, NAMESPACES).expect("write");

        let report = import(&source, &db).await.expect("import");
        assert_eq!(report.imported, 2);
        assert_eq!(report.total, 2);

        let found = query(&db, "org.slf4j.Logger".to_owned())
            .await
            .expect("query");
        assert_eq!(found.purls, vec!["pkg:maven/org.slf4j/slf4j-api@2.0.9"]);

        let none = query(&db, "io.netty".to_owned()).await.expect("query");
        assert!(none.purls.is_empty());
    }

    #[tokio::test]
    async fn test_reimport_updates_in_place() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = dir.path().join("namespaces.json");
        let db = dir.path().join("ns.db");
        std::fs::write(&source, NAMESPACES).expect("write");

        import(&source, &db).await.expect("first import");
        let report = import(&source, &db).await.expect("second import");
        assert_eq!(report.imported, 2);
        assert_eq!(report.total, 2, "upsert should not duplicate rows");
    }

    #[tokio::test]
    async fn test_import_rejects_non_object_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = dir.path().join("bad.json");
        std::fs::write(&source, "[\"pkg:npm/left-pad@1.0.0\"]").expect("write");

        let result = import(&source, &dir.path().join("ns.db")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_query_missing_index() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = query(&dir.path().join("absent.db"), "x".to_owned())
            .await
            .expect_err("missing index");
        assert!(matches!(err, CliError::Command(_)));
    }

    #[test]
    fn test_require_db_path() {
        assert!(require_db_path(None).is_err());
        assert_eq!(
            require_db_path(Some("ns.db".to_owned())).expect("path"),
            PathBuf::from("ns.db")
        );
    }

    #[test]
    fn test_query_report_render_empty() {
        let report = QueryReport {
            db_path: "ns.db".to_owned(),
            needle: "io.netty".to_owned(),
            purls: Vec::new(),
        };
        let mut buffer = Vec::new();
        report.render_text(&mut buffer).expect("render");
        let output = String::from_utf8(buffer).expect("utf8");
        assert!(output.contains("io.netty"));
        assert!(output.contains("no matching packages"));
    }
}
