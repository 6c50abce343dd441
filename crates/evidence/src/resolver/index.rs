//! 네임스페이스 인덱스 구현
//!
//! - [`MemoryNamespaceIndex`]: 테스트와 소규모 카탈로그용 인메모리 구현
//! - [`SqliteNamespaceIndex`]: `namespaces` 테이블을 가진 SQLite 파일
//!
//! 두 구현 모두 `{purl: data}` 형태의 JSON 객체에서 적재할 수 있습니다.
//! `data`가 문자열이 아니면 JSON 텍스트로 직렬화해 저장합니다.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;

use rusqlite::{Connection, params};
use tracing::{debug, info};

use purlscope_core::error::{IndexError, PurlscopeError};
use purlscope_core::pipeline::NamespaceIndex;

/// JSON 객체 `{purl: data}`를 `(purl, data)` 목록으로 변환합니다.
pub fn parse_namespace_entries(json: &str) -> Result<Vec<(String, String)>, PurlscopeError> {
    let value: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| IndexError::Import(format!("invalid namespace json: {e}")))?;
    let object = value
        .as_object()
        .ok_or_else(|| IndexError::Import("namespace json must be an object".to_owned()))?;

    Ok(object
        .iter()
        .map(|(purl, data)| {
            let data = match data {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (purl.clone(), data)
        })
        .collect())
}

/// 인메모리 네임스페이스 인덱스
#[derive(Debug, Default, Clone)]
pub struct MemoryNamespaceIndex {
    entries: BTreeMap<String, String>,
}

impl MemoryNamespaceIndex {
    /// 빈 인덱스를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// JSON 객체에서 인덱스를 생성합니다.
    pub fn from_json(json: &str) -> Result<Self, PurlscopeError> {
        let mut index = Self::new();
        for (purl, data) in parse_namespace_entries(json)? {
            index.insert(purl, data);
        }
        Ok(index)
    }

    /// 항목을 추가하거나 교체합니다.
    pub fn insert(&mut self, purl: impl Into<String>, data: impl Into<String>) {
        self.entries.insert(purl.into(), data.into());
    }

    /// 항목 수
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 비어 있는지 여부
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl NamespaceIndex for MemoryNamespaceIndex {
    fn name(&self) -> &str {
        "memory"
    }

    fn find(&self, needle: &str) -> Result<Vec<String>, PurlscopeError> {
        Ok(self
            .entries
            .iter()
            .filter(|(_, data)| data.contains(needle))
            .map(|(purl, _)| purl.clone())
            .collect())
    }
}

/// SQLite 기반 네임스페이스 인덱스
///
/// `rusqlite::Connection`은 `Sync`가 아니므로 `Mutex`로 감쌉니다.
/// 조회는 짧은 단일 쿼리이며 잠금을 쿼리 범위 밖으로 들고 나가지 않습니다.
#[derive(Debug)]
pub struct SqliteNamespaceIndex {
    conn: Mutex<Connection>,
}

impl SqliteNamespaceIndex {
    /// 파일을 열거나 생성하고 스키마를 보장합니다.
    pub fn open(path: &Path) -> Result<Self, PurlscopeError> {
        let conn = Connection::open(path)
            .map_err(|e| IndexError::Open(format!("{}: {e}", path.display())))?;
        Self::with_connection(conn)
    }

    /// 인메모리 SQLite 인덱스 (테스트용)
    pub fn open_in_memory() -> Result<Self, PurlscopeError> {
        let conn = Connection::open_in_memory().map_err(|e| IndexError::Open(e.to_string()))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, PurlscopeError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS namespaces (
                purl       TEXT PRIMARY KEY,
                data       TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .map_err(|e| IndexError::Open(format!("failed to create schema: {e}")))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// 항목을 일괄 적재합니다. 같은 purl이 있으면 data와 updated_at을 갱신합니다.
    ///
    /// 적재된 항목 수를 반환합니다.
    pub fn import<I>(&self, entries: I) -> Result<usize, PurlscopeError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let now = chrono::Utc::now().to_rfc3339();
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| IndexError::Import(format!("lock poisoned: {e}")))?;
        let tx = conn
            .transaction()
            .map_err(|e| IndexError::Import(e.to_string()))?;

        let mut count = 0usize;
        {
            let mut stmt = tx
                .prepare(
                    r#"
                    INSERT INTO namespaces (purl, data, created_at, updated_at)
                    VALUES (?1, ?2, ?3, ?3)
                    ON CONFLICT(purl) DO UPDATE SET
                        data = excluded.data,
                        updated_at = excluded.updated_at
                    "#,
                )
                .map_err(|e| IndexError::Import(e.to_string()))?;
            for (purl, data) in entries {
                stmt.execute(params![purl, data, now])
                    .map_err(|e| IndexError::Import(format!("{purl}: {e}")))?;
                count += 1;
            }
        }
        tx.commit().map_err(|e| IndexError::Import(e.to_string()))?;

        info!(entries = count, "namespace index import completed");
        Ok(count)
    }

    /// 저장된 항목 수
    pub fn count(&self) -> Result<u64, PurlscopeError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| IndexError::Query(format!("lock poisoned: {e}")))?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM namespaces", [], |row| row.get(0))
            .map_err(|e| IndexError::Query(e.to_string()))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }
}

impl NamespaceIndex for SqliteNamespaceIndex {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn find(&self, needle: &str) -> Result<Vec<String>, PurlscopeError> {
        let pattern = format!("%{}%", escape_like(needle));
        let conn = self
            .conn
            .lock()
            .map_err(|e| IndexError::Query(format!("lock poisoned: {e}")))?;
        let mut stmt = conn
            .prepare(
                r#"
                SELECT purl
                FROM namespaces
                WHERE data LIKE ?1 ESCAPE '\'
                ORDER BY purl
                "#,
            )
            .map_err(|e| IndexError::Query(e.to_string()))?;
        let rows = stmt
            .query_map(params![pattern], |row| row.get::<_, String>(0))
            .map_err(|e| IndexError::Query(e.to_string()))?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row.map_err(|e| IndexError::Query(e.to_string()))?);
        }
        debug!(needle, hits = out.len(), "namespace index queried");
        Ok(out)
    }
}

/// LIKE 패턴의 메타 문자(`%`, `_`)와 이스케이프 문자를 이스케이프합니다.
fn escape_like(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"{
        "pkg:maven/org.slf4j/slf4j-api@2.0.9": "org.slf4j.Logger\norg.slf4j.LoggerFactory",
        "pkg:maven/com.google.guava/guava@32.1.2-jre": "com.google.common.collect.ImmutableList",
        "pkg:maven/org.example/under_score@1.0": "org.example.snake_case.Util",
        "pkg:maven/org.example/listed@1.0": ["org.example.listed.Thing"]
    }"#;

    #[test]
    fn parse_entries_stringifies_non_string_data() {
        let entries = parse_namespace_entries(CATALOG).unwrap();
        assert_eq!(entries.len(), 4);
        let listed = entries
            .iter()
            .find(|(purl, _)| purl.contains("listed"))
            .unwrap();
        assert!(listed.1.contains("org.example.listed.Thing"));
    }

    #[test]
    fn parse_entries_rejects_non_object() {
        assert!(parse_namespace_entries("[1, 2]").is_err());
        assert!(parse_namespace_entries("not json").is_err());
    }

    #[test]
    fn memory_index_substring_lookup() {
        let index = MemoryNamespaceIndex::from_json(CATALOG).unwrap();
        assert_eq!(
            index.find("org.slf4j.LoggerFactory").unwrap(),
            vec!["pkg:maven/org.slf4j/slf4j-api@2.0.9".to_owned()]
        );
        assert!(index.find("io.netty").unwrap().is_empty());
    }

    #[test]
    fn sqlite_index_import_and_find() {
        let index = SqliteNamespaceIndex::open_in_memory().unwrap();
        let imported = index
            .import(parse_namespace_entries(CATALOG).unwrap())
            .unwrap();
        assert_eq!(imported, 4);
        assert_eq!(index.count().unwrap(), 4);
        assert_eq!(
            index.find("com.google.common.collect").unwrap(),
            vec!["pkg:maven/com.google.guava/guava@32.1.2-jre".to_owned()]
        );
    }

    #[test]
    fn sqlite_index_escapes_like_wildcards() {
        let index = SqliteNamespaceIndex::open_in_memory().unwrap();
        index
            .import(parse_namespace_entries(CATALOG).unwrap())
            .unwrap();
        // `_`는 와일드카드가 아니라 문자 그대로 비교되어야 함
        assert_eq!(
            index.find("snake_case").unwrap(),
            vec!["pkg:maven/org.example/under_score@1.0".to_owned()]
        );
        assert!(index.find("snake%case").unwrap().is_empty());
        assert!(index.find("org_slf4j").unwrap().is_empty());
    }

    #[test]
    fn sqlite_import_upserts_existing_purl() {
        let index = SqliteNamespaceIndex::open_in_memory().unwrap();
        index
            .import([("pkg:npm/a@1".to_owned(), "old.Symbol".to_owned())])
            .unwrap();
        index
            .import([("pkg:npm/a@1".to_owned(), "new.Symbol".to_owned())])
            .unwrap();
        assert_eq!(index.count().unwrap(), 1);
        assert!(index.find("old.Symbol").unwrap().is_empty());
        assert_eq!(index.find("new.Symbol").unwrap().len(), 1);
    }

    #[test]
    fn sqlite_index_persists_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("namespaces.db");
        {
            let index = SqliteNamespaceIndex::open(&path).unwrap();
            index
                .import([("pkg:pypi/requests@2.31.0".to_owned(), "requests.Session".to_owned())])
                .unwrap();
        }
        let reopened = SqliteNamespaceIndex::open(&path).unwrap();
        assert_eq!(reopened.find("requests.Session").unwrap().len(), 1);
    }

    #[test]
    fn escape_like_escapes_metacharacters() {
        assert_eq!(escape_like("a_b%c\\d"), "a\\_b\\%c\\\\d");
    }
}
