//! Export of loaded records to CSV or JSON files.
//!
//! CSV columns come from the keys of the first record, in field order.
//! Later records are written positionally against those columns: a missing
//! field becomes an empty cell and a field the first record lacks is
//! dropped.

use crate::error::AppError;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// CSV text for `records`, or `None` when there is nothing to export.
pub fn to_csv<T: Serialize>(records: &[T]) -> Result<Option<String>, AppError> {
    let rows = records
        .iter()
        .map(|r| match serde_json::to_value(r)? {
            Value::Object(map) => Ok(map),
            other => Err(<serde_json::Error as serde::ser::Error>::custom(format!(
                "export rows must be objects, got {}",
                other
            ))),
        })
        .collect::<Result<Vec<Map<String, Value>>, _>>()?;
    let Some(first) = rows.first() else {
        return Ok(None);
    };
    let headers: Vec<&String> = first.keys().collect();
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(headers.iter().map(|h| escape(h)).collect::<Vec<_>>().join(","));
    for row in &rows {
        let cells: Vec<String> = headers.iter().map(|h| escape(&cell(row.get(*h)))).collect();
        lines.push(cells.join(","));
    }
    Ok(Some(lines.join("\n")))
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Write `<dir>/<name>.csv`. Empty input writes nothing and returns `None`.
pub async fn write_csv<T: Serialize>(records: &[T], dir: &Path, name: &str) -> Result<Option<PathBuf>, AppError> {
    let Some(csv) = to_csv(records)? else {
        tracing::debug!(name, "nothing to export");
        return Ok(None);
    };
    write_file(dir, name, "csv", csv.as_bytes()).await.map(Some)
}

/// Write `<dir>/<name>.json` as a pretty-printed array.
pub async fn write_json<T: Serialize>(records: &[T], dir: &Path, name: &str) -> Result<Option<PathBuf>, AppError> {
    if records.is_empty() {
        tracing::debug!(name, "nothing to export");
        return Ok(None);
    }
    let json = serde_json::to_vec_pretty(records)?;
    write_file(dir, name, "json", &json).await.map(Some)
}

async fn write_file(dir: &Path, name: &str, extension: &str, contents: &[u8]) -> Result<PathBuf, AppError> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(format!("{}.{}", file_stem(name), extension));
    tokio::fs::write(&path, contents).await?;
    tracing::info!(path = %path.display(), bytes = contents.len(), "export written");
    Ok(path)
}

fn file_stem(name: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if stem.is_empty() {
        "export".to_string()
    } else {
        stem
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Usuario;
    use serde_json::json;

    #[test]
    fn columns_follow_first_record() {
        let csv = to_csv(&[json!({ "a": 1, "b": 2 }), json!({ "a": 3 })]).unwrap().unwrap();
        assert_eq!(csv, "a,b\n1,2\n3,");

        let csv = to_csv(&[json!({ "a": 1 }), json!({ "b": 2, "a": 3 })]).unwrap().unwrap();
        assert_eq!(csv, "a\n1\n3");
    }

    #[test]
    fn special_characters_are_quoted() {
        let csv = to_csv(&[json!({ "t": "a,b", "q": "diz \"oi\"", "n": "x\ny", "tags": ["r", "s"], "ok": true })])
            .unwrap()
            .unwrap();
        assert_eq!(csv, "t,q,n,tags,ok\n\"a,b\",\"diz \"\"oi\"\"\",\"x\ny\",\"[\"\"r\"\",\"\"s\"\"]\",true");
    }

    #[test]
    fn typed_records_and_empty_input() {
        let ana = Usuario {
            id: "1".into(),
            nome: "Ana".into(),
            email: "ana@x.com".into(),
            idade: 30,
            created_at: None,
            updated_at: None,
        };
        assert_eq!(to_csv(&[ana]).unwrap().unwrap(), "id,nome,email,idade\n1,Ana,ana@x.com,30");
        assert_eq!(to_csv::<Usuario>(&[]).unwrap(), None);
        assert!(to_csv(&[1, 2]).is_err());
    }

    #[tokio::test]
    async fn files_land_in_target_dir() {
        let dir = tempfile::tempdir().unwrap();
        let rows = vec![json!({ "key": "s:1", "value": "v" })];
        let csv = write_csv(&rows, dir.path(), "cache entries").await.unwrap().unwrap();
        assert_eq!(csv, dir.path().join("cache_entries.csv"));
        assert_eq!(std::fs::read_to_string(&csv).unwrap(), "key,value\ns:1,v");

        let json = write_json(&rows, dir.path(), "cache").await.unwrap().unwrap();
        let back: Vec<Value> = serde_json::from_slice(&std::fs::read(json).unwrap()).unwrap();
        assert_eq!(back, rows);

        assert_eq!(write_csv::<Value>(&[], dir.path(), "vazio").await.unwrap(), None);
        assert!(!dir.path().join("vazio.csv").exists());
    }
}
