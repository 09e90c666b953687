//! Writes result maps as a pretty `<name>.json` and a compact `<name>_min.json`.
use crate::error::ExportError;
use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Serializer, Value};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

const INDENT: &[u8] = b"    ";

/// Paths of the two files written for one export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedFiles {
    pub pretty: PathBuf,
    pub minified: PathBuf,
}

/// Serializes `data` with object keys sorted at every level. With `minified` the output is
/// compact, otherwise it is indented by four spaces.
pub fn to_json_bytes<T>(data: &T, minified: bool) -> Result<Vec<u8>, ExportError>
where
    T: Serialize,
{
    // serde_json's Value keeps object keys in a BTreeMap, which sorts them
    let value: Value = serde_json::to_value(data)?;

    if minified {
        return Ok(serde_json::to_vec(&value)?);
    }

    let mut serializer = Serializer::with_formatter(Vec::new(), PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut serializer)?;

    Ok(serializer.into_inner())
}

/// Writes `<dir>/<name>.json` or `<dir>/<name>_min.json`.
pub fn export_file<T>(dir: &Path, name: &str, data: &T, minified: bool) -> Result<PathBuf, ExportError>
where
    T: Serialize,
{
    let file_name = if minified {
        format!("{}_min.json", name)
    } else {
        format!("{}.json", name)
    };
    let path = dir.join(file_name);
    let bytes = to_json_bytes(data, minified)?;

    fs::write(&path, bytes).map_err(|source| ExportError::FileIO {
        path: path.clone(),
        source,
    })?;

    Ok(path)
}

/// Writes both the pretty and the compact form, creating `dir` if needed.
pub fn export_pair<T>(dir: &Path, name: &str, data: &T) -> Result<ExportedFiles, ExportError>
where
    T: Serialize,
{
    fs::create_dir_all(dir).map_err(|source| ExportError::FileIO {
        path: dir.to_path_buf(),
        source,
    })?;

    let files = ExportedFiles {
        pretty: export_file(dir, name, data, false)?,
        minified: export_file(dir, name, data, true)?,
    };
    info!(
        "Exported {} and {}",
        files.pretty.display(),
        files.minified.display()
    );

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assay::assay;
    use std::collections::HashMap;

    #[derive(Serialize)]
    struct Record {
        zeta: u8,
        alpha: u8,
    }

    #[assay]
    fn sorts_keys_and_indents() {
        let mut data = HashMap::new();
        data.insert("b", Record { zeta: 1, alpha: 2 });
        data.insert("a", Record { zeta: 3, alpha: 4 });

        let pretty = String::from_utf8(to_json_bytes(&data, false).unwrap()).unwrap();
        let compact = String::from_utf8(to_json_bytes(&data, true).unwrap()).unwrap();

        assert_eq!(
            compact,
            r#"{"a":{"alpha":4,"zeta":3},"b":{"alpha":2,"zeta":1}}"#
        );
        assert!(pretty.starts_with("{\n    \"a\": {\n        \"alpha\": 4,"));
    }

    #[assay]
    fn writes_both_files() {
        let dir = PathBuf::from("export_test/out");
        let mut data = HashMap::new();
        data.insert("uatom_cosmoshub", vec!["x", "y"]);

        let files = export_pair(&dir, "denom_map", &data).unwrap();

        assert_eq!(files.pretty, dir.join("denom_map.json"));
        assert_eq!(files.minified, dir.join("denom_map_min.json"));
        let minified = fs::read_to_string(&files.minified).unwrap();
        assert!(!minified.contains('\n'));
        let pretty: Value = serde_json::from_str(&fs::read_to_string(&files.pretty).unwrap()).unwrap();
        assert_eq!(pretty, serde_json::from_str::<Value>(&minified).unwrap());
    }
}
