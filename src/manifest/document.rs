//! # 清单文档模块
//!
//! ## 设计思路
//!
//! 清单是输出阶段与筛选工具之间唯一的数据契约：一个 JSON 对象，
//! 键为产物名或统计项，值为产物文件名（以 `.png` 结尾）或标量统计值。
//!
//! ## 实现思路
//!
//! - 基于 `serde_json::Map`（开启 `preserve_order`），键顺序即插入顺序，
//!   保证输出可复现，也让筛选结果按请求顺序排列。
//! - 写出时使用 4 空格缩进。

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

use super::{ARTIFACT_EXTENSION, ManifestError};

/// 插入有序的清单文档。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    entries: Map<String, Value>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// 读取并解析清单文件。
    ///
    /// 文件不存在时返回 `ManifestError::NotFound`，便于调用侧区分“缺失”与“损坏”。
    pub fn read_from(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ManifestError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let value: Value = serde_json::from_str(&content).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        match value {
            Value::Object(entries) => Ok(Self { entries }),
            _ => Err(ManifestError::NotAnObject(path.to_path_buf())),
        }
    }

    /// 以 4 空格缩进写出清单（覆盖已有文件）。
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), ManifestError> {
        let path = path.as_ref();
        let content = self.to_pretty_string()?;

        let mut file = fs::File::create(path).map_err(|source| ManifestError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        file.write_all(content.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|source| ManifestError::Write {
                path: path.to_path_buf(),
                source,
            })
    }

    pub fn to_pretty_string(&self) -> Result<String, ManifestError> {
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.entries
            .serialize(&mut serializer)
            .map_err(ManifestError::Serialize)?;

        String::from_utf8(buffer)
            .map_err(|e| ManifestError::Serialize(serde::ser::Error::custom(e.to_string())))
    }

    /// 插入或覆盖一项；返回被覆盖的旧值。
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.entries
    }
}

/// 若取值是图片产物文件名（字符串且以 `.png` 结尾），返回该文件名。
pub fn artifact_file_name(value: &Value) -> Option<&str> {
    let name = value.as_str()?;
    let suffix = format!(".{}", ARTIFACT_EXTENSION);
    name.ends_with(&suffix).then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_dir() -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock error")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("delta-image-manifest-test-{nanos}"));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    #[test]
    fn keys_keep_insertion_order() {
        let mut manifest = Manifest::new();
        manifest.insert("matchPercent", 87.5);
        manifest.insert("ColorDelta", "ColorDelta.png");
        manifest.insert("averageDelta", 1.0);

        let keys: Vec<&str> = manifest.keys().collect();
        assert_eq!(keys, vec!["matchPercent", "ColorDelta", "averageDelta"]);
    }

    #[test]
    fn pretty_string_uses_four_space_indent() {
        let mut manifest = Manifest::new();
        manifest.insert("ColorDelta", "ColorDelta.png");

        let text = manifest.to_pretty_string().expect("serialize");

        assert_eq!(text, "{\n    \"ColorDelta\": \"ColorDelta.png\"\n}");
    }

    #[test]
    fn write_then_read_back() {
        let dir = unique_temp_dir();
        let path = dir.join("diff.json");
        let mut manifest = Manifest::new();
        manifest.insert("ColorDelta", "ColorDelta.png");
        manifest.insert("matchPercent", 99.5);

        manifest.write_to(&path).expect("write manifest");
        let loaded = Manifest::read_from(&path).expect("read manifest");

        assert_eq!(loaded, manifest);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn read_reports_missing_and_invalid_documents() {
        let dir = unique_temp_dir();

        assert!(matches!(
            Manifest::read_from(dir.join("diff.json")),
            Err(ManifestError::NotFound(_))
        ));

        let broken = dir.join("broken.json");
        std::fs::write(&broken, "{ not json").expect("write broken");
        assert!(matches!(Manifest::read_from(&broken), Err(ManifestError::Parse { .. })));

        let array = dir.join("array.json");
        std::fs::write(&array, "[1, 2]").expect("write array");
        assert!(matches!(Manifest::read_from(&array), Err(ManifestError::NotAnObject(_))));

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn artifact_file_name_requires_png_string() {
        assert_eq!(artifact_file_name(&json!("ColorDelta.png")), Some("ColorDelta.png"));
        assert_eq!(artifact_file_name(&json!("notes.txt")), None);
        assert_eq!(artifact_file_name(&json!(87.5)), None);
    }
}
