//! # 清单筛选模块
//!
//! ## 设计思路
//!
//! 从一次比对的输出目录中挑出调用方关心的键，生成精简清单 `filtered.json`，
//! 并把被引用的图片产物一并复制到目标目录，使筛选结果可以独立分发。
//!
//! ## 实现思路
//!
//! 1. 读取 `<input>/diff.json`（缺失 → `ManifestNotFound`）
//! 2. 创建输出目录
//! 3. 按请求顺序投影键；值为 `.png` 文件名时复制对应文件（覆盖）。
//!    文件名必须是相对路径且不含 `..`，否则拒绝（`UnsafeArtifactPath`）
//! 4. 清单中不存在的键静默跳过（仅记录 debug 日志）
//! 5. 写出 `<output>/filtered.json`，写入失败同样上报

use std::fs;
use std::path::{Component, Path, PathBuf};

use super::{
    DIFF_MANIFEST_FILE, FILTERED_MANIFEST_FILE, FilterError, Manifest, ManifestError,
    artifact_file_name,
};

/// 筛选结果汇总。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSummary {
    pub manifest_path: PathBuf,
    /// 写入精简清单的键（按请求顺序，已去重）。
    pub kept_keys: Vec<String>,
    /// 源清单中不存在、被跳过的键。
    pub skipped_keys: Vec<String>,
    /// 复制到输出目录的产物文件名。
    pub copied_files: Vec<String>,
}

/// 按关键字筛选清单并复制引用的图片产物。
///
/// # 示例
/// ```rust,no_run
/// use delta_image::manifest::filter;
///
/// let summary = filter("out/run-1", "out/run-1-filtered", &["ColorDelta", "matchPercent"])?;
/// println!("kept: {:?}", summary.kept_keys);
/// # Ok::<(), delta_image::manifest::FilterError>(())
/// ```
pub fn filter<S: AsRef<str>>(
    input_dir: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    keywords: &[S],
) -> Result<FilterSummary, FilterError> {
    let input_dir = input_dir.as_ref();
    let output_dir = output_dir.as_ref();
    let source_path = input_dir.join(DIFF_MANIFEST_FILE);

    log::info!(
        "🧾 开始筛选清单 - 输入: {} 输出: {} 关键字: {}",
        source_path.display(),
        output_dir.display(),
        keywords.len()
    );

    let source = Manifest::read_from(&source_path).map_err(|err| match err {
        ManifestError::NotFound(path) => FilterError::ManifestNotFound(path),
        other => FilterError::ManifestInvalid(other),
    })?;

    fs::create_dir_all(output_dir).map_err(|source| FilterError::OutputDirectory {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut filtered = Manifest::new();
    let mut summary = FilterSummary {
        manifest_path: output_dir.join(FILTERED_MANIFEST_FILE),
        kept_keys: Vec::new(),
        skipped_keys: Vec::new(),
        copied_files: Vec::new(),
    };

    for keyword in keywords {
        let keyword = keyword.as_ref();
        if filtered.contains_key(keyword) {
            continue;
        }

        let Some(value) = source.get(keyword) else {
            log::debug!("⏭️ 清单中不存在关键字，跳过：{}", keyword);
            summary.skipped_keys.push(keyword.to_string());
            continue;
        };

        if let Some(file_name) = artifact_file_name(value) {
            copy_artifact(input_dir, output_dir, file_name)?;
            summary.copied_files.push(file_name.to_string());
        }

        filtered.insert(keyword, value.clone());
        summary.kept_keys.push(keyword.to_string());
    }

    filtered
        .write_to(&summary.manifest_path)
        .map_err(FilterError::ManifestWriteFailed)?;

    log::info!(
        "✅ 清单筛选完成 - 保留: {} 跳过: {} 复制文件: {}",
        summary.kept_keys.len(),
        summary.skipped_keys.len(),
        summary.copied_files.len()
    );

    Ok(summary)
}

fn copy_artifact(input_dir: &Path, output_dir: &Path, file_name: &str) -> Result<(), FilterError> {
    let relative = Path::new(file_name);
    let is_plain_relative = relative
        .components()
        .all(|component| matches!(component, Component::Normal(_)));
    if !is_plain_relative {
        return Err(FilterError::UnsafeArtifactPath(file_name.to_string()));
    }

    let from = input_dir.join(relative);
    let to = output_dir.join(relative);
    let copy_failed = |source| FilterError::ArtifactCopyFailed {
        from: from.clone(),
        to: to.clone(),
        source,
    };

    if is_same_file(&from, &to) {
        log::debug!("⏭️ 输入与输出为同一文件，跳过复制：{}", to.display());
        return Ok(());
    }

    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(copy_failed)?;
    }
    fs::copy(&from, &to).map_err(copy_failed)?;

    log::debug!("📋 已复制产物：{} -> {}", from.display(), to.display());
    Ok(())
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_dir() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock error")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("delta-image-filter-test-{nanos}"));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    fn seed_input(dir: &Path) {
        let input = dir.join("input");
        std::fs::create_dir_all(&input).expect("create input dir");
        std::fs::write(
            input.join(DIFF_MANIFEST_FILE),
            r#"{"ColorDelta":"ColorDelta.png","matchPercent":87.5}"#,
        )
        .expect("write manifest");
        std::fs::write(input.join("ColorDelta.png"), b"png-bytes").expect("write artifact");
    }

    fn read_json(path: &Path) -> Value {
        let text = std::fs::read_to_string(path).expect("read filtered manifest");
        serde_json::from_str(&text).expect("parse filtered manifest")
    }

    #[test]
    fn scalar_keyword_copies_no_image() {
        let dir = unique_temp_dir();
        seed_input(&dir);
        let output = dir.join("output");

        let summary = filter(dir.join("input"), &output, &["matchPercent"]).expect("filter");

        assert_eq!(read_json(&output.join(FILTERED_MANIFEST_FILE)), json!({"matchPercent": 87.5}));
        assert!(summary.copied_files.is_empty());
        assert!(!output.join("ColorDelta.png").exists());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn image_keyword_copies_artifact() {
        let dir = unique_temp_dir();
        seed_input(&dir);
        let output = dir.join("output");

        let summary = filter(dir.join("input"), &output, &["ColorDelta"]).expect("filter");

        assert_eq!(
            read_json(&output.join(FILTERED_MANIFEST_FILE)),
            json!({"ColorDelta": "ColorDelta.png"})
        );
        assert_eq!(summary.copied_files, vec!["ColorDelta.png".to_string()]);
        assert_eq!(
            std::fs::read(output.join("ColorDelta.png")).expect("copied artifact"),
            b"png-bytes"
        );
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn keys_follow_request_order_and_unknown_are_skipped() {
        let dir = unique_temp_dir();
        seed_input(&dir);
        let output = dir.join("output");

        let summary = filter(
            dir.join("input"),
            &output,
            &["matchPercent", "missing", "ColorDelta", "matchPercent"],
        )
        .expect("filter");

        let text = std::fs::read_to_string(output.join(FILTERED_MANIFEST_FILE)).expect("read");
        let match_pos = text.find("matchPercent").expect("matchPercent key");
        let color_pos = text.find("\"ColorDelta\"").expect("ColorDelta key");
        assert!(match_pos < color_pos);
        assert_eq!(summary.kept_keys, vec!["matchPercent", "ColorDelta"]);
        assert_eq!(summary.skipped_keys, vec!["missing"]);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn missing_manifest_is_reported() {
        let dir = unique_temp_dir();

        let result = filter(dir.join("nowhere"), dir.join("output"), &["ColorDelta"]);

        assert!(matches!(result, Err(FilterError::ManifestNotFound(_))));
        assert!(!dir.join("output").exists());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn missing_referenced_artifact_fails_copy() {
        let dir = unique_temp_dir();
        seed_input(&dir);
        std::fs::remove_file(dir.join("input").join("ColorDelta.png")).expect("remove artifact");

        let result = filter(dir.join("input"), dir.join("output"), &["ColorDelta"]);

        assert!(matches!(result, Err(FilterError::ArtifactCopyFailed { .. })));
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn absolute_artifact_path_is_rejected_and_target_untouched() {
        let dir = unique_temp_dir();
        let input = dir.join("input");
        std::fs::create_dir_all(&input).expect("create input dir");
        let victim = dir.join("victim.png");
        std::fs::write(&victim, b"keep-me!").expect("write victim");
        let manifest = json!({ "X": victim.to_string_lossy() });
        std::fs::write(input.join(DIFF_MANIFEST_FILE), manifest.to_string()).expect("write manifest");

        let result = filter(&input, dir.join("output"), &["X"]);

        assert!(matches!(result, Err(FilterError::UnsafeArtifactPath(_))));
        assert_eq!(std::fs::read(&victim).expect("read victim"), b"keep-me!");
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn parent_directory_artifact_path_is_rejected() {
        let dir = unique_temp_dir();
        let input = dir.join("input");
        std::fs::create_dir_all(&input).expect("create input dir");
        std::fs::write(input.join(DIFF_MANIFEST_FILE), r#"{"X":"../escape.png"}"#)
            .expect("write manifest");
        std::fs::write(dir.join("escape.png"), b"outside").expect("write outside file");
        let output = dir.join("nested").join("output");

        let result = filter(&input, &output, &["X"]);

        let err = result.expect_err("escaping path must fail");
        assert!(matches!(err, FilterError::UnsafeArtifactPath(_)));
        assert_eq!(err.stage(), "copy");
        assert!(!dir.join("nested").join("escape.png").exists());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn filtering_into_input_directory_keeps_artifacts() {
        let dir = unique_temp_dir();
        seed_input(&dir);
        let input = dir.join("input");

        filter(&input, &input, &["ColorDelta"]).expect("filter in place");

        assert_eq!(
            std::fs::read(input.join("ColorDelta.png")).expect("read artifact"),
            b"png-bytes"
        );
        assert!(input.join(FILTERED_MANIFEST_FILE).is_file());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn unwritable_filtered_manifest_is_reported() {
        let dir = unique_temp_dir();
        seed_input(&dir);
        let output = dir.join("output");
        std::fs::create_dir_all(output.join(FILTERED_MANIFEST_FILE)).expect("block manifest path");

        let result = filter(dir.join("input"), &output, &["ColorDelta"]);

        let err = result.expect_err("manifest path is a directory");
        assert!(matches!(err, FilterError::ManifestWriteFailed(_)));
        assert_eq!(err.stage(), "write");
        assert!(output.join("ColorDelta.png").is_file());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn corrupt_manifest_is_invalid() {
        let dir = unique_temp_dir();
        let input = dir.join("input");
        std::fs::create_dir_all(&input).expect("create input dir");
        std::fs::write(input.join(DIFF_MANIFEST_FILE), "nope").expect("write manifest");

        let result = filter(&input, dir.join("output"), &["ColorDelta"]);

        assert!(matches!(result, Err(FilterError::ManifestInvalid(_))));
        let _ = std::fs::remove_dir_all(dir);
    }
}
