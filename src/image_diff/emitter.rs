//! # 产物输出模块
//!
//! ## 设计思路
//!
//! 将比对结果落盘：每张派生图写成 `<name>.png`，再写出描述产物与统计值的清单。
//! 清单只在所有图片都成功写出后才写入，避免清单引用不存在的文件。
//!
//! ## 实现思路
//!
//! 1. 创建输出目录（已存在不算错误）
//! 2. 按派生顺序逐张编码 PNG，保留各自的尺寸与通道数，任一失败立即中止
//! 3. 计算 `matchPercent` / `averageDelta`
//! 4. 写出 `diff.json`
//!
//! 中止时已经写出的图片保留在磁盘上，不做回滚。

use std::fs;
use std::path::{Path, PathBuf};

use image::{ColorType, ImageFormat};

use super::source::ComparisonResult;
use super::{DiffHandler, EmitError, ImageBuffer};
use crate::manifest::{
    ARTIFACT_EXTENSION, AVERAGE_DELTA_KEY, DIFF_MANIFEST_FILE, MATCH_PERCENT_KEY, Manifest,
};

/// 输出阶段汇总。
#[derive(Debug, Clone, PartialEq)]
pub struct EmitSummary {
    pub manifest_path: PathBuf,
    pub artifact_files: Vec<String>,
    pub match_percent: f64,
    pub average_delta: f64,
}

impl DiffHandler {
    /// 写出全部派生图与清单。
    pub fn emit(output_dir: impl AsRef<Path>, result: &ComparisonResult) -> Result<EmitSummary, EmitError> {
        let output_dir = output_dir.as_ref();
        fs::create_dir_all(output_dir).map_err(|source| EmitError::OutputDirectory {
            path: output_dir.to_path_buf(),
            source,
        })?;

        let mut manifest = Manifest::new();
        let mut artifact_files = Vec::with_capacity(result.artifacts.len());

        for artifact in &result.artifacts {
            let file_name = format!("{}.{}", artifact.name, ARTIFACT_EXTENSION);
            Self::encode_png(&output_dir.join(&file_name), &artifact.name, &artifact.image)?;

            log::info!(
                "🖼️ 已写出产物 - {} ({}x{}x{})",
                file_name,
                artifact.image.width(),
                artifact.image.height(),
                artifact.image.channel_count()
            );

            manifest.insert(artifact.name.clone(), file_name.clone());
            artifact_files.push(file_name);
        }

        let match_percent = result.match_percent();
        let average_delta = result.average_delta();
        manifest.insert(MATCH_PERCENT_KEY, match_percent);
        manifest.insert(AVERAGE_DELTA_KEY, average_delta);

        let manifest_path = output_dir.join(DIFF_MANIFEST_FILE);
        manifest
            .write_to(&manifest_path)
            .map_err(|e| EmitError::ManifestWriteFailed {
                path: manifest_path.clone(),
                reason: e.to_string(),
            })?;

        log::info!(
            "📝 已写出清单 - {} matchPercent={:.4} averageDelta={:.4}",
            manifest_path.display(),
            match_percent,
            average_delta
        );

        Ok(EmitSummary {
            manifest_path,
            artifact_files,
            match_percent,
            average_delta,
        })
    }

    /// 按缓冲自身的通道数编码为无损 PNG。
    pub(crate) fn encode_png(path: &Path, name: &str, image: &ImageBuffer) -> Result<(), EmitError> {
        let color = match image.channel_count() {
            1 => ColorType::L8,
            2 => ColorType::La8,
            3 => ColorType::Rgb8,
            4 => ColorType::Rgba8,
            other => {
                return Err(EmitError::EncodeFailed {
                    name: name.to_string(),
                    reason: format!("不支持的通道数：{}", other),
                });
            }
        };

        image::save_buffer_with_format(
            path,
            image.data(),
            image.width(),
            image.height(),
            color,
            ImageFormat::Png,
        )
        .map_err(|e| EmitError::EncodeFailed {
            name: name.to_string(),
            reason: e.to_string(),
        })
    }
}
