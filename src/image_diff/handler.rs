//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `DiffHandler` 只负责流程编排与配置管理，处理链路固定为：
//! 1. 读取配置快照
//! 2. 加载并校验两张源图
//! 3. 逐纹素比对，生成派生图与统计
//! 4. 写出派生图与清单
//! 5. 将两张源图原样归档到 `sourceImages`
//!
//! ## 实现思路
//!
//! - 单次请求内使用“同一配置快照”，避免处理中途配置漂移。
//! - 各阶段返回所有权明确的数据，阶段之间没有共享可变状态。
//! - 记录 `load/compare/emit/archive/total` 阶段耗时，便于性能诊断。

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use super::source::DiffSummary;
use super::{ConfigError, DiffConfig, DiffError};

/// 差异比对处理器。
#[derive(Debug, Clone)]
pub struct DiffHandler {
    config: DiffConfig,
}

impl DiffHandler {
    /// 根据初始配置创建处理器，配置无效时直接拒绝。
    ///
    /// # 示例
    /// ```rust
    /// use delta_image::image_diff::{DiffConfig, DiffHandler};
    ///
    /// let handler = DiffHandler::new(DiffConfig::default())?;
    /// assert!(handler.config().strip_alpha);
    /// # Ok::<(), delta_image::image_diff::ConfigError>(())
    /// ```
    pub fn new(config: DiffConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    /// 替换配置，校验失败时保留原配置。
    pub fn set_config(&mut self, config: DiffConfig) -> Result<(), ConfigError> {
        config.validate()?;
        log::info!(
            "⚙️ 已更新比对配置（strip_alpha={}, derivations={:?}, max_decoded_pixels={}）",
            config.strip_alpha,
            config.derivations,
            config.max_decoded_pixels
        );
        self.config = config;
        Ok(())
    }

    /// 处理主入口：加载 → 比对 → 输出 → 归档源图。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use delta_image::image_diff::{DiffConfig, DiffHandler};
    ///
    /// let handler = DiffHandler::new(DiffConfig::default())?;
    /// let summary = handler.differentiate("out", "before.png", "after.png")?;
    /// println!("match: {:.2}%", summary.match_percent);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn differentiate(
        &self,
        output_dir: impl AsRef<Path>,
        first_image: impl AsRef<Path>,
        second_image: impl AsRef<Path>,
    ) -> Result<DiffSummary, DiffError> {
        let config = self.config.clone();
        let output_dir = output_dir.as_ref();
        let first_image = first_image.as_ref();
        let second_image = second_image.as_ref();
        let total_start = Instant::now();

        let load_start = Instant::now();
        let pair = Self::load_and_validate(first_image, second_image, &config)?;
        let load_elapsed = load_start.elapsed();

        let compare_start = Instant::now();
        let result = Self::compare(pair, &config);
        let compare_elapsed = compare_start.elapsed();

        let emit_start = Instant::now();
        let emitted = Self::emit(output_dir, &result)?;
        let emit_elapsed = emit_start.elapsed();

        let archive_start = Instant::now();
        let archive_dir = output_dir.join(&config.source_images_dir);
        Self::archive_sources(&archive_dir, &[first_image, second_image])?;
        let archive_elapsed = archive_start.elapsed();

        log::info!(
            "✅ 差异比对完成 - load={}ms compare={}ms emit={}ms archive={}ms total={}ms",
            load_elapsed.as_millis(),
            compare_elapsed.as_millis(),
            emit_elapsed.as_millis(),
            archive_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );

        Ok(DiffSummary {
            output_dir: output_dir.to_path_buf(),
            manifest_path: emitted.manifest_path,
            artifact_files: emitted.artifact_files,
            match_percent: emitted.match_percent,
            average_delta: emitted.average_delta,
            first_total_value: result.first_total_value,
            second_total_value: result.second_total_value,
            total_texel_delta: result.total_texel_delta,
        })
    }

    /// 将源图按原文件名复制到归档目录，同名文件直接覆盖。
    pub(crate) fn archive_sources(archive_dir: &Path, sources: &[&Path]) -> Result<Vec<PathBuf>, DiffError> {
        fs::create_dir_all(archive_dir).map_err(|source| DiffError::ArchiveFailed {
            path: archive_dir.to_path_buf(),
            source,
        })?;

        let mut archived: Vec<PathBuf> = Vec::with_capacity(sources.len());
        for source_path in sources {
            let file_name = source_path.file_name().ok_or_else(|| DiffError::ArchiveFailed {
                path: source_path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "源图路径没有文件名"),
            })?;

            let target = archive_dir.join(file_name);
            if archived.contains(&target) {
                log::warn!(
                    "⚠️ 两张源图文件名相同，归档时后者覆盖前者：{}",
                    target.display()
                );
            }

            // 源图本身就在归档目录中时，复制到自身会把文件截断为空
            if Self::is_same_file(source_path, &target) {
                log::info!("⏭️ 源图已位于归档目录，跳过复制：{}", target.display());
                archived.push(target);
                continue;
            }

            fs::copy(source_path, &target).map_err(|source| DiffError::ArchiveFailed {
                path: source_path.to_path_buf(),
                source,
            })?;

            log::debug!("📦 已归档源图：{} -> {}", source_path.display(), target.display());
            archived.push(target);
        }

        Ok(archived)
    }

    fn is_same_file(a: &Path, b: &Path) -> bool {
        match (fs::canonicalize(a), fs::canonicalize(b)) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}
