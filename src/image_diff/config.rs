//! # 配置模块
//!
//! ## 设计思路
//!
//! 将所有“可调策略”集中到 `DiffConfig`：是否剔除 alpha、输出哪些派生产物、
//! 解码像素上限以及源图归档目录名。保证行为可观测、可调整、可测试。
//! 清单文件名是与筛选工具之间的契约，不开放配置。
//!
//! ## 实现思路
//!
//! - `Default` 提供与命令行默认行为一致的配置。
//! - `load_from_path` 从 JSON 文件读取，缺省字段回退默认值（`#[serde(default)]`）。
//! - `validate` 在进入流水线前拒绝无效组合，尽早失败。

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ConfigError, Derivation};

/// 差异比对配置。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// 四通道输入时是否剔除 alpha（剔除后 alpha 不参与统计，也不出现在输出图中）。
    pub strip_alpha: bool,
    /// 派生产物列表，按顺序生成并写入清单。
    pub derivations: Vec<Derivation>,
    /// 单张图片允许的最大像素数（`width * height`），在完整解码前检查。
    pub max_decoded_pixels: u64,
    /// 源图归档子目录名。
    pub source_images_dir: String,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            strip_alpha: true,
            derivations: vec![Derivation::ColorDelta, Derivation::ColumnIndex],
            max_decoded_pixels: 100_000_000,
            source_images_dir: "sourceImages".to_string(),
        }
    }
}

impl DiffConfig {
    /// 从 JSON 文件加载配置。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use delta_image::image_diff::DiffConfig;
    ///
    /// let config = DiffConfig::load_from_path("delta-image.json")?;
    /// # Ok::<(), delta_image::image_diff::ConfigError>(())
    /// ```
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// 校验配置组合是否可用。
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.derivations.is_empty() {
            return Err(ConfigError::Invalid("derivations 不能为空".to_string()));
        }
        if self.max_decoded_pixels == 0 {
            return Err(ConfigError::Invalid("max_decoded_pixels 必须大于 0".to_string()));
        }

        Self::validate_plain_name("source_images_dir", &self.source_images_dir)?;

        Ok(())
    }

    /// 去重后的派生产物列表（保留首次出现的顺序）。
    pub(crate) fn unique_derivations(&self) -> Vec<Derivation> {
        let mut unique = Vec::with_capacity(self.derivations.len());
        for derivation in &self.derivations {
            if unique.contains(derivation) {
                log::debug!("🔁 忽略重复的派生产物：{}", derivation.artifact_name());
                continue;
            }
            unique.push(*derivation);
        }
        unique
    }

    /// 目录名只能是单段名称，不能跳出输出目录。
    fn validate_plain_name(field: &str, value: &str) -> Result<(), ConfigError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::Invalid(format!("{} 不能为空", field)));
        }
        if trimmed.contains(['/', '\\']) || trimmed == "." || trimmed == ".." {
            return Err(ConfigError::Invalid(format!(
                "{} 必须是单段名称：{}",
                field, value
            )));
        }
        Ok(())
    }
}
