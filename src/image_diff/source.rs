//! # 中间数据模型
//!
//! ## 设计思路
//!
//! 将流水线各阶段的交接数据显式建模：
//! - `LoadedSourcePair` 表示已解码、已校验的两张源图
//! - `ComparisonResult` 表示比对阶段产出的派生图与累计统计
//! - `DiffSummary` 表示整条链路完成后的汇总信息

use std::path::PathBuf;

use super::ImageBuffer;

/// 加载阶段输出：尺寸与通道数已一致的两张源图。
#[derive(Debug, Clone)]
pub struct LoadedSourcePair {
    pub first: ImageBuffer,
    pub second: ImageBuffer,
    pub width: u32,
    pub height: u32,
    pub channel_count: u32,
}

/// 单个具名派生图。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedArtifact {
    pub name: String,
    pub image: ImageBuffer,
}

/// 比对阶段输出。
///
/// `artifacts` 按派生产物配置顺序排列，名称唯一。
#[derive(Debug, Clone, Default)]
pub struct ComparisonResult {
    pub artifacts: Vec<NamedArtifact>,
    pub first_total_value: u64,
    pub second_total_value: u64,
    pub total_texel_delta: u64,
    /// `width * height * compared_channel_count`。
    pub texel_channel_count: u64,
}

impl ComparisonResult {
    /// 按名称查找派生图。
    pub fn artifact(&self, name: &str) -> Option<&ImageBuffer> {
        self.artifacts
            .iter()
            .find(|artifact| artifact.name == name)
            .map(|artifact| &artifact.image)
    }

    /// 归一化总差值（0.0 ~ 1.0）。
    pub fn total_delta_norm(&self) -> f64 {
        if self.texel_channel_count == 0 {
            return 0.0;
        }
        self.total_texel_delta as f64 / (255.0 * self.texel_channel_count as f64)
    }

    /// 匹配百分比（0.0 ~ 100.0）。
    pub fn match_percent(&self) -> f64 {
        (1.0 - self.total_delta_norm()) * 100.0
    }

    /// 每个通道样本的平均差值（0.0 ~ 255.0）。
    pub fn average_delta(&self) -> f64 {
        if self.texel_channel_count == 0 {
            return 0.0;
        }
        self.total_texel_delta as f64 / self.texel_channel_count as f64
    }
}

/// 整条链路完成后的汇总信息。
#[derive(Debug, Clone, PartialEq)]
pub struct DiffSummary {
    pub output_dir: PathBuf,
    pub manifest_path: PathBuf,
    /// 已写出的产物文件名（相对输出目录）。
    pub artifact_files: Vec<String>,
    pub match_percent: f64,
    pub average_delta: f64,
    pub first_total_value: u64,
    pub second_total_value: u64,
    pub total_texel_delta: u64,
}
