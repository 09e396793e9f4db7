//! # 派生产物模块
//!
//! ## 设计思路
//!
//! 比对循环每访问一个（纹素, 通道）样本，就依次调用配置中的派生函数，
//! 每个派生函数产出一张同尺寸的输出图。新增产物只需增加一个枚举分支，
//! 不必改动比对主循环。
//!
//! ## 实现思路
//!
//! - `Sample` 汇集单个样本的全部输入：两侧通道值、差值与位置。
//! - `Derivation` 为带标签的枚举，`artifact_name` 即输出文件名与清单键。
//! - `derive` 是纯函数：相同样本永远得到相同字节。

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// 比对循环中的单个通道样本。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    /// 第一张图该通道的值。
    pub first: u8,
    /// 第二张图该通道的值。
    pub second: u8,
    /// 纹素线性下标（`y * width + x`）。
    pub texel_index: usize,
    /// 通道下标（已剔除 alpha 时不会出现 3）。
    pub channel: usize,
    /// 图像宽度（像素）。
    pub width: u32,
}

impl Sample {
    /// 无符号绝对差值，通过 max − min 计算，避免 8 位溢出。
    #[inline]
    pub fn delta(&self) -> u8 {
        self.first.max(self.second) - self.first.min(self.second)
    }
}

/// 可配置的派生产物。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Derivation {
    /// 相似度可视化：`255 - delta`，相同为白、最大差异为黑。
    ColorDelta,
    /// 纹素所在列（`texel_index % width`），按字节截断。
    ColumnIndex,
    /// 原始差值 `delta`。
    AbsoluteDelta,
    /// 差异掩码：有差异为 255，否则为 0。
    DiffMask,
}

impl Derivation {
    pub const ALL: [Derivation; 4] = [
        Derivation::ColorDelta,
        Derivation::ColumnIndex,
        Derivation::AbsoluteDelta,
        Derivation::DiffMask,
    ];

    /// 产物名：同时作为输出文件名主干与清单键。
    pub fn artifact_name(self) -> &'static str {
        match self {
            Self::ColorDelta => "ColorDelta",
            Self::ColumnIndex => "ColumnIndex",
            Self::AbsoluteDelta => "AbsoluteDelta",
            Self::DiffMask => "DiffMask",
        }
    }

    /// 按产物名解析（大小写不敏感）。
    ///
    /// # 示例
    /// ```rust
    /// use delta_image::image_diff::Derivation;
    ///
    /// assert_eq!(Derivation::parse("colordelta").unwrap(), Derivation::ColorDelta);
    /// assert!(Derivation::parse("unknown").is_err());
    /// ```
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        let trimmed = name.trim();
        Self::ALL
            .into_iter()
            .find(|d| d.artifact_name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "未知派生产物：{}（可选：{}）",
                    trimmed,
                    Self::ALL.map(Self::artifact_name).join(" / ")
                ))
            })
    }

    /// 计算该样本在输出图中的字节。
    #[inline]
    pub fn derive(self, sample: &Sample) -> u8 {
        match self {
            Self::ColorDelta => 255 - sample.delta(),
            Self::ColumnIndex => (sample.texel_index % sample.width as usize) as u8,
            Self::AbsoluteDelta => sample.delta(),
            Self::DiffMask => {
                if sample.delta() > 0 {
                    255
                } else {
                    0
                }
            }
        }
    }
}
