//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 按流水线阶段拆分错误枚举：加载校验（`LoadError`）、产物输出（`EmitError`），
//! 再由 `DiffError` 汇总整条链路（含源图归档）；配置问题单独归入 `ConfigError`。
//! 通过 `thiserror` 保持人类可读错误，同时让调用侧可按分支匹配。

use std::path::PathBuf;

/// 加载与校验阶段错误。
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// 文件缺失、内容损坏、非图片或格式不受支持。
    #[error("图片解码失败：{path}（{reason}）")]
    DecodeFailed { path: PathBuf, reason: String },

    /// 两张图片的宽、高或通道数不一致。
    #[error(
        "图片尺寸或通道数不一致：{first_width}x{first_height}x{first_channels} 对比 {second_width}x{second_height}x{second_channels}"
    )]
    DimensionMismatch {
        first_width: u32,
        first_height: u32,
        first_channels: u32,
        second_width: u32,
        second_height: u32,
        second_channels: u32,
    },

    /// 图片头声明的像素数超过配置上限。
    #[error("图片像素过大：{path}（{pixels} 像素，限制：{limit} 像素）")]
    ResourceLimit { path: PathBuf, pixels: u64, limit: u64 },
}

/// 产物输出阶段错误。
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("无法创建输出目录：{path}（{source}）")]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("图片编码失败：{name}（{reason}）")]
    EncodeFailed { name: String, reason: String },

    #[error("写入清单失败：{path}（{reason}）")]
    ManifestWriteFailed { path: PathBuf, reason: String },
}

/// 差异比对整条链路的错误。
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    #[error("{0}")]
    Load(#[from] LoadError),

    #[error("{0}")]
    Emit(#[from] EmitError),

    /// 源图归档（复制到 `sourceImages`）失败。
    #[error("源图归档失败：{path}（{source}）")]
    ArchiveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 配置读取与校验错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("读取配置文件失败：{path}（{source}）")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("解析配置文件失败：{path}（{source}）")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("配置无效：{0}")]
    Invalid(String),
}

impl DiffError {
    /// 稳定的错误码，供命令行输出与脚本判断。
    pub fn code(&self) -> &'static str {
        match self {
            Self::Load(LoadError::DecodeFailed { .. }) => "decode_failed",
            Self::Load(LoadError::DimensionMismatch { .. }) => "dimension_mismatch",
            Self::Load(LoadError::ResourceLimit { .. }) => "resource_limit",
            Self::Emit(EmitError::OutputDirectory { .. }) => "output_directory",
            Self::Emit(EmitError::EncodeFailed { .. }) => "encode_failed",
            Self::Emit(EmitError::ManifestWriteFailed { .. }) => "manifest_write_failed",
            Self::ArchiveFailed { .. } => "archive_failed",
        }
    }

    /// 出错所在的流水线阶段。
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Load(_) => "load",
            Self::Emit(_) => "emit",
            Self::ArchiveFailed { .. } => "archive",
        }
    }
}
