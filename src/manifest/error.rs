//! # 清单错误模型
//!
//! `ManifestError` 描述清单文档本身的读写问题；
//! `FilterError` 描述筛选工具整条流程的失败分支。

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("清单文件不存在：{0}")]
    NotFound(PathBuf),

    #[error("读取清单失败：{path}（{source}）")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("解析清单失败：{path}（{source}）")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("清单根节点不是 JSON 对象：{0}")]
    NotAnObject(PathBuf),

    #[error("序列化清单失败：{0}")]
    Serialize(#[source] serde_json::Error),

    #[error("写入清单失败：{path}（{source}）")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 清单筛选错误。
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    /// 输入目录下没有 `diff.json`。
    #[error("未在指定目录找到清单：{0}")]
    ManifestNotFound(PathBuf),

    /// 清单存在但无法读取或解析。
    #[error("{0}")]
    ManifestInvalid(#[source] ManifestError),

    #[error("无法创建输出目录：{path}（{source}）")]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 清单中的产物文件名是绝对路径或含 `..`。
    #[error("产物文件名不是安全的相对路径：{0}")]
    UnsafeArtifactPath(String),

    #[error("复制产物失败：{from} -> {to}（{source}）")]
    ArtifactCopyFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    ManifestWriteFailed(#[source] ManifestError),
}

impl FilterError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::ManifestNotFound(_) => "manifest_not_found",
            Self::ManifestInvalid(_) => "manifest_invalid",
            Self::OutputDirectory { .. } => "output_directory",
            Self::UnsafeArtifactPath(_) => "unsafe_artifact_path",
            Self::ArtifactCopyFailed { .. } => "artifact_copy_failed",
            Self::ManifestWriteFailed(_) => "manifest_write_failed",
        }
    }

    pub fn stage(&self) -> &'static str {
        match self {
            Self::ManifestNotFound(_) | Self::ManifestInvalid(_) => "read",
            Self::OutputDirectory { .. }
            | Self::UnsafeArtifactPath(_)
            | Self::ArtifactCopyFailed { .. } => "copy",
            Self::ManifestWriteFailed(_) => "write",
        }
    }
}
