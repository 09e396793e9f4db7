//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义全局统一的 `AppError` 枚举，汇总比对、筛选与配置三条链路的错误，
//! 命令行入口只需处理这一种类型。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为各模块错误提供 `From` 转换，调用侧直接使用 `?`。
//! - `code()` / `stage()` 给出稳定标签，便于脚本判断失败阶段。

use crate::image_diff::{ConfigError, DiffError};
use crate::manifest::FilterError;

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 差异比对流水线错误（加载 / 输出 / 归档）
    #[error("差异比对失败（阶段：{stage}）：{0}", stage = .0.stage())]
    Diff(#[from] DiffError),

    /// 清单筛选错误
    #[error("清单筛选失败（阶段：{stage}）：{0}", stage = .0.stage())]
    Filter(#[from] FilterError),

    /// 配置读取或校验失败
    #[error("配置错误：{0}")]
    Config(#[from] ConfigError),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Diff(err) => err.code(),
            Self::Filter(err) => err.code(),
            Self::Config(_) => "config_invalid",
        }
    }

    pub fn stage(&self) -> &'static str {
        match self {
            Self::Diff(err) => err.stage(),
            Self::Filter(err) => err.stage(),
            Self::Config(_) => "config",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn message_names_failing_stage() {
        let err = AppError::from(FilterError::ManifestNotFound(PathBuf::from("out/diff.json")));

        assert_eq!(err.stage(), "read");
        assert_eq!(err.code(), "manifest_not_found");
        assert!(err.to_string().contains("阶段：read"));
        assert!(err.to_string().contains("out/diff.json"));
    }

    #[test]
    fn config_errors_keep_their_message() {
        let err = AppError::from(ConfigError::Invalid("derivations 不能为空".to_string()));

        assert_eq!(err.stage(), "config");
        assert!(err.to_string().contains("derivations"));
    }
}
