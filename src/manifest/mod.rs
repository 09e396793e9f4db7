//! # 清单模块（manifest）
//!
//! ## 设计思路
//!
//! 清单 `diff.json` 由比对输出阶段写出、由筛选工具读取，是两者之间的唯一契约。
//! 本模块集中维护契约常量、文档读写与筛选流程：
//!
//! - `document`：插入有序的清单文档与 4 空格缩进读写
//! - `filter`：按关键字投影清单并复制引用的图片产物
//! - `error`：清单读写与筛选流程的错误模型
//!
//! ```text
//! diff.json                      filtered.json
//! {                              {
//!     "ColorDelta": "...png", ─┐     "matchPercent": 87.5,
//!     "ColumnIndex": "...png",  └─▶   "ColorDelta": "ColorDelta.png"
//!     "matchPercent": 87.5,      }
//!     "averageDelta": 31.8       + ColorDelta.png（复制）
//! }
//! ```

mod document;
mod error;
mod filter;

pub use document::{Manifest, artifact_file_name};
pub use error::{FilterError, ManifestError};
pub use filter::{FilterSummary, filter};

/// 比对输出阶段写出的清单文件名。
pub const DIFF_MANIFEST_FILE: &str = "diff.json";
/// 筛选工具写出的精简清单文件名。
pub const FILTERED_MANIFEST_FILE: &str = "filtered.json";
/// 图片产物扩展名（无损 PNG）。
pub const ARTIFACT_EXTENSION: &str = "png";
/// 匹配百分比统计键。
pub const MATCH_PERCENT_KEY: &str = "matchPercent";
/// 平均差值统计键。
pub const AVERAGE_DELTA_KEY: &str = "averageDelta";
