//! # 差异比对模块（image_diff）
//!
//! ## 设计思路
//!
//! 该模块将“加载校验 → 逐像素比对 → 产物输出 → 源图归档”按职责拆分为多个子模块，
//! 避免单文件膨胀与耦合。
//!
//! - `buffer`：像素缓冲（所有阶段共用的数据载体）
//! - `loader`：解码两张源图并校验尺寸/通道一致
//! - `derivation`：可配置的派生产物（每个样本 → 一个输出字节）
//! - `comparator`：单次遍历计算差值、累计统计、驱动派生产物
//! - `emitter`：写出 PNG 与 `diff.json`
//! - `handler`：编排整条处理流水线
//! - `config/error/source`：配置、错误、中间数据模型
//!
//! ## 调用链
//!
//! ```text
//! main.rs / cli.rs（参数适配）
//!    ↓
//! handler.rs（配置快照 + 阶段耗时日志）
//!    ├─ loader.rs（签名探测 + 像素上限 + 解码 + 一致性校验）
//!    ├─ comparator.rs（差值 + 统计 + derivation.rs）
//!    ├─ emitter.rs（PNG + 清单）
//!    └─ archive_sources（复制源图到 sourceImages）
//!    ↓
//! 返回 DiffSummary / DiffError
//! ```
//!
//! ## 分层职责建议
//!
//! - 新增输出图优先改 `derivation.rs`，比对主循环无需变动
//! - 配置与策略变更优先改 `config.rs`
//! - 业务流程顺序变更优先改 `handler.rs`

mod buffer;
mod comparator;
mod config;
mod derivation;
mod emitter;
mod error;
mod handler;
mod loader;
mod source;

pub use buffer::ImageBuffer;
pub use config::DiffConfig;
pub use derivation::{Derivation, Sample};
pub use emitter::EmitSummary;
pub use error::{ConfigError, DiffError, EmitError, LoadError};
pub use handler::DiffHandler;
pub use source::{ComparisonResult, DiffSummary, LoadedSourcePair, NamedArtifact};
