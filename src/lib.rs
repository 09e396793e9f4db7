//! # 图片差异比对工具 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 命令行 (clap, main.rs)                    │
//! │                                                          │
//! │   diff <out> <first> <second>    filter <in> <out> <k..> │
//! └───────┬──────────────────────────────────┬───────────────┘
//!         ↓ Result<(), AppError>             ↓
//! ┌───────┼──────────────────────────────────┼───────────────┐
//! │       ↓            库 (Rust)             ↓               │
//! │                                                          │
//! │  ┌─ error ────── AppError (统一错误类型)                  │
//! │  │                                                       │
//! │  ├─ image_diff ─ 加载 · 比对 · 输出 PNG · 归档源图        │
//! │  │   ├─ derivation     可配置的派生产物                   │
//! │  │   └─ emitter        PNG + diff.json                    │
//! │  │                                                       │
//! │  └─ manifest ─── 清单读写 + 关键字筛选 (filtered.json)    │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`cli`] | 命令行参数定义、配置合并、执行与结果输出 |
//! | [`error`] | 统一错误类型 `AppError`，命令行入口的唯一错误类型 |
//! | [`image_diff`] | 两张图片的逐纹素比对与产物输出 |
//! | [`manifest`] | `diff.json` 读写，按关键字筛选并复制引用的图片 |

pub mod cli;
pub mod error;
pub mod image_diff;
pub mod manifest;
