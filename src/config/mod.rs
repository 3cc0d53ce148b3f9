//! 配置管理
//!
//! 配置按 `config.toml` → `config.{APP_ENV}.toml` → `THESIS_*` 环境变量 的顺序叠加。

mod r#impl;
mod structs;

pub use structs::*;
