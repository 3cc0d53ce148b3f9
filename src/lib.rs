//! Thesis System - 毕业课题管理后端服务
//!
//! 基于 Actix Web 构建的毕业课题（提出、指导、提交、评审）生命周期管理后端。
//!
//! # 架构
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `files`: 提交文件存储
//! - `middlewares`: 身份识别与角色校验中间件
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层（权限判定与课题状态机）
//! - `storage`: 数据存储层（SeaORM / 内存）
//! - `utils`: 工具函数

pub mod config;
pub mod entity;
pub mod errors;
pub mod files;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
