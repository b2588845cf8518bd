//! HTTP 处理器模块

pub mod error;
pub mod health;
pub mod permission;
pub mod role;
