//! RBAC 管理后台库
//! 权限目录、角色生命周期以及对应的 HTTP 管理接口

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
pub mod telemetry;
