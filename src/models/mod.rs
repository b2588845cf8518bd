//! 数据模型模块
//! 权限目录、角色以及列表分页辅助类型

pub mod pagination;
pub mod permission;
pub mod role;
