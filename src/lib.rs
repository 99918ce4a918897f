//! ProctorDesk
//!
//! 监考端入驻：权限设置命令行入口

pub mod cli;
