//! Search configuration module / 搜索配置模块
//!
//! Configuration for the bookmark search subsystem, loaded and persisted by
//! the embedding application. The core never reads files or globals itself;
//! callers pass the config down / 配置由上层应用加载并传入，核心不读全局状态

use serde::{Deserialize, Serialize};

/// Search configuration / 搜索配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Whether search is enabled / 是否启用搜索
    pub enabled: bool,
    /// Default page size for search results / 默认搜索结果页大小
    pub default_limit: usize,
    /// Full-text index configuration / 全文索引配置
    pub index: IndexConfig,
}

/// Full-text index configuration / 全文索引配置
///
/// When disabled, structured filters are evaluated in-process over candidates
/// fetched from the relational store / 未启用时结构化过滤在进程内求值
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Whether a full-text index backend is configured / 是否配置了全文索引后端
    pub enabled: bool,
    /// Index service address (interpreted by the integration layer) / 索引服务地址
    pub endpoint: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_limit: 50,
            index: IndexConfig::default(),
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: String::new(),
        }
    }
}
