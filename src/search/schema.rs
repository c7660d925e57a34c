//! Search schema - the bookmark shape the matcher evaluates against / 搜索 Schema
//!
//! The relational store and its records live outside this crate; callers
//! project whatever they fetched into [`BookmarkView`] before filtering
//! 关系存储在本 crate 之外，调用方先把记录投影为 BookmarkView

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Bookmark view - the fields the query language can filter on / 书签视图
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookmarkView {
    /// Bookmark identifier, echoed back in results / 书签标识
    pub id: String,
    /// Attached tag names / 标签名集合
    pub tags: HashSet<String>,
    /// Lists the bookmark belongs to / 所属列表集合
    pub list_ids: HashSet<String>,
    /// Creation instant / 创建时间
    pub created_at: DateTime<Utc>,
    /// Favourited flag / 收藏标记
    pub favourited: bool,
    /// Archived flag / 归档标记
    pub archived: bool,
}

impl BookmarkView {
    pub fn new(id: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            tags: HashSet::new(),
            list_ids: HashSet::new(),
            created_at,
            favourited: false,
            archived: false,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn with_list(mut self, list_id: impl Into<String>) -> Self {
        self.list_ids.insert(list_id.into());
        self
    }

    pub fn favourited(mut self, value: bool) -> Self {
        self.favourited = value;
        self
    }

    pub fn archived(mut self, value: bool) -> Self {
        self.archived = value;
        self
    }
}

/// Search request as received by the listing handler / 搜索请求
///
/// Pagination values are carried opaquely; the core never interprets them
/// 分页参数原样透传，核心不解释
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub cursor: Option<String>,
}

fn default_limit() -> usize {
    50
}
