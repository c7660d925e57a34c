//! Query planning - decide where a parsed query gets answered / 查询规划
//!
//! The full-text index is a black box behind [`FullTextIndex`]: it accepts
//! residual text plus a compiled filter string and returns ranked document
//! ids with a pagination cursor. When no index is configured the plan falls
//! back to in-process evaluation over candidates the caller fetched from the
//! store / 全文索引是黑盒；未配置时回退为进程内求值
//!
//! Planning is a primitive: callers control fetching, pagination and merging
//! 规划只是原语，取数、分页、合并由调用方控制

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::SearchConfig;

use super::filter::compile_index_filter;
use super::matcher::Matcher;
use super::parser::TextAndMatcher;

/// Payload handed to a full-text index backend / 交给全文索引后端的载荷
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexQuery {
    /// Residual free text, `None` when the query had none / 剩余自由文本
    pub text: Option<String>,
    /// Compiled filter expression, `None` when there were no structured
    /// operators / 编译后的过滤表达式
    pub filter: Option<String>,
}

/// One page of index results / 索引结果的一页
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexPage {
    /// Ranked bookmark ids / 按相关性排序的书签 id
    pub ids: Vec<String>,
    /// Opaque cursor for the next page / 下一页的不透明游标
    pub next_cursor: Option<String>,
}

/// Pluggable full-text index backend / 可插拔的全文索引后端
///
/// Implemented by the integration layer; ranking and the wire protocol are
/// entirely its concern / 由集成层实现，排序与传输协议归它管
pub trait FullTextIndex {
    fn search(
        &self,
        query: &IndexQuery,
        limit: usize,
        cursor: Option<&str>,
    ) -> Result<IndexPage, String>;
}

/// Where the query gets answered / 查询在哪里得到回答
#[derive(Debug, Clone, PartialEq)]
pub enum QueryPlan {
    /// Forward to the configured full-text index / 转发给已配置的全文索引
    Index(IndexQuery),
    /// Evaluate in-process over fetched candidates / 在取回的候选集上进程内求值
    InProcess {
        text: Option<String>,
        matcher: Option<Matcher>,
    },
}

/// Plan a parsed query against the current configuration / 根据配置规划查询
///
/// An invalid parse already carries `matcher == None` and the raw input as
/// text, so both plans degrade to plain free-text search on their own
/// 无效解析自带纯文本回退，两种计划都能正常降级
pub fn plan_query(
    config: &SearchConfig,
    parsed: &TextAndMatcher,
    now: DateTime<Utc>,
) -> QueryPlan {
    let text = (!parsed.text.is_empty()).then(|| parsed.text.clone());

    if config.index.enabled {
        let filter = parsed.matcher.as_ref().map(|m| compile_index_filter(m, now));
        tracing::debug!("query planned for full-text index backend");
        QueryPlan::Index(IndexQuery { text, filter })
    } else {
        tracing::debug!("no index configured, evaluating in-process");
        QueryPlan::InProcess {
            text,
            matcher: parsed.matcher.clone(),
        }
    }
}
