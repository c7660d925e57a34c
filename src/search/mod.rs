//! Search query module - only provides query primitives, does not control flow / 搜索查询模块
//!
//! Architecture principles / 架构原则：
//! - This module only exposes primitive operations: tokenize, parse,
//!   evaluate, compile, explain, plan / 只暴露原语操作
//! - Request handlers control fetching, pagination and result merging
//!   上层控制取数、分页与结果合并
//! - Call direction: Core → Search (unidirectional) / 调用方向单向
//!
//! Query language features / 查询语言特性：
//! - free text plus `key:value` operators in one string / 自由文本与操作符混写
//! - `tag:` `list:` `is:` `before:` `after:` keys, `and` / `or` / parentheses
//! - relative date tokens (`<7d`, `>2m`) resolved at evaluation time / 相对日期求值时解析
//! - malformed operator values degrade to free text; only structural errors
//!   invalidate the matcher, never the search / 降级优先，永不硬失败

pub mod engine;
pub mod eval;
pub mod explain;
pub mod filter;
pub mod matcher;
pub mod parser;
pub mod reldate;
pub mod schema;
pub mod tokenizer;

pub use engine::{plan_query, FullTextIndex, IndexPage, IndexQuery, QueryPlan};
pub use eval::{filter_candidates, matches};
pub use explain::explain;
pub use filter::{compile_index_filter, compile_sql_predicate};
pub use matcher::{DateBound, Matcher};
pub use parser::{parse_search_query, ParseStatus, TextAndMatcher};
pub use reldate::{parse_relative_token, RelativeDate};
pub use schema::{BookmarkView, SearchRequest};

use tokenizer::RECOGNIZED_KEYS;

/// Query language capability declaration / 查询语言能力声明
///
/// Advertised to the UI so the tooltip can describe what the search box
/// understands / 提供给前端展示搜索框支持的语法
pub struct QueryCapability {
    pub supports_phrases: bool,
    pub supports_boolean_operators: bool,
    pub supports_relative_dates: bool,
    pub recognized_keys: &'static [&'static str],
    pub max_results: usize,
}

impl Default for QueryCapability {
    fn default() -> Self {
        Self {
            supports_phrases: true,
            supports_boolean_operators: true,
            supports_relative_dates: true,
            recognized_keys: RECOGNIZED_KEYS,
            max_results: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_full_pipeline_without_index() {
        // 解析 → 规划 → 进程内过滤的完整链路
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).unwrap();
        let candidates = vec![
            BookmarkView::new("recent-fav", Utc.with_ymd_and_hms(2024, 6, 8, 0, 0, 0).unwrap())
                .with_tag("ai")
                .favourited(true),
            BookmarkView::new("old-fav", Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
                .with_tag("ai")
                .favourited(true),
            BookmarkView::new("recent-plain", Utc.with_ymd_and_hms(2024, 6, 9, 0, 0, 0).unwrap())
                .with_tag("ai"),
        ];

        let parsed = parse_search_query("tag:ai is:fav after:<7d");
        assert_eq!(parsed.result, ParseStatus::Valid);

        let plan = plan_query(&SearchConfig::default(), &parsed, now);
        let QueryPlan::InProcess { matcher, .. } = plan else {
            panic!("expected in-process plan");
        };

        let hits = filter_candidates(matcher.as_ref(), &candidates, now);
        assert_eq!(hits.iter().map(|b| b.id.as_str()).collect::<Vec<_>>(), vec!["recent-fav"]);
    }

    #[test]
    fn test_capability_defaults() {
        let cap = QueryCapability::default();
        assert!(cap.recognized_keys.contains(&"tag"));
        assert!(cap.recognized_keys.contains(&"after"));
        assert!(cap.supports_relative_dates);
    }
}
