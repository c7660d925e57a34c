//! Matcher lowering - translate the tree into backend filter dialects / 匹配树降低
//!
//! Two string targets driven by the same tree / 同一棵树驱动两种字符串目标：
//! - full-text index filter expression (`field = "value"` syntax with
//!   AND/OR and parentheses) / 全文索引过滤表达式
//! - SQLite WHERE fragment with `?` placeholders and bind values, for pushing
//!   filters into the relational store query / SQLite WHERE 片段与绑定值
//!
//! Both preserve the tree's precedence by parenthesizing combinator children,
//! and both resolve relative dates against the explicit `now`
//! 组合子节点加括号保持优先级，相对日期对显式 now 解析

use chrono::{DateTime, Utc};

use super::matcher::Matcher;

/// Compile to the full-text index filter dialect / 编译为全文索引过滤表达式
///
/// Dates are lowered to unix timestamps; `"` and `\` in leaf values are
/// escaped / 日期降为 unix 时间戳，叶值转义引号和反斜杠
pub fn compile_index_filter(matcher: &Matcher, now: DateTime<Utc>) -> String {
    match matcher {
        Matcher::TagName(name) => format!("tags = \"{}\"", escape_index_value(name)),
        Matcher::ListName(name) => format!("list_ids = \"{}\"", escape_index_value(name)),
        Matcher::DateAfter(bound) => format!("created_at > {}", bound.resolve(now).timestamp()),
        Matcher::DateBefore(bound) => format!("created_at < {}", bound.resolve(now).timestamp()),
        Matcher::Favourited(value) => format!("favourited = {}", value),
        Matcher::Archived(value) => format!("archived = {}", value),
        Matcher::And(children) => join_index_children(children, " AND ", now),
        Matcher::Or(children) => join_index_children(children, " OR ", now),
    }
}

fn join_index_children(children: &[Matcher], sep: &str, now: DateTime<Utc>) -> String {
    children
        .iter()
        .map(|child| {
            let compiled = compile_index_filter(child, now);
            match child {
                // 子组合节点加括号，保持规范分组
                Matcher::And(_) | Matcher::Or(_) => format!("({})", compiled),
                _ => compiled,
            }
        })
        .collect::<Vec<_>>()
        .join(sep)
}

fn escape_index_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Compile to a SQLite WHERE fragment with bind values / 编译为 SQLite WHERE 片段
///
/// Column layout assumed by the integration layer / 集成层约定的表结构：
/// - `bookmarks b` with `created_at` (unix timestamp), `favourited`, `archived`
/// - `bookmark_tags bt (bookmark_id, tag_name)`
/// - `bookmark_lists bl (bookmark_id, list_id)`
pub fn compile_sql_predicate(matcher: &Matcher, now: DateTime<Utc>) -> (String, Vec<String>) {
    let mut binds = Vec::new();
    let clause = sql_clause(matcher, now, &mut binds);
    (clause, binds)
}

fn sql_clause(matcher: &Matcher, now: DateTime<Utc>, binds: &mut Vec<String>) -> String {
    match matcher {
        Matcher::TagName(name) => {
            binds.push(name.clone());
            "EXISTS (SELECT 1 FROM bookmark_tags bt WHERE bt.bookmark_id = b.id AND LOWER(bt.tag_name) = LOWER(?))".to_string()
        }
        Matcher::ListName(name) => {
            binds.push(name.clone());
            "EXISTS (SELECT 1 FROM bookmark_lists bl WHERE bl.bookmark_id = b.id AND LOWER(bl.list_id) = LOWER(?))".to_string()
        }
        Matcher::DateAfter(bound) => {
            binds.push(bound.resolve(now).timestamp().to_string());
            "b.created_at > ?".to_string()
        }
        Matcher::DateBefore(bound) => {
            binds.push(bound.resolve(now).timestamp().to_string());
            "b.created_at < ?".to_string()
        }
        Matcher::Favourited(value) => {
            binds.push(if *value { "1" } else { "0" }.to_string());
            "b.favourited = ?".to_string()
        }
        Matcher::Archived(value) => {
            binds.push(if *value { "1" } else { "0" }.to_string());
            "b.archived = ?".to_string()
        }
        Matcher::And(children) => join_sql_children(children, " AND ", now, binds),
        Matcher::Or(children) => join_sql_children(children, " OR ", now, binds),
    }
}

fn join_sql_children(
    children: &[Matcher],
    sep: &str,
    now: DateTime<Utc>,
    binds: &mut Vec<String>,
) -> String {
    let parts: Vec<String> = children
        .iter()
        .map(|child| {
            let clause = sql_clause(child, now, binds);
            match child {
                Matcher::And(_) | Matcher::Or(_) => format!("({})", clause),
                _ => clause,
            }
        })
        .collect();
    parts.join(sep)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::parser::parse_search_query;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn matcher_of(query: &str) -> Matcher {
        parse_search_query(query).matcher.unwrap()
    }

    #[test]
    fn test_index_filter_leaves() {
        let now = utc(2024, 6, 10);
        assert_eq!(
            compile_index_filter(&matcher_of("tag:ai"), now),
            "tags = \"ai\""
        );
        assert_eq!(
            compile_index_filter(&matcher_of("is:fav"), now),
            "favourited = true"
        );
        assert_eq!(
            compile_index_filter(&matcher_of("is:archived"), now),
            "archived = true"
        );
    }

    #[test]
    fn test_index_filter_escapes_values() {
        let m = Matcher::TagName("say \"hi\" \\ bye".to_string());
        let now = utc(2024, 6, 10);
        assert_eq!(
            compile_index_filter(&m, now),
            "tags = \"say \\\"hi\\\" \\\\ bye\""
        );
    }

    #[test]
    fn test_index_filter_dates_resolve_against_now() {
        let now = utc(2024, 6, 10);
        let boundary = utc(2024, 6, 3).timestamp();
        assert_eq!(
            compile_index_filter(&matcher_of("after:<7d"), now),
            format!("created_at > {}", boundary)
        );
        assert_eq!(
            compile_index_filter(&matcher_of("before:2024-01-15"), now),
            format!("created_at < {}", utc(2024, 1, 15).timestamp())
        );
    }

    #[test]
    fn test_index_filter_preserves_grouping() {
        let now = utc(2024, 6, 10);
        let m = matcher_of("(tag:a or tag:b) and is:archived");
        assert_eq!(
            compile_index_filter(&m, now),
            "(tags = \"a\" OR tags = \"b\") AND archived = true"
        );
    }

    #[test]
    fn test_sql_predicate_leaves() {
        let now = utc(2024, 6, 10);
        let (clause, binds) = compile_sql_predicate(&matcher_of("tag:ai"), now);
        assert!(clause.contains("bookmark_tags"));
        assert!(clause.contains("LOWER(?)"));
        assert_eq!(binds, vec!["ai".to_string()]);

        let (clause, binds) = compile_sql_predicate(&matcher_of("is:fav"), now);
        assert_eq!(clause, "b.favourited = ?");
        assert_eq!(binds, vec!["1".to_string()]);
    }

    #[test]
    fn test_sql_predicate_bind_order_matches_placeholders() {
        let now = utc(2024, 6, 10);
        let m = matcher_of("(tag:a or tag:b) and after:<7d");
        let (clause, binds) = compile_sql_predicate(&m, now);

        // 占位符数量与绑定值数量一致，顺序从左到右
        assert_eq!(clause.matches('?').count(), binds.len());
        assert_eq!(
            binds,
            vec![
                "a".to_string(),
                "b".to_string(),
                utc(2024, 6, 3).timestamp().to_string(),
            ]
        );
        assert!(clause.starts_with('('));
        assert!(clause.contains(") AND b.created_at > ?"));
    }

    #[test]
    fn test_sql_predicate_injection_safe() {
        // 恶意值只出现在绑定列表里，不进 SQL 文本
        let now = utc(2024, 6, 10);
        let m = Matcher::TagName("'; DROP TABLE bookmarks; --".to_string());
        let (clause, binds) = compile_sql_predicate(&m, now);
        assert!(!clause.contains("DROP"));
        assert_eq!(binds, vec!["'; DROP TABLE bookmarks; --".to_string()]);
    }
}
