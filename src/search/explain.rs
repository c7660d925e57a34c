//! Query explainer - renders the parsed structure back to the user / 查询解释器
//!
//! Backs the UI tooltip that shows how a query was understood. Walks the
//! matcher tree with exhaustive matching: a new leaf kind fails to compile
//! here until it gets a rendering / 穷举匹配，新叶类型必须在此补充渲染

use super::matcher::{DateBound, Matcher};
use super::parser::{ParseStatus, TextAndMatcher};
use super::reldate::{DateUnit, RelativeDate};

/// Render a human-readable explanation of a parse result / 渲染可读的解析说明
pub fn explain(parsed: &TextAndMatcher) -> String {
    if parsed.result == ParseStatus::Invalid {
        return format!(
            "query could not be parsed, searching as plain text: \"{}\"",
            parsed.text
        );
    }

    let mut clauses = Vec::new();
    if !parsed.text.is_empty() {
        clauses.push(format!("contains \"{}\"", parsed.text));
    }
    if let Some(matcher) = &parsed.matcher {
        // 顶层 Or 与文本子句并列时加括号
        let rendered = describe(matcher);
        if clauses.is_empty() {
            clauses.push(rendered);
        } else if matches!(matcher, Matcher::Or(_)) {
            clauses.push(format!("({})", rendered));
        } else {
            clauses.push(rendered);
        }
    }

    if clauses.is_empty() {
        return "all bookmarks".to_string();
    }
    clauses.join(" and ")
}

/// 渲染匹配树节点
fn describe(matcher: &Matcher) -> String {
    match matcher {
        Matcher::TagName(name) => format!("has tag \"{}\"", name),
        Matcher::ListName(name) => format!("in list \"{}\"", name),
        Matcher::DateAfter(bound) => format!("created after {}", describe_bound(bound)),
        Matcher::DateBefore(bound) => format!("created before {}", describe_bound(bound)),
        Matcher::Favourited(true) => "is favourited".to_string(),
        Matcher::Favourited(false) => "is not favourited".to_string(),
        Matcher::Archived(true) => "is archived".to_string(),
        Matcher::Archived(false) => "is not archived".to_string(),
        Matcher::And(children) => join_children(children, " and "),
        Matcher::Or(children) => join_children(children, " or "),
    }
}

fn join_children(children: &[Matcher], sep: &str) -> String {
    children
        .iter()
        .map(|child| match child {
            Matcher::And(_) | Matcher::Or(_) => format!("({})", describe(child)),
            _ => describe(child),
        })
        .collect::<Vec<_>>()
        .join(sep)
}

fn describe_bound(bound: &DateBound) -> String {
    match bound {
        DateBound::Absolute(instant) => instant.format("%Y-%m-%d").to_string(),
        DateBound::Relative(rd) => describe_relative(rd),
    }
}

fn describe_relative(rd: &RelativeDate) -> String {
    let unit = match rd.unit {
        DateUnit::Day => "day",
        DateUnit::Week => "week",
        DateUnit::Month => "month",
        DateUnit::Year => "year",
    };
    if rd.amount == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", rd.amount, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::parser::parse_search_query;

    #[test]
    fn test_explain_text_and_matcher() {
        let parsed = parse_search_query("machine learning tag:ai is:fav");
        assert_eq!(
            explain(&parsed),
            "contains \"machine learning\" and has tag \"ai\" and is favourited"
        );
    }

    #[test]
    fn test_explain_grouping() {
        let parsed = parse_search_query("(tag:a or tag:b) and is:archived");
        assert_eq!(
            explain(&parsed),
            "(has tag \"a\" or has tag \"b\") and is archived"
        );
    }

    #[test]
    fn test_explain_top_level_or_with_text() {
        let parsed = parse_search_query("rust tag:a or tag:b");
        assert_eq!(
            explain(&parsed),
            "contains \"rust\" and (has tag \"a\" or has tag \"b\")"
        );
    }

    #[test]
    fn test_explain_dates() {
        let parsed = parse_search_query("after:<7d before:2024-06-01");
        assert_eq!(
            explain(&parsed),
            "created after 7 days ago and created before 2024-06-01"
        );

        let parsed = parse_search_query("after:>1m");
        assert_eq!(explain(&parsed), "created after 1 month ago");
    }

    #[test]
    fn test_explain_empty_query() {
        let parsed = parse_search_query("");
        assert_eq!(explain(&parsed), "all bookmarks");
    }

    #[test]
    fn test_explain_invalid_query() {
        let parsed = parse_search_query("foo and");
        assert_eq!(
            explain(&parsed),
            "query could not be parsed, searching as plain text: \"foo and\""
        );
    }
}
