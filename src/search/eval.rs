//! In-process matcher evaluation / 进程内匹配求值
//!
//! Pure function of (tree, record, now): no I/O, no shared state, safe to
//! call from any number of request tasks / (树, 记录, now) 的纯函数
//!
//! Tag and list comparison is case-insensitive exact match, not substring -
//! a deliberate simplicity/latency trade-off / 标签和列表忽略大小写精确匹配

use chrono::{DateTime, Utc};

use super::matcher::Matcher;
use super::schema::BookmarkView;
use super::tokenizer::normalize_term;

/// Evaluate a matcher tree against one bookmark / 对单个书签求值匹配树
///
/// Never panics on a well-formed tree (guaranteed by construction from the
/// parser); `And`/`Or` short-circuit left-to-right / 对良构树永不 panic
pub fn matches(matcher: &Matcher, bookmark: &BookmarkView, now: DateTime<Utc>) -> bool {
    match matcher {
        Matcher::TagName(name) => {
            let needle = normalize_term(name);
            bookmark.tags.iter().any(|t| normalize_term(t) == needle)
        }
        Matcher::ListName(name) => {
            let needle = normalize_term(name);
            bookmark.list_ids.iter().any(|l| normalize_term(l) == needle)
        }
        // 严格不等：边界时刻本身不匹配
        Matcher::DateAfter(bound) => bookmark.created_at > bound.resolve(now),
        Matcher::DateBefore(bound) => bookmark.created_at < bound.resolve(now),
        Matcher::Favourited(value) => bookmark.favourited == *value,
        Matcher::Archived(value) => bookmark.archived == *value,
        Matcher::And(children) => children.iter().all(|c| matches(c, bookmark, now)),
        Matcher::Or(children) => children.iter().any(|c| matches(c, bookmark, now)),
    }
}

/// Filter fetched candidates in-process / 进程内过滤候选集
///
/// The fallback path when no full-text index is configured: the caller
/// fetches candidates from the store and filters them here
/// 未配置全文索引时的回退路径
pub fn filter_candidates<'a>(
    matcher: Option<&Matcher>,
    candidates: &'a [BookmarkView],
    now: DateTime<Utc>,
) -> Vec<&'a BookmarkView> {
    match matcher {
        Some(tree) => candidates.iter().filter(|b| matches(tree, b, now)).collect(),
        // 没有匹配树就匹配一切
        None => candidates.iter().collect(),
    }
}
