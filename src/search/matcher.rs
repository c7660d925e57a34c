//! Matcher tree - the structured half of a parsed query / 匹配树
//!
//! A closed tagged union of exact-match and range filters. Every consumer
//! (evaluator, filter compiler, explainer) matches exhaustively, so adding a
//! leaf kind is a compile-time-enforced change everywhere, never a silently
//! ignored default branch / 封闭联合类型，所有消费者穷举匹配
//!
//! Trees are canonical by construction: nested same-kind combinators are
//! flattened and singleton combinators collapse into their sole child, so
//! semantically identical queries produce structurally identical trees
//! regardless of parenthesization / 树在构造时即规范化

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::reldate::RelativeDate;

/// A creation-date boundary / 创建日期边界
///
/// Relative dates stay symbolic in the tree and are only resolved against the
/// caller's `now` at evaluation time / 相对日期在树中保持符号形式，求值时才解析
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DateBound {
    /// Absolute instant / 绝对时间点
    Absolute(DateTime<Utc>),
    /// Relative to evaluation time / 相对求值时间
    Relative(RelativeDate),
}

impl DateBound {
    /// Resolve to a concrete instant / 解析为具体时间点
    pub fn resolve(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            DateBound::Absolute(instant) => *instant,
            DateBound::Relative(rd) => rd.resolve(now),
        }
    }
}

/// Boolean filter tree over a bookmark / 书签上的布尔过滤树
///
/// Combinators hold at least two children; singletons collapse during
/// construction via [`Matcher::all`] / [`Matcher::any`]
/// 组合节点至少有两个子节点，单子节点在构造时塌缩
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Matcher {
    /// Case-insensitive exact tag match / 忽略大小写的精确标签匹配
    TagName(String),
    /// Case-insensitive exact list match / 忽略大小写的精确列表匹配
    ListName(String),
    /// Created strictly after the boundary / 创建时间严格晚于边界
    DateAfter(DateBound),
    /// Created strictly before the boundary / 创建时间严格早于边界
    DateBefore(DateBound),
    /// Favourited flag equals the value / 收藏标记等于给定值
    Favourited(bool),
    /// Archived flag equals the value / 归档标记等于给定值
    Archived(bool),
    /// All children must match / 所有子节点都要匹配
    And(Vec<Matcher>),
    /// At least one child must match / 至少一个子节点匹配
    Or(Vec<Matcher>),
}

impl Matcher {
    /// Combine children under AND, canonicalizing / 以 AND 组合并规范化
    ///
    /// Nested `And` children are spliced in, an empty list yields `None` and a
    /// single child is returned as-is (no singleton wrappers).
    pub fn all(children: Vec<Matcher>) -> Option<Matcher> {
        let mut flat = Vec::new();
        for child in children {
            match child {
                Matcher::And(grandchildren) => flat.extend(grandchildren),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => None,
            1 => flat.pop(),
            _ => Some(Matcher::And(flat)),
        }
    }

    /// Combine children under OR, canonicalizing / 以 OR 组合并规范化
    pub fn any(children: Vec<Matcher>) -> Option<Matcher> {
        let mut flat = Vec::new();
        for child in children {
            match child {
                Matcher::Or(grandchildren) => flat.extend(grandchildren),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => None,
            1 => flat.pop(),
            _ => Some(Matcher::Or(flat)),
        }
    }

    /// Semantic equality: combinator children compare as multisets / 语义相等
    ///
    /// Child order is preserved in the tree for rendering, so `tag:a and
    /// tag:b` and `tag:b and tag:a` differ structurally but compare equal
    /// here / 子节点顺序为渲染保留，语义比较忽略顺序
    pub fn semantic_eq(&self, other: &Matcher) -> bool {
        match (self, other) {
            (Matcher::And(a), Matcher::And(b)) => multiset_eq(a, b),
            (Matcher::Or(a), Matcher::Or(b)) => multiset_eq(a, b),
            (a, b) => a == b,
        }
    }
}

/// 忽略顺序的子节点多重集合比较
fn multiset_eq(a: &[Matcher], b: &[Matcher]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut used = vec![false; b.len()];
    'outer: for x in a {
        for (i, y) in b.iter().enumerate() {
            if !used[i] && x.semantic_eq(y) {
                used[i] = true;
                continue 'outer;
            }
        }
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_flattens_nested_and() {
        // And(And(a,b),c) == And(a,b,c)
        let inner = Matcher::all(vec![
            Matcher::TagName("a".to_string()),
            Matcher::TagName("b".to_string()),
        ])
        .unwrap();
        let outer = Matcher::all(vec![inner, Matcher::TagName("c".to_string())]).unwrap();
        assert_eq!(
            outer,
            Matcher::And(vec![
                Matcher::TagName("a".to_string()),
                Matcher::TagName("b".to_string()),
                Matcher::TagName("c".to_string()),
            ])
        );
    }

    #[test]
    fn test_singleton_collapses() {
        let m = Matcher::all(vec![Matcher::Favourited(true)]).unwrap();
        assert_eq!(m, Matcher::Favourited(true));

        let m = Matcher::any(vec![Matcher::Archived(true)]).unwrap();
        assert_eq!(m, Matcher::Archived(true));
    }

    #[test]
    fn test_empty_yields_none() {
        assert_eq!(Matcher::all(vec![]), None);
        assert_eq!(Matcher::any(vec![]), None);
    }

    #[test]
    fn test_or_does_not_splice_into_and() {
        // Or 子树在 And 下保持独立（保留优先级分组）
        let or = Matcher::any(vec![
            Matcher::TagName("a".to_string()),
            Matcher::TagName("b".to_string()),
        ])
        .unwrap();
        let and = Matcher::all(vec![or.clone(), Matcher::Archived(true)]).unwrap();
        assert_eq!(and, Matcher::And(vec![or, Matcher::Archived(true)]));
    }

    #[test]
    fn test_semantic_eq_ignores_child_order() {
        let a = Matcher::And(vec![
            Matcher::TagName("a".to_string()),
            Matcher::TagName("b".to_string()),
        ]);
        let b = Matcher::And(vec![
            Matcher::TagName("b".to_string()),
            Matcher::TagName("a".to_string()),
        ]);
        assert_ne!(a, b);
        assert!(a.semantic_eq(&b));
    }

    #[test]
    fn test_semantic_eq_recurses() {
        let a = Matcher::And(vec![
            Matcher::Or(vec![
                Matcher::TagName("x".to_string()),
                Matcher::TagName("y".to_string()),
            ]),
            Matcher::Favourited(true),
        ]);
        let b = Matcher::And(vec![
            Matcher::Favourited(true),
            Matcher::Or(vec![
                Matcher::TagName("y".to_string()),
                Matcher::TagName("x".to_string()),
            ]),
        ]);
        assert!(a.semantic_eq(&b));
        assert!(!a.semantic_eq(&Matcher::Favourited(true)));
    }

    #[test]
    fn test_semantic_eq_distinguishes_kinds() {
        let a = Matcher::And(vec![
            Matcher::TagName("a".to_string()),
            Matcher::TagName("b".to_string()),
        ]);
        let b = Matcher::Or(vec![
            Matcher::TagName("a".to_string()),
            Matcher::TagName("b".to_string()),
        ]);
        assert!(!a.semantic_eq(&b));
    }

    #[test]
    fn test_matcher_tree_serializes() {
        // 树是渲染器/API 的契约，必须可序列化
        let m = Matcher::And(vec![
            Matcher::TagName("ai".to_string()),
            Matcher::Favourited(true),
        ]);
        let json = serde_json::to_string(&m).unwrap();
        let back: Matcher = serde_json::from_str(&json).unwrap();
        assert_eq!(m, back);
    }
}
