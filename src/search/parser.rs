//! Query parser - recursive descent over the token stream / 查询解析器
//!
//! Splits one raw search string into two halves / 把一条搜索串拆成两半：
//! - residual free text, handed to the full-text index / 剩余自由文本交给全文索引
//! - a structured matcher tree built only from explicit operators / 仅由显式操作符构建的匹配树
//!
//! Grammar, highest to lowest precedence / 文法（优先级从高到低）：
//! - `primary := KeyValue | '(' expr ')' | Word | Phrase`
//! - `term    := primary (implicit-AND primary)*`
//! - `expr    := term (or term)*`
//!
//! Error policy / 错误策略：
//! - a bad operator value (unknown `is:` value, malformed date) degrades to
//!   free text, never rejects the query / 操作符值错误降级为自由文本
//! - only structural failures (unbalanced parentheses, dangling `and`/`or`)
//!   mark the result invalid, and the caller still gets the raw input back as
//!   text so plain free-text search can proceed / 仅结构错误置为无效，原始输入保留
//! - parsing never panics / 解析永不 panic

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::matcher::{DateBound, Matcher};
use super::reldate::parse_relative_token;
use super::tokenizer::{tokenize, Token};

/// Whether the query parsed cleanly / 查询是否解析成功
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseStatus {
    Valid,
    Invalid,
}

/// The parse result: residual text plus an optional matcher tree / 解析结果
///
/// Invariants / 不变量：
/// - `result == Invalid` implies `matcher == None`, and `text` is the raw
///   original input / 无效时丢弃匹配树，text 为原始输入
/// - empty `text` with no matcher means "match everything" / 两者皆空表示匹配一切
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextAndMatcher {
    pub text: String,
    pub matcher: Option<Matcher>,
    pub result: ParseStatus,
}

/// 结构性文法错误（唯一导致 Invalid 的情况）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
enum StructuralError {
    #[error("operator with no operand")]
    DanglingOperator,
    #[error("unbalanced parentheses")]
    UnbalancedParens,
}

/// Parse a raw search query / 解析原始搜索查询
///
/// Never panics and never returns a hard error: a structurally malformed
/// query falls back to pure free-text search / 永不硬失败，结构错误回退为纯文本搜索
pub fn parse_search_query(raw: &str) -> TextAndMatcher {
    let tokens = tokenize(raw);
    let mut parser = Parser { tokens: &tokens, pos: 0, text: Vec::new() };

    let outcome = parser.parse_expr().and_then(|matcher| {
        match parser.peek() {
            Token::End => Ok(matcher),
            Token::RParen => Err(StructuralError::UnbalancedParens),
            _ => Err(StructuralError::DanglingOperator),
        }
    });

    match outcome {
        Ok(matcher) => TextAndMatcher {
            text: parser.text.join(" "),
            matcher,
            result: ParseStatus::Valid,
        },
        Err(err) => {
            tracing::debug!("structurally invalid query, falling back to free text: {}", err);
            TextAndMatcher {
                text: raw.to_string(),
                matcher: None,
                result: ParseStatus::Invalid,
            }
        }
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    /// 自由文本片段，按原始顺序收集
    text: Vec<String>,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&Token::End)
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    /// `expr := term (or term)*`
    fn parse_expr(&mut self) -> Result<Option<Matcher>, StructuralError> {
        // 空表达式（空查询或空括号组）匹配一切
        if matches!(self.peek(), Token::End | Token::RParen) {
            return Ok(None);
        }

        let mut arms = vec![self.parse_term()?];
        while *self.peek() == Token::Or {
            self.bump();
            arms.push(self.parse_term()?);
        }
        Ok(Matcher::any(arms.into_iter().flatten().collect()))
    }

    /// `term := primary (implicit-AND primary)*`
    ///
    /// Adjacent primaries join under an implicit AND; an explicit `and` is
    /// allowed between any two / 相邻基元隐式 AND，显式 and 也允许
    fn parse_term(&mut self) -> Result<Option<Matcher>, StructuralError> {
        let mut parts = vec![self.parse_primary()?];
        loop {
            match self.peek() {
                Token::And => {
                    self.bump();
                    parts.push(self.parse_primary()?);
                }
                Token::Word(_) | Token::Phrase(_) | Token::KeyValue { .. } | Token::LParen => {
                    parts.push(self.parse_primary()?);
                }
                _ => break,
            }
        }
        Ok(Matcher::all(parts.into_iter().flatten().collect()))
    }

    /// `primary := KeyValue | '(' expr ')' | Word | Phrase`
    ///
    /// Free-text words and phrases are not part of the matcher grammar: they
    /// go to the residual text / 自由文本不进匹配树，进剩余文本
    fn parse_primary(&mut self) -> Result<Option<Matcher>, StructuralError> {
        match self.peek().clone() {
            Token::Word(word) => {
                self.bump();
                self.text.push(word);
                Ok(None)
            }
            Token::Phrase(phrase) => {
                self.bump();
                // 空短语（`""`）对文本搜索没有意义
                if !phrase.is_empty() {
                    self.text.push(phrase);
                }
                Ok(None)
            }
            Token::KeyValue { key, value } => {
                self.bump();
                Ok(self.lower_key_value(&key, &value))
            }
            Token::LParen => {
                self.bump();
                let inner = self.parse_expr()?;
                if *self.peek() != Token::RParen {
                    return Err(StructuralError::UnbalancedParens);
                }
                self.bump();
                Ok(inner)
            }
            Token::And | Token::Or | Token::End => Err(StructuralError::DanglingOperator),
            Token::RParen => Err(StructuralError::UnbalancedParens),
        }
    }

    /// Lower a `key:value` pair to a matcher leaf / 把键值对降低为匹配叶
    ///
    /// A value that fails its specific format degrades the whole pair to
    /// plain text instead of invalidating the query / 值格式错误整体降级为文本
    fn lower_key_value(&mut self, key: &str, value: &str) -> Option<Matcher> {
        match key {
            "tag" => Some(Matcher::TagName(value.to_string())),
            "list" => Some(Matcher::ListName(value.to_string())),
            "is" => match value.to_lowercase().as_str() {
                "fav" | "favourited" => Some(Matcher::Favourited(true)),
                "archived" => Some(Matcher::Archived(true)),
                _ => {
                    tracing::debug!("unknown is: value degraded to text: {}", value);
                    self.degrade_to_text(key, value);
                    None
                }
            },
            "before" | "after" => match parse_date_value(value) {
                Some(bound) if key == "after" => Some(Matcher::DateAfter(bound)),
                Some(bound) => Some(Matcher::DateBefore(bound)),
                None => {
                    tracing::debug!("unparseable date value degraded to text: {}", value);
                    self.degrade_to_text(key, value);
                    None
                }
            },
            // 词法层只产出已识别的键，这里兜底同样降级
            _ => {
                self.degrade_to_text(key, value);
                None
            }
        }
    }

    fn degrade_to_text(&mut self, key: &str, value: &str) {
        if value.chars().any(char::is_whitespace) {
            self.text.push(format!("{key}:\"{value}\""));
        } else {
            self.text.push(format!("{key}:{value}"));
        }
    }
}

/// Parse a date operator value / 解析日期操作符的值
///
/// Relative tokens (`<7d`) take priority; otherwise an absolute `YYYY-MM-DD`
/// literal, interpreted as midnight UTC / 相对日期优先，其次 ISO 日期字面量
fn parse_date_value(value: &str) -> Option<DateBound> {
    if let Ok(rd) = parse_relative_token(value) {
        return Some(DateBound::Relative(rd));
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
    Some(DateBound::Absolute(date.and_hms_opt(0, 0, 0)?.and_utc()))
}
