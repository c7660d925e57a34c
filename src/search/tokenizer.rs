//! Query tokenizer - splits the raw search string into typed tokens / 查询分词器
//!
//! Rules, in priority order / 规则（按优先级）：
//! - `"..."` is a phrase, `\"` escapes a literal quote / 引号内为短语
//! - `key:value` with a recognized key becomes a KeyValue (value may be quoted) / 键值对
//! - bare `and` / `or` (case-insensitive) become boolean operators / 布尔操作符
//! - `(` and `)` become grouping tokens / 分组括号
//! - everything else, whitespace-delimited, is a plain word / 其余为普通单词
//!
//! Tokenization never fails: unrecognized input degrades to words so the
//! user always gets some search result / 分词永不失败，无法识别的输入降级为单词

/// Operator keys the query language understands / 查询语言识别的操作符键
pub const RECOGNIZED_KEYS: &[&str] = &["tag", "list", "is", "before", "after"];

/// A classified lexical unit of the query string / 查询字符串的词法单元
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Plain free-text word / 普通自由文本单词
    Word(String),
    /// Quoted phrase, internal whitespace preserved / 带引号的短语，保留内部空白
    Phrase(String),
    /// `key:value` operator pair / 键值对操作符
    KeyValue { key: String, value: String },
    /// Boolean AND operator / 与操作符
    And,
    /// Boolean OR operator / 或操作符
    Or,
    /// Opening parenthesis / 左括号
    LParen,
    /// Closing parenthesis / 右括号
    RParen,
    /// End of input / 输入结束
    End,
}

/// Tokenize a raw query string / 对原始查询字符串分词
///
/// Never fails; the returned stream always ends with [`Token::End`].
pub fn tokenize(input: &str) -> Vec<Token> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        match c {
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '"' => {
                let (phrase, next) = read_quoted(&chars, i + 1);
                tokens.push(Token::Phrase(phrase));
                i = next;
            }
            _ => {
                let (token, next) = read_bare(&chars, i);
                tokens.push(token);
                i = next;
            }
        }
    }

    tokens.push(Token::End);
    tokens
}

/// Read a quoted run starting after the opening quote / 读取引号内容
///
/// An unterminated quote swallows the rest of the input (never fails).
/// Returns the content and the index after the closing quote.
fn read_quoted(chars: &[char], start: usize) -> (String, usize) {
    let mut out = String::new();
    let mut i = start;

    while i < chars.len() {
        match chars[i] {
            '\\' if i + 1 < chars.len() && chars[i + 1] == '"' => {
                out.push('"');
                i += 2;
            }
            '"' => return (out, i + 1),
            c => {
                out.push(c);
                i += 1;
            }
        }
    }

    (out, i)
}

/// Read a bare (unquoted) run and classify it / 读取并分类一段裸文本
fn read_bare(chars: &[char], start: usize) -> (Token, usize) {
    // 先读取候选标识符（到空白、括号、引号或冒号为止）
    let mut ident = String::new();
    let mut i = start;
    while i < chars.len() && !is_bare_terminator(chars[i]) && chars[i] != ':' {
        ident.push(chars[i]);
        i += 1;
    }

    // `ident:` followed by a non-whitespace run is a key:value candidate
    if i < chars.len() && chars[i] == ':' && !ident.is_empty() {
        let colon = i;
        i += 1;

        let (value, literal_value, next) = if i < chars.len() && chars[i] == '"' {
            let quote_start = i;
            let (content, after) = read_quoted(chars, i + 1);
            let literal: String = chars[quote_start..after].iter().collect();
            (content, literal, after)
        } else {
            let mut v = String::new();
            while i < chars.len() && !is_bare_terminator(chars[i]) {
                v.push(chars[i]);
                i += 1;
            }
            (v.clone(), v, i)
        };

        if value.is_empty() {
            // 孤立的 `key:` 退化为普通单词
            return (Token::Word(format!("{ident}:")), colon + 1);
        }

        let key = ident.to_lowercase();
        if RECOGNIZED_KEYS.contains(&key.as_str()) {
            return (Token::KeyValue { key, value }, next);
        }

        // Unknown keys keep their literal text as a word, preserving forward
        // compatibility with operators this version does not know
        // 未知键保留字面文本，保证前向兼容
        return (Token::Word(format!("{ident}:{literal_value}")), next);
    }

    if ident.is_empty() {
        // 以 `:` 开头的裸文本整体作为单词消费，避免原地踏步
        let mut word = String::new();
        while i < chars.len() && !is_bare_terminator(chars[i]) {
            word.push(chars[i]);
            i += 1;
        }
        return (Token::Word(word), i);
    }

    // 普通单词；`and` / `or` 是布尔操作符
    match ident.to_lowercase().as_str() {
        "and" => (Token::And, i),
        "or" => (Token::Or, i),
        _ => (Token::Word(ident), i),
    }
}

/// Characters that end a bare run / 结束裸文本的字符
fn is_bare_terminator(c: char) -> bool {
    c.is_whitespace() || c == '(' || c == ')' || c == '"'
}

/// Normalize a term for case-insensitive comparison / 标准化词项用于忽略大小写比较
pub fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase()
}
