pub mod config;
pub mod search;

// Common entry point: parse a raw query string / 常用入口：解析原始查询字符串
pub use search::parser::parse_search_query;
pub use search::{Matcher, TextAndMatcher};
