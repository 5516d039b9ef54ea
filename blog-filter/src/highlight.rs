use regex::{Captures, Regex, RegexBuilder};

use crate::logging;

/// 默认高亮标签
pub const DEFAULT_HIGHLIGHT_TAG: &str = "mark";

/// 编译后正则的大小上限（字节）
pub const PATTERN_SIZE_LIMIT: usize = 10 * (1 << 20);

/// 搜索词高亮器
///
/// 搜索词按字面文本处理：构造正则前先转义所有元字符，
/// 因此 `(`、`*` 等用户输入不会导致匹配失败或被当作模式解释。
#[derive(Debug, Clone)]
pub struct Highlighter {
    pattern: Option<Regex>,
    tag: String,
}

impl Highlighter {
    pub fn new(search_term: &str, tag: &str) -> Self {
        Self::with_size_limit(search_term, tag, PATTERN_SIZE_LIMIT)
    }

    /// 指定正则大小上限；编译失败时记录错误并退化为不高亮
    pub fn with_size_limit(search_term: &str, tag: &str, size_limit: usize) -> Self {
        let pattern = if search_term.is_empty() {
            None
        } else {
            RegexBuilder::new(&regex::escape(search_term))
                .case_insensitive(true)
                .size_limit(size_limit)
                .build()
                .map_err(|e| logging::error(&format!("搜索词无法高亮，已忽略: {}", e)))
                .ok()
        };

        Self {
            pattern,
            tag: tag.to_string(),
        }
    }

    /// 高亮文本中所有匹配，保留原文大小写
    pub fn apply(&self, text: &str) -> String {
        match &self.pattern {
            Some(pattern) => pattern
                .replace_all(text, |caps: &Captures| {
                    format!("<{tag}>{}</{tag}>", &caps[0], tag = self.tag)
                })
                .into_owned(),
            None => text.to_string(),
        }
    }
}

/// 使用默认标签高亮搜索词；搜索词为空时原样返回
pub fn highlight_search_term(text: &str, search_term: &str) -> String {
    Highlighter::new(search_term, DEFAULT_HIGHLIGHT_TAG).apply(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_term_returns_text_unchanged() {
        let text = "Future of Web Design";
        assert_eq!(highlight_search_term(text, ""), text);
    }

    #[test]
    fn keeps_original_casing() {
        assert_eq!(
            highlight_search_term("Design meets design", "DESIGN"),
            "<mark>Design</mark> meets <mark>design</mark>"
        );
    }

    #[test]
    fn metacharacters_match_literally() {
        assert_eq!(
            highlight_search_term("web design (2025) and design", "design ("),
            "web <mark>design (</mark>2025) and design"
        );
        assert_eq!(highlight_search_term("a+b = c", "+"), "a<mark>+</mark>b = c");
        assert_eq!(highlight_search_term("no parens here", "("), "no parens here");
        assert_eq!(highlight_search_term("any text", ".*"), "any text");
        assert_eq!(highlight_search_term("cost $5", "$5"), "cost <mark>$5</mark>");
    }

    #[test]
    fn oversized_pattern_falls_back_to_plain_text() {
        let highlighter = Highlighter::with_size_limit("design", DEFAULT_HIGHLIGHT_TAG, 1);
        assert_eq!(highlighter.apply("Web Design"), "Web Design");
    }

    #[test]
    fn custom_tag_is_used() {
        let highlighter = Highlighter::new("web", "strong");
        assert_eq!(highlighter.apply("Web Design"), "<strong>Web</strong> Design");
    }

    #[test]
    fn repeated_calls_are_stable() {
        let highlighter = Highlighter::new("design", DEFAULT_HIGHLIGHT_TAG);
        let first = highlighter.apply("Future of Web Design");
        assert_eq!(first, highlighter.apply("Future of Web Design"));
        assert_eq!(first, "Future of Web <mark>Design</mark>");
    }
}
