use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use utils_common::models::PostRecord;

/// 筛选状态 - 只由控制器的事件处理函数修改
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// 原始搜索词（高亮时使用）
    #[serde(default, alias = "search")]
    pub search_term: String,
    /// 当前勾选的主题
    #[serde(default, alias = "topics")]
    pub selected_topics: BTreeSet<String>,
}

impl FilterState {
    /// 匹配用的小写搜索词
    pub fn normalized_term(&self) -> String {
        self.search_term.to_lowercase()
    }

    /// 勾选或取消一个主题，返回状态是否发生变化
    pub fn set_topic(&mut self, topic: &str, checked: bool) -> bool {
        if checked {
            self.selected_topics.insert(topic.to_string())
        } else {
            self.selected_topics.remove(topic)
        }
    }
}

/// 判断文章是否应当显示
///
/// `term` 必须已经转为小写；`selected` 为空时不限制主题。
pub fn matches(post: &PostRecord, term: &str, selected: &BTreeSet<String>) -> bool {
    matches_search(post, term) && matches_topics(post, selected)
}

/// 标题、摘要、任一标签或任一主题包含搜索词
pub fn matches_search(post: &PostRecord, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }

    let contains = |field: &str| field.to_lowercase().contains(term);

    contains(&post.title)
        || contains(&post.excerpt)
        || post.tags.iter().any(|tag| contains(tag))
        || post.topics.iter().any(|topic| contains(topic))
}

/// 未选择主题，或文章至少包含一个已选主题
pub fn matches_topics(post: &PostRecord, selected: &BTreeSet<String>) -> bool {
    selected.is_empty() || post.topics.iter().any(|topic| selected.contains(topic))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post() -> PostRecord {
        PostRecord {
            id: 2,
            title: "Digital Renaissance".to_string(),
            excerpt: "How technology is reshaping creative expression.".to_string(),
            date: "March 10, 2025".to_string(),
            topics: vec!["technology".to_string(), "design".to_string()],
            tags: vec!["web-design".to_string(), "trends".to_string()],
            url: "post2.html".to_string(),
        }
    }

    fn topics(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_state_matches_everything() {
        let empty = PostRecord {
            id: 9,
            title: String::new(),
            excerpt: String::new(),
            date: String::new(),
            topics: Vec::new(),
            tags: Vec::new(),
            url: String::new(),
        };
        assert!(matches(&post(), "", &BTreeSet::new()));
        assert!(matches(&empty, "", &BTreeSet::new()));
    }

    #[test]
    fn search_covers_title_excerpt_tags_and_topics() {
        assert!(matches_search(&post(), "renaissance"));
        assert!(matches_search(&post(), "creative"));
        assert!(matches_search(&post(), "trends"));
        assert!(matches_search(&post(), "techno"));
        assert!(!matches_search(&post(), "minimalism"));
    }

    #[test]
    fn date_is_not_searched() {
        assert!(!matches_search(&post(), "march"));
    }

    #[test]
    fn field_case_is_ignored() {
        // 搜索词已小写，字段中的大写字母不影响匹配
        assert!(matches_search(&post(), "digital"));
    }

    #[test]
    fn topic_selection_needs_one_shared_topic() {
        assert!(matches_topics(&post(), &topics(&["technology"])));
        assert!(matches_topics(&post(), &topics(&["minimalism", "design"])));
        assert!(!matches_topics(&post(), &topics(&["minimalism"])));
        assert!(!matches_topics(&post(), &topics(&["Technology"])));
    }

    #[test]
    fn search_and_topics_combine_with_and() {
        assert!(matches(&post(), "digital", &topics(&["design"])));
        assert!(!matches(&post(), "digital", &topics(&["minimalism"])));
        assert!(!matches(&post(), "nothing", &topics(&["design"])));
    }

    #[test]
    fn toggling_topics_updates_state() {
        let mut state = FilterState::default();
        assert!(state.set_topic("design", true));
        assert!(!state.set_topic("design", true));
        assert!(state.set_topic("design", false));
        assert!(!state.set_topic("design", false));
        assert!(state.selected_topics.is_empty());
    }

    #[test]
    fn state_accepts_short_field_names() {
        let state: FilterState =
            serde_json::from_str(r#"{"search": "Design", "topics": ["technology"]}"#).unwrap();
        assert_eq!(state.normalized_term(), "design");
        assert!(state.selected_topics.contains("technology"));
    }
}
