use once_cell::sync::Lazy;
use std::collections::{BTreeSet, HashSet};
use utils_common::compression;
use utils_common::models::{PostRecord, StorePayload};

use crate::filter::{matches, FilterState};

/// 页面内置的示例文章
static SAMPLE_STORE: Lazy<PostStore> = Lazy::new(|| PostStore {
    posts: vec![
        sample_post(
            1,
            "The Art of Minimalism",
            "Exploring the beauty of less in modern design and lifestyle.",
            "March 11, 2025",
            &["design", "minimalism"],
            &["ui-ux", "trends"],
            "post1.html",
        ),
        sample_post(
            2,
            "Digital Renaissance",
            "How technology is reshaping creative expression in the 21st century.",
            "March 10, 2025",
            &["technology", "design"],
            &["web-design", "trends"],
            "post2.html",
        ),
        sample_post(
            3,
            "Future of Web Design",
            "Predictions and trends shaping the next decade of digital interfaces.",
            "March 9, 2025",
            &["design", "technology"],
            &["ui-ux", "web-design"],
            "post3.html",
        ),
    ],
});

fn sample_post(
    id: u32,
    title: &str,
    excerpt: &str,
    date: &str,
    topics: &[&str],
    tags: &[&str],
    url: &str,
) -> PostRecord {
    PostRecord {
        id,
        title: title.to_string(),
        excerpt: excerpt.to_string(),
        date: date.to_string(),
        topics: topics.iter().map(|s| s.to_string()).collect(),
        tags: tags.iter().map(|s| s.to_string()).collect(),
        url: url.to_string(),
    }
}

/// 文章存储 - 启动时加载一次，之后只读
#[derive(Debug, Clone, Default)]
pub struct PostStore {
    posts: Vec<PostRecord>,
}

impl PostStore {
    /// 创建存储，保持传入顺序；id 重复时报错
    pub fn new(posts: Vec<PostRecord>) -> Result<Self, String> {
        let mut seen = HashSet::with_capacity(posts.len());
        for post in &posts {
            if !seen.insert(post.id) {
                return Err(format!("文章 id 重复: {}", post.id));
            }
        }
        Ok(Self { posts })
    }

    /// 内置示例文章
    pub fn sample() -> Self {
        SAMPLE_STORE.clone()
    }

    /// 从 JSON 数组加载
    pub fn from_json(json: &str) -> Result<Self, String> {
        let posts: Vec<PostRecord> = serde_json::from_str(json)
            .map_err(|e| format!("解析文章数据失败: {}", e))?;
        Self::new(posts)
    }

    /// 从压缩存储格式加载
    pub fn from_compressed(data: &[u8]) -> Result<Self, String> {
        let payload: StorePayload = compression::from_compressed(data)
            .map_err(|e| format!("解析文章存储失败: {}", e))?;
        Self::new(payload.posts)
    }

    /// 转换为可写入压缩格式的载荷
    pub fn to_payload(&self) -> StorePayload {
        StorePayload { posts: self.posts.clone() }
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn posts(&self) -> &[PostRecord] {
        &self.posts
    }

    pub fn get(&self, id: u32) -> Option<&PostRecord> {
        self.posts.iter().find(|post| post.id == id)
    }

    /// 按当前筛选状态过滤，保持存储中的原始顺序
    pub fn filter(&self, state: &FilterState) -> Vec<&PostRecord> {
        let term = state.normalized_term();
        self.posts
            .iter()
            .filter(|post| matches(post, &term, &state.selected_topics))
            .collect()
    }

    /// 所有主题（去重、排序）
    pub fn all_topics(&self) -> BTreeSet<String> {
        self.posts.iter().flat_map(|p| p.topics.iter().cloned()).collect()
    }

    /// 所有标签（去重、排序）
    pub fn all_tags(&self) -> BTreeSet<String> {
        self.posts.iter().flat_map(|p| p.tags.iter().cloned()).collect()
    }
}
