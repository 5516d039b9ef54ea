use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 文章记录 - 列表展示与筛选所需的全部信息
///
/// 除 `id` 外的字段缺失时按空值处理，不视为错误。
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PostRecord {
    /// 文章唯一标识符
    pub id: u32,
    /// 文章标题
    #[serde(default)]
    pub title: String,
    /// 文章摘要
    #[serde(default)]
    pub excerpt: String,
    /// 展示用日期字符串，原样输出
    #[serde(default)]
    pub date: String,
    /// 主题列表（仅用于筛选，按集合语义匹配）
    #[serde(default)]
    pub topics: Vec<String>,
    /// 标签列表（可搜索，并渲染为徽章）
    #[serde(default)]
    pub tags: Vec<String>,
    /// 文章详情页链接
    #[serde(default)]
    pub url: String,
}

/// 压缩存储的载荷 - 按原始顺序保存的文章列表
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct StorePayload {
    pub posts: Vec<PostRecord>,
}

/// 存储元数据 - 由索引工具生成，与二进制存储文件放在一起
#[derive(Serialize, Deserialize, Debug)]
pub struct StoreMetadata {
    /// 文章数量
    pub post_count: usize,
    /// 去重后的主题数量
    pub topic_count: usize,
    /// 去重后的标签数量
    pub tag_count: usize,
    /// 生成时间
    pub created_at: DateTime<Utc>,
    /// 存储格式版本
    pub version: String,
}
