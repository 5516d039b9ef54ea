use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use utils_common::compression::{to_compressed, STORE_VERSION};
use utils_common::models::{PostRecord, StoreMetadata};

use crate::store::PostStore;

/// 二进制存储文件名
pub const STORE_FILE_NAME: &str = "posts.bin";
/// 元数据文件名
pub const METADATA_FILE_NAME: &str = "posts.meta.json";

/// 文章存储构建器 - 供离线工具使用
#[derive(Default)]
pub struct StoreBuilder {
    posts: Vec<PostRecord>,
}

impl StoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加文章
    pub fn add_post(&mut self, post: PostRecord) {
        self.posts.push(post);
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// 按 id 排序后构建存储
    pub fn build_store(&self) -> Result<PostStore, String> {
        if self.posts.is_empty() {
            return Err("无法构建存储: 没有文章数据".to_string());
        }

        let mut posts = self.posts.clone();
        posts.sort_by_key(|post| post.id);
        PostStore::new(posts)
    }

    /// 生成存储元数据
    pub fn build_metadata(store: &PostStore) -> StoreMetadata {
        StoreMetadata {
            post_count: store.len(),
            topic_count: store.all_topics().len(),
            tag_count: store.all_tags().len(),
            created_at: Utc::now(),
            version: format!("{}.{}", STORE_VERSION[0], STORE_VERSION[1]),
        }
    }

    /// 将存储和元数据写入输出目录，返回写入的文件路径
    pub fn save(&self, output_dir: &Path) -> Result<(PathBuf, PathBuf), String> {
        let store = self.build_store()?;
        let metadata = Self::build_metadata(&store);

        let compressed = to_compressed(&store.to_payload(), STORE_VERSION)
            .map_err(|e| format!("压缩文章存储失败: {}", e))?;
        let store_path = output_dir.join(STORE_FILE_NAME);
        fs::write(&store_path, &compressed)
            .map_err(|e| format!("无法写入存储文件 {}: {}", store_path.display(), e))?;

        let metadata_json = serde_json::to_string_pretty(&metadata)
            .map_err(|e| format!("序列化元数据失败: {}", e))?;
        let metadata_path = output_dir.join(METADATA_FILE_NAME);
        fs::write(&metadata_path, metadata_json)
            .map_err(|e| format!("无法写入元数据文件 {}: {}", metadata_path.display(), e))?;

        Ok((store_path, metadata_path))
    }
}
