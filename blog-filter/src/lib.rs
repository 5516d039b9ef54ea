use serde::Serialize;
use std::rc::Rc;
use utils_common::models::PostRecord;
use wasm_bindgen::prelude::*;

pub mod builder;
pub mod config;
pub mod controller;
pub mod dom;
pub mod filter;
pub mod highlight;
pub mod logging;
pub mod render;
pub mod store;
pub mod timer;

pub use config::{FilterConfig, RenderOptions};
pub use controller::FilterController;
pub use filter::{matches, FilterState};
pub use highlight::{highlight_search_term, Highlighter};
pub use render::{render_into, render_posts, MemoryRegion, OutputRegion};
pub use store::PostStore;
pub use timer::{BrowserScheduler, ManualScheduler, Scheduler};

use dom::{DomBinding, ElementRegion};

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// 初始化函数 - 设置错误处理
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// 版本信息
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// 高亮搜索词（默认使用 `<mark>`）
#[wasm_bindgen]
pub fn highlight(text: &str, search_term: &str) -> String {
    highlight_search_term(text, search_term)
}

/// 无状态筛选结果
#[derive(Serialize, Debug)]
pub struct FilterResult {
    /// 筛选后的文章，保持原始顺序
    pub posts: Vec<PostRecord>,
    /// 结果总数
    pub total: usize,
}

/// 按筛选条件过滤文章存储
pub fn filter_store(store: &PostStore, params: &FilterState) -> FilterResult {
    let posts: Vec<PostRecord> = store.filter(params).into_iter().cloned().collect();
    FilterResult {
        total: posts.len(),
        posts,
    }
}

/// 解析 `{ search, topics }` 形式的筛选参数并执行筛选
///
/// `posts_json` 为空时使用内置示例文章。
pub fn filter_posts_json(posts_json: &str, params_json: &str) -> Result<FilterResult, String> {
    let store = if posts_json.trim().is_empty() {
        PostStore::sample()
    } else {
        PostStore::from_json(posts_json)?
    };

    let params: FilterState = if params_json.trim().is_empty() {
        FilterState::default()
    } else {
        serde_json::from_str(params_json).map_err(|e| format!("解析参数失败: {}", e))?
    };

    Ok(filter_store(&store, &params))
}

/// 无状态筛选接口
#[wasm_bindgen]
pub fn filter_posts(posts_json: &str, params_json: &str) -> Result<JsValue, JsValue> {
    let result = filter_posts_json(posts_json, params_json).map_err(|e| JsValue::from_str(&e))?;

    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| JsValue::from_str(&format!("序列化结果失败: {}", e)))
}

fn is_absent(value: &JsValue) -> bool {
    value.is_undefined() || value.is_null()
}

fn parse_config(value: JsValue) -> Result<FilterConfig, String> {
    if is_absent(&value) {
        return Ok(FilterConfig::default());
    }
    if let Some(json) = value.as_string() {
        return FilterConfig::from_json(&json);
    }

    let config: FilterConfig = serde_wasm_bindgen::from_value(value)
        .map_err(|e| format!("解析配置失败: {}", e))?;
    config.validate()?;
    Ok(config)
}

fn parse_posts(value: JsValue) -> Result<PostStore, String> {
    if is_absent(&value) {
        return Ok(PostStore::sample());
    }
    if let Some(json) = value.as_string() {
        return PostStore::from_json(&json);
    }

    let posts: Vec<PostRecord> = serde_wasm_bindgen::from_value(value)
        .map_err(|e| format!("解析文章数据失败: {}", e))?;
    PostStore::new(posts)
}

/// 博客筛选器 JS 接口 - 绑定页面元素并维护筛选状态
#[wasm_bindgen]
pub struct BlogFilterJS {
    controller: Rc<FilterController<BrowserScheduler>>,
    binding: DomBinding,
}

#[wasm_bindgen]
impl BlogFilterJS {
    /// 挂载到页面；`posts` 省略时使用内置示例文章
    #[wasm_bindgen]
    pub fn mount(config: JsValue, posts: JsValue) -> Result<BlogFilterJS, JsValue> {
        console_error_panic_hook::set_once();

        let result = parse_config(config).and_then(|config| {
            let store = parse_posts(posts)?;
            Self::attach(store, &config)
        });

        result.map_err(|e| {
            logging::error(&format!("挂载筛选器失败: {}", e));
            JsValue::from_str(&e)
        })
    }

    /// 使用压缩存储格式的文章数据挂载
    #[wasm_bindgen]
    pub fn load_compressed(config: JsValue, data: &[u8]) -> Result<BlogFilterJS, JsValue> {
        console_error_panic_hook::set_once();

        let result = parse_config(config).and_then(|config| {
            let store = PostStore::from_compressed(data)?;
            Self::attach(store, &config)
        });

        result.map_err(|e| {
            logging::error(&format!("加载文章存储失败: {}", e));
            JsValue::from_str(&e)
        })
    }

    /// 立即按当前状态重新渲染
    #[wasm_bindgen]
    pub fn refresh(&self) {
        self.controller.render_now();
    }

    /// 移除事件监听并取消待执行的重算
    #[wasm_bindgen]
    pub fn unmount(&mut self) {
        self.binding.detach();
        self.controller.cancel_pending();
    }

    #[wasm_bindgen]
    pub fn visible_ids(&self) -> Vec<u32> {
        self.controller.visible_ids()
    }

    #[wasm_bindgen]
    pub fn search_term(&self) -> String {
        self.controller.state().search_term
    }

    #[wasm_bindgen]
    pub fn selected_topics(&self) -> js_sys::Array {
        self.controller
            .state()
            .selected_topics
            .iter()
            .map(|topic| JsValue::from_str(topic))
            .collect()
    }

    #[wasm_bindgen]
    pub fn all_topics(&self) -> js_sys::Array {
        self.controller
            .store()
            .all_topics()
            .iter()
            .map(|topic| JsValue::from_str(topic))
            .collect()
    }

    #[wasm_bindgen]
    pub fn render_count(&self) -> usize {
        self.controller.render_count()
    }
}

impl BlogFilterJS {
    fn attach(store: PostStore, config: &FilterConfig) -> Result<BlogFilterJS, String> {
        let document = dom::document()?;
        let output = dom::element_by_id(&document, &config.output_id)?;
        let search = dom::search_input(&document, config)?;
        let checkboxes = dom::topic_checkboxes(&document, config)?;
        let checkbox_count = checkboxes.len();

        let post_count = store.len();
        let controller = Rc::new(FilterController::new(
            Rc::new(store),
            Box::new(ElementRegion::new(output)),
            BrowserScheduler,
            config,
        ));
        let binding = DomBinding::attach(&controller, search, checkboxes)?;

        controller.render_now();
        logging::log(&format!(
            "筛选器已挂载，文章数量: {}，主题复选框: {}",
            post_count,
            checkbox_count
        ));

        Ok(BlogFilterJS { controller, binding })
    }
}
