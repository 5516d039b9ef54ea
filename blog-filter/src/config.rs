use serde::Deserialize;

/// 默认防抖间隔（毫秒）
pub const DEFAULT_DEBOUNCE_MS: u32 = 300;

/// 过滤器配置 - 页面挂载时由 JavaScript 传入，所有字段可省略
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FilterConfig {
    /// 防抖间隔（毫秒）
    pub debounce_ms: u32,
    /// 搜索输入框的元素 id
    pub search_input_id: String,
    /// 文章列表容器的元素 id
    pub output_id: String,
    /// 主题复选框的 CSS 选择器
    pub topic_checkbox_selector: String,
    /// 高亮标签名
    pub highlight_tag: String,
    /// 无结果时的提示文本
    pub no_results_message: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            search_input_id: "blog-search".to_string(),
            output_id: "blog-grid".to_string(),
            topic_checkbox_selector: ".filter-option input[type=\"checkbox\"]".to_string(),
            highlight_tag: "mark".to_string(),
            no_results_message: "No posts found.".to_string(),
        }
    }
}

impl FilterConfig {
    /// 从 JSON 字符串解析配置，空字符串视为默认配置
    pub fn from_json(json: &str) -> Result<Self, String> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_json::from_str(json)
            .map_err(|e| format!("解析配置失败: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// 校验配置
    pub fn validate(&self) -> Result<(), String> {
        if self.highlight_tag.is_empty()
            || !self.highlight_tag.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(format!("无效的高亮标签: '{}'", self.highlight_tag));
        }
        if self.search_input_id.is_empty() || self.output_id.is_empty() {
            return Err("搜索框与输出容器的元素 id 不能为空".to_string());
        }
        if self.topic_checkbox_selector.trim().is_empty() {
            return Err("主题复选框选择器不能为空".to_string());
        }
        Ok(())
    }

    /// 渲染相关的配置子集
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            highlight_tag: self.highlight_tag.clone(),
            no_results_message: self.no_results_message.clone(),
        }
    }
}

/// 渲染选项
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub highlight_tag: String,
    pub no_results_message: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        FilterConfig::default().render_options()
    }
}
