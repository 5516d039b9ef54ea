use std::cell::RefCell;
use std::fmt::Write;
use std::rc::Rc;
use utils_common::models::PostRecord;

use crate::config::RenderOptions;
use crate::highlight::Highlighter;

/// 输出区域 - 只支持整体替换内容
pub trait OutputRegion {
    fn replace_contents(&mut self, markup: &str);
}

/// 生成文章列表的完整标记
///
/// 标题与摘要做搜索词高亮；日期与标签原样输出。
pub fn render_posts(posts: &[&PostRecord], search_term: &str, options: &RenderOptions) -> String {
    if posts.is_empty() {
        return format!("<div class=\"no-results\">{}</div>", options.no_results_message);
    }

    let highlighter = Highlighter::new(search_term, &options.highlight_tag);
    let mut markup = String::new();

    for post in posts {
        // 写入 String 不会失败
        let _ = write!(
            markup,
            "<div class=\"blog-post\" data-id=\"{id}\" \
             data-topics=\"{topics}\" data-tags=\"{tags}\">\
             <div class=\"post-content\">\
             <h2><a href=\"{url}\">{title}</a></h2>\
             <p>{excerpt}</p>\
             <span class=\"post-date\">{date}</span>\
             <div class=\"post-tags\">",
            id = post.id,
            topics = post.topics.join(","),
            tags = post.tags.join(","),
            url = post.url,
            title = highlighter.apply(&post.title),
            excerpt = highlighter.apply(&post.excerpt),
            date = post.date,
        );
        for tag in &post.tags {
            let _ = write!(markup, "<span class=\"tag\">{}</span>", tag);
        }
        markup.push_str("</div></div></div>");
    }

    markup
}

/// 渲染并整体替换输出区域的内容
pub fn render_into(
    output: &mut dyn OutputRegion,
    posts: &[&PostRecord],
    search_term: &str,
    options: &RenderOptions,
) {
    let markup = render_posts(posts, search_term, options);
    output.replace_contents(&markup);
}

#[derive(Debug, Default)]
struct MemoryContents {
    markup: String,
    replacements: usize,
}

/// 内存中的输出区域，可克隆共享，便于在非浏览器环境观察渲染结果
#[derive(Debug, Clone, Default)]
pub struct MemoryRegion {
    inner: Rc<RefCell<MemoryContents>>,
}

impl MemoryRegion {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前内容
    pub fn contents(&self) -> String {
        self.inner.borrow().markup.clone()
    }

    /// 内容被替换的次数
    pub fn replacements(&self) -> usize {
        self.inner.borrow().replacements
    }
}

impl OutputRegion for MemoryRegion {
    fn replace_contents(&mut self, markup: &str) {
        let mut inner = self.inner.borrow_mut();
        inner.markup = markup.to_string();
        inner.replacements += 1;
    }
}
