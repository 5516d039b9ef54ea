use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlInputElement};

use crate::config::FilterConfig;
use crate::controller::FilterController;
use crate::render::OutputRegion;
use crate::timer::BrowserScheduler;

/// 页面中的输出容器
pub struct ElementRegion {
    element: Element,
}

impl ElementRegion {
    pub fn new(element: Element) -> Self {
        Self { element }
    }
}

impl OutputRegion for ElementRegion {
    fn replace_contents(&mut self, markup: &str) {
        self.element.set_inner_html(markup);
    }
}

pub fn document() -> Result<Document, String> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| "无法获取 document".to_string())
}

pub fn element_by_id(document: &Document, id: &str) -> Result<Element, String> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| format!("找不到元素: #{}", id))
}

/// 搜索框
pub fn search_input(
    document: &Document,
    config: &FilterConfig,
) -> Result<HtmlInputElement, String> {
    element_by_id(document, &config.search_input_id)?
        .dyn_into::<HtmlInputElement>()
        .map_err(|_| format!("元素 #{} 不是输入框", config.search_input_id))
}

/// 所有主题复选框；非输入框节点会被跳过
pub fn topic_checkboxes(
    document: &Document,
    config: &FilterConfig,
) -> Result<Vec<HtmlInputElement>, String> {
    let nodes = document
        .query_selector_all(&config.topic_checkbox_selector)
        .map_err(|e| format!("无效的选择器 '{}': {:?}", config.topic_checkbox_selector, e))?;

    Ok((0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<HtmlInputElement>().ok())
        .collect())
}

type Listener = Closure<dyn FnMut(Event)>;

/// 已注册的事件监听器，释放前需调用 `detach`
pub struct DomBinding {
    listeners: Vec<(HtmlInputElement, &'static str, Listener)>,
}

impl DomBinding {
    /// 为搜索框和主题复选框注册监听器，事件转发给控制器
    pub fn attach(
        controller: &Rc<FilterController<BrowserScheduler>>,
        search: HtmlInputElement,
        checkboxes: Vec<HtmlInputElement>,
    ) -> Result<Self, String> {
        let mut binding = Self { listeners: Vec::new() };

        let input_controller = controller.clone();
        let input_element = search.clone();
        let on_input = Closure::wrap(Box::new(move |_event: Event| {
            input_controller.on_search_input(&input_element.value());
        }) as Box<dyn FnMut(_)>);
        binding.listen(search, "input", on_input)?;

        for checkbox in checkboxes {
            let toggle_controller = controller.clone();
            let toggle_element = checkbox.clone();
            let on_change = Closure::wrap(Box::new(move |_event: Event| {
                toggle_controller
                    .on_topic_toggle(&toggle_element.value(), toggle_element.checked());
            }) as Box<dyn FnMut(_)>);
            binding.listen(checkbox, "change", on_change)?;
        }

        Ok(binding)
    }

    fn listen(
        &mut self,
        element: HtmlInputElement,
        event: &'static str,
        listener: Listener,
    ) -> Result<(), String> {
        element
            .add_event_listener_with_callback(event, listener.as_ref().unchecked_ref())
            .map_err(|e| format!("注册 {} 监听器失败: {:?}", event, e))?;
        self.listeners.push((element, event, listener));
        Ok(())
    }

    /// 移除所有监听器
    pub fn detach(&mut self) {
        for (element, event, listener) in self.listeners.drain(..) {
            let _ = element
                .remove_event_listener_with_callback(event, listener.as_ref().unchecked_ref());
        }
    }
}

impl Drop for DomBinding {
    fn drop(&mut self) {
        self.detach();
    }
}
