use std::cell::RefCell;
use std::rc::Rc;

use crate::config::{FilterConfig, RenderOptions};
use crate::filter::FilterState;
use crate::render::{render_into, OutputRegion};
use crate::store::PostStore;
use crate::timer::Scheduler;

/// 重新计算时需要的全部状态，定时任务通过弱引用访问
struct FilterView {
    store: Rc<PostStore>,
    state: FilterState,
    output: Box<dyn OutputRegion>,
    options: RenderOptions,
    visible_ids: Vec<u32>,
    renders: usize,
    scheduled: bool,
}

impl FilterView {
    fn recompute(&mut self) {
        let visible = self.store.filter(&self.state);
        self.visible_ids = visible.iter().map(|post| post.id).collect();
        render_into(self.output.as_mut(), &visible, &self.state.search_term, &self.options);
        self.renders += 1;
    }
}

/// 防抖筛选控制器
///
/// 持有搜索词和已选主题，两个事件处理函数更新状态后安排一次延迟重算；
/// 新事件会取消尚未触发的重算，一串连续事件只渲染最后的状态。
/// 同一时刻最多只有一个待执行的定时任务。
pub struct FilterController<S: Scheduler> {
    scheduler: S,
    debounce_ms: u32,
    pending: RefCell<Option<S::Handle>>,
    view: Rc<RefCell<FilterView>>,
}

impl<S: Scheduler> FilterController<S> {
    pub fn new(
        store: Rc<PostStore>,
        output: Box<dyn OutputRegion>,
        scheduler: S,
        config: &FilterConfig,
    ) -> Self {
        Self {
            scheduler,
            debounce_ms: config.debounce_ms,
            pending: RefCell::new(None),
            view: Rc::new(RefCell::new(FilterView {
                store,
                state: FilterState::default(),
                output,
                options: config.render_options(),
                visible_ids: Vec::new(),
                renders: 0,
                scheduled: false,
            })),
        }
    }

    /// 搜索框内容变化
    pub fn on_search_input(&self, value: &str) {
        self.view.borrow_mut().state.search_term = value.to_string();
        self.schedule_recompute();
    }

    /// 主题复选框切换
    pub fn on_topic_toggle(&self, topic: &str, checked: bool) {
        self.view.borrow_mut().state.set_topic(topic, checked);
        self.schedule_recompute();
    }

    /// 立即重算并渲染，不经过防抖；同时取消待执行的重算
    pub fn render_now(&self) {
        self.cancel_pending();
        self.view.borrow_mut().recompute();
    }

    /// 取消尚未触发的重算
    pub fn cancel_pending(&self) {
        if let Some(handle) = self.pending.borrow_mut().take() {
            self.scheduler.cancel(handle);
        }
        self.view.borrow_mut().scheduled = false;
    }

    pub fn has_pending(&self) -> bool {
        self.view.borrow().scheduled
    }

    pub fn state(&self) -> FilterState {
        self.view.borrow().state.clone()
    }

    /// 最近一次渲染的文章 id
    pub fn visible_ids(&self) -> Vec<u32> {
        self.view.borrow().visible_ids.clone()
    }

    pub fn render_count(&self) -> usize {
        self.view.borrow().renders
    }

    pub fn store(&self) -> Rc<PostStore> {
        self.view.borrow().store.clone()
    }

    fn schedule_recompute(&self) {
        self.cancel_pending();

        let view = Rc::downgrade(&self.view);
        let handle = self.scheduler.schedule(
            self.debounce_ms,
            Box::new(move || {
                if let Some(view) = view.upgrade() {
                    let mut view = view.borrow_mut();
                    view.scheduled = false;
                    view.recompute();
                }
            }),
        );

        self.view.borrow_mut().scheduled = true;
        *self.pending.borrow_mut() = Some(handle);
    }
}
