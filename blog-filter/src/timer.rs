use gloo_timers::callback::Timeout;
use std::cell::RefCell;
use std::rc::Rc;

/// 延迟执行的任务
pub type Task = Box<dyn FnOnce()>;

/// 可取消的定时器
pub trait Scheduler {
    type Handle;

    /// 在 `delay_ms` 毫秒后执行 `action`
    fn schedule(&self, delay_ms: u32, action: Task) -> Self::Handle;

    /// 取消尚未触发的任务；对已触发的任务无效果
    fn cancel(&self, handle: Self::Handle);
}

/// 浏览器定时器，基于 `setTimeout`
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    type Handle = Timeout;

    fn schedule(&self, delay_ms: u32, action: Task) -> Timeout {
        Timeout::new(delay_ms, move || action())
    }

    fn cancel(&self, handle: Timeout) {
        // 取消后返回的回调随之释放
        drop(handle.cancel());
    }
}

struct PendingTask {
    id: u64,
    due_ms: u64,
    action: Task,
}

#[derive(Default)]
struct ManualClock {
    now_ms: u64,
    next_id: u64,
    tasks: Vec<PendingTask>,
}

/// 手动推进的虚拟时钟，用于在非浏览器环境中驱动防抖逻辑
#[derive(Clone, Default)]
pub struct ManualScheduler {
    clock: Rc<RefCell<ManualClock>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前虚拟时间（毫秒）
    pub fn now_ms(&self) -> u64 {
        self.clock.borrow().now_ms
    }

    /// 尚未触发的任务数
    pub fn pending(&self) -> usize {
        self.clock.borrow().tasks.len()
    }

    /// 推进时间并按到期顺序执行任务
    ///
    /// 任务执行期间不持有时钟借用，任务内部可以继续调度或取消。
    pub fn advance(&self, ms: u64) {
        let target = self.clock.borrow().now_ms + ms;

        loop {
            let next = {
                let mut clock = self.clock.borrow_mut();
                let due = clock
                    .tasks
                    .iter()
                    .enumerate()
                    .filter(|(_, task)| task.due_ms <= target)
                    .min_by_key(|(_, task)| (task.due_ms, task.id))
                    .map(|(index, _)| index);

                due.map(|index| {
                    let task = clock.tasks.remove(index);
                    clock.now_ms = task.due_ms;
                    task.action
                })
            };

            match next {
                Some(action) => action(),
                None => break,
            }
        }

        self.clock.borrow_mut().now_ms = target;
    }
}

impl Scheduler for ManualScheduler {
    type Handle = u64;

    fn schedule(&self, delay_ms: u32, action: Task) -> u64 {
        let mut clock = self.clock.borrow_mut();
        let id = clock.next_id;
        clock.next_id += 1;
        let due_ms = clock.now_ms + u64::from(delay_ms);
        clock.tasks.push(PendingTask { id, due_ms, action });
        id
    }

    fn cancel(&self, handle: u64) {
        self.clock.borrow_mut().tasks.retain(|task| task.id != handle);
    }
}
