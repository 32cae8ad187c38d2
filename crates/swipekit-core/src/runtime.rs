use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::ThreadId;

use crate::frame_clock::FrameClock;
use crate::platform::RuntimeScheduler;
use crate::FrameCallbackId;

type SendTask = Box<dyn FnOnce() + Send + 'static>;
type LocalTask = Box<dyn FnOnce() + 'static>;
type FrameCallback = Box<dyn FnOnce(u64) + 'static>;

struct MainDispatcherInner {
    scheduler: Arc<dyn RuntimeScheduler>,
    tx: mpsc::Sender<SendTask>,
    pending: AtomicUsize,
}

impl MainDispatcherInner {
    fn post(&self, task: SendTask) {
        self.pending.fetch_add(1, Ordering::SeqCst);
        if self.tx.send(task).is_err() {
            // Runtime is gone; nobody will drain this task.
            self.pending.fetch_sub(1, Ordering::SeqCst);
            return;
        }
        self.scheduler.schedule_frame();
    }

    fn has_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst) > 0
    }
}

struct PendingGuard<'a> {
    counter: &'a AtomicUsize,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        let previous = self.counter.fetch_sub(1, Ordering::SeqCst);
        debug_assert!(previous > 0, "main dispatcher pending count underflowed");
    }
}

/// Thread-safe handle for posting work onto the runtime's main context.
///
/// Tasks run the next time the host calls [`Runtime::drain_main_tasks`].
#[derive(Clone)]
pub struct MainDispatcher {
    inner: Arc<MainDispatcherInner>,
}

impl MainDispatcher {
    pub fn post(&self, task: impl FnOnce() + Send + 'static) {
        self.inner.post(Box::new(task));
    }

    pub fn has_pending(&self) -> bool {
        self.inner.has_pending()
    }
}

impl std::fmt::Debug for MainDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MainDispatcher")
            .field("pending", &self.inner.pending.load(Ordering::SeqCst))
            .finish()
    }
}

struct FrameCallbackEntry {
    id: FrameCallbackId,
    callback: Option<FrameCallback>,
}

struct RuntimeInner {
    scheduler: Arc<dyn RuntimeScheduler>,
    needs_frame: Cell<bool>,
    frame_callbacks: RefCell<VecDeque<FrameCallbackEntry>>,
    next_frame_callback_id: Cell<u64>,
    dispatcher: Arc<MainDispatcherInner>,
    main_rx: RefCell<mpsc::Receiver<SendTask>>,
    local_tasks: RefCell<VecDeque<LocalTask>>,
    main_thread_id: ThreadId,
}

impl RuntimeInner {
    fn new(scheduler: Arc<dyn RuntimeScheduler>) -> Self {
        let (tx, rx) = mpsc::channel();
        let dispatcher = Arc::new(MainDispatcherInner {
            scheduler: scheduler.clone(),
            tx,
            pending: AtomicUsize::new(0),
        });
        Self {
            scheduler,
            needs_frame: Cell::new(false),
            frame_callbacks: RefCell::new(VecDeque::new()),
            next_frame_callback_id: Cell::new(1),
            dispatcher,
            main_rx: RefCell::new(rx),
            local_tasks: RefCell::new(VecDeque::new()),
            main_thread_id: std::thread::current().id(),
        }
    }

    fn schedule(&self) {
        self.needs_frame.set(true);
        self.scheduler.schedule_frame();
    }

    fn register_frame_callback(&self, callback: FrameCallback) -> FrameCallbackId {
        let id = self.next_frame_callback_id.get();
        self.next_frame_callback_id.set(id + 1);
        self.frame_callbacks
            .borrow_mut()
            .push_back(FrameCallbackEntry {
                id,
                callback: Some(callback),
            });
        self.schedule();
        id
    }

    fn cancel_frame_callback(&self, id: FrameCallbackId) {
        // Cancellation can happen while a drain is running callbacks; in that
        // case the entry has already been taken out of the queue.
        let Ok(mut callbacks) = self.frame_callbacks.try_borrow_mut() else {
            return;
        };
        if let Some(index) = callbacks.iter().position(|entry| entry.id == id) {
            callbacks.remove(index);
        }
        let callbacks_empty = callbacks.is_empty();
        drop(callbacks);
        if callbacks_empty && !self.has_pending_main() {
            self.needs_frame.set(false);
        }
    }

    fn has_frame_callbacks(&self) -> bool {
        self.frame_callbacks
            .try_borrow()
            .map(|callbacks| !callbacks.is_empty())
            .unwrap_or(true)
    }

    fn drain_frame_callbacks(&self, frame_time_nanos: u64) {
        let pending: Vec<FrameCallback> = {
            let mut callbacks = self.frame_callbacks.borrow_mut();
            callbacks
                .drain(..)
                .filter_map(|mut entry| entry.callback.take())
                .collect()
        };
        log::trace!(
            "draining {} frame callbacks at {}ns",
            pending.len(),
            frame_time_nanos
        );
        for callback in pending {
            callback(frame_time_nanos);
        }
        if !self.has_frame_callbacks() && !self.has_pending_main() {
            self.needs_frame.set(false);
        }
    }

    fn enqueue_main_task(&self, task: LocalTask) {
        debug_assert_eq!(
            std::thread::current().id(),
            self.main_thread_id,
            "local main task posted off the runtime thread",
        );
        self.local_tasks.borrow_mut().push_back(task);
        self.schedule();
    }

    fn has_pending_main(&self) -> bool {
        let local_pending = self
            .local_tasks
            .try_borrow()
            .map(|tasks| !tasks.is_empty())
            .unwrap_or(true);
        local_pending || self.dispatcher.has_pending()
    }

    fn drain_main_tasks(&self) -> usize {
        let mut executed = 0;
        loop {
            let mut progressed = false;

            let remote: Vec<SendTask> = self.main_rx.borrow_mut().try_iter().collect();
            for task in remote {
                progressed = true;
                executed += 1;
                let _guard = PendingGuard {
                    counter: &self.dispatcher.pending,
                };
                task();
            }

            loop {
                let task = self.local_tasks.borrow_mut().pop_front();
                match task {
                    Some(task) => {
                        progressed = true;
                        executed += 1;
                        task();
                    }
                    None => break,
                }
            }

            if !progressed {
                break;
            }
        }
        if !self.has_frame_callbacks() && !self.has_pending_main() {
            self.needs_frame.set(false);
        }
        executed
    }
}

/// Owner of the frame-callback queue and the main-context task queue.
///
/// The host calls [`Runtime::drain_frame_callbacks`] once per frame (this is
/// the animation context) and [`Runtime::drain_main_tasks`] afterwards to run
/// application callbacks that animations posted.
#[derive(Clone)]
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

impl Runtime {
    pub fn new(scheduler: Arc<dyn RuntimeScheduler>) -> Self {
        Self {
            inner: Rc::new(RuntimeInner::new(scheduler)),
        }
    }

    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle {
            inner: Rc::downgrade(&self.inner),
            dispatcher: MainDispatcher {
                inner: self.inner.dispatcher.clone(),
            },
        }
    }

    pub fn frame_clock(&self) -> FrameClock {
        FrameClock::new(self.handle())
    }

    pub fn needs_frame(&self) -> bool {
        self.inner.needs_frame.get()
    }

    pub fn has_frame_callbacks(&self) -> bool {
        self.inner.has_frame_callbacks()
    }

    pub fn has_pending_main_tasks(&self) -> bool {
        self.inner.has_pending_main()
    }

    pub fn drain_frame_callbacks(&self, frame_time_nanos: u64) {
        self.inner.drain_frame_callbacks(frame_time_nanos);
    }

    /// Runs every queued main-context task, including tasks posted by the
    /// tasks themselves. Returns how many ran.
    pub fn drain_main_tasks(&self) -> usize {
        self.inner.drain_main_tasks()
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("needs_frame", &self.inner.needs_frame.get())
            .finish()
    }
}

/// Weak handle to a [`Runtime`], cheap to clone into engines.
///
/// Every operation degrades to a no-op once the runtime is dropped.
#[derive(Clone)]
pub struct RuntimeHandle {
    inner: Weak<RuntimeInner>,
    dispatcher: MainDispatcher,
}

impl RuntimeHandle {
    pub fn frame_clock(&self) -> FrameClock {
        FrameClock::new(self.clone())
    }

    pub fn dispatcher(&self) -> MainDispatcher {
        self.dispatcher.clone()
    }

    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    /// Queues `task` on the main context. The task may capture `Rc` values
    /// because it never leaves the runtime thread.
    pub fn post_main(&self, task: impl FnOnce() + 'static) {
        match self.inner.upgrade() {
            Some(inner) => inner.enqueue_main_task(Box::new(task)),
            None => log::debug!("dropping main task posted after runtime shutdown"),
        }
    }

    pub(crate) fn register_frame_callback(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> Option<FrameCallbackId> {
        self.inner
            .upgrade()
            .map(|inner| inner.register_frame_callback(Box::new(callback)))
    }

    pub(crate) fn cancel_frame_callback(&self, id: FrameCallbackId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.cancel_frame_callback(id);
        }
    }
}

impl std::fmt::Debug for RuntimeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
