use super::*;

use crate::platform::RuntimeScheduler;
use std::sync::atomic::AtomicUsize;

#[derive(Default)]
struct CountingScheduler {
    requests: AtomicUsize,
}

impl RuntimeScheduler for CountingScheduler {
    fn schedule_frame(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }
}

fn runtime() -> (Runtime, Arc<CountingScheduler>) {
    let scheduler = Arc::new(CountingScheduler::default());
    (Runtime::new(scheduler.clone()), scheduler)
}

#[test]
fn frame_callbacks_run_once_with_frame_time() {
    let (runtime, scheduler) = runtime();
    let seen = Rc::new(Cell::new(0u64));
    let registration = {
        let seen = Rc::clone(&seen);
        runtime
            .frame_clock()
            .with_frame_nanos(move |time| seen.set(time))
    };

    assert!(registration.is_active());
    assert!(runtime.needs_frame());
    assert_eq!(scheduler.requests.load(Ordering::SeqCst), 1);

    runtime.drain_frame_callbacks(16_000_000);
    assert_eq!(seen.get(), 16_000_000);

    runtime.drain_frame_callbacks(32_000_000);
    assert_eq!(seen.get(), 16_000_000, "callback must not run twice");
    assert!(!runtime.needs_frame());
}

#[test]
fn dropping_registration_cancels_callback() {
    let (runtime, _) = runtime();
    let fired = Rc::new(Cell::new(false));
    let registration = {
        let fired = Rc::clone(&fired);
        runtime
            .frame_clock()
            .with_frame_nanos(move |_| fired.set(true))
    };
    drop(registration);

    assert!(!runtime.has_frame_callbacks());
    runtime.drain_frame_callbacks(1_000_000);
    assert!(!fired.get());
}

#[test]
fn main_tasks_wait_for_drain() {
    let (runtime, _) = runtime();
    let handle = runtime.handle();
    let order = Rc::new(RefCell::new(Vec::new()));

    {
        let order = Rc::clone(&order);
        let inner_handle = handle.clone();
        handle.post_main(move || {
            order.borrow_mut().push("first");
            let order = Rc::clone(&order);
            inner_handle.post_main(move || order.borrow_mut().push("nested"));
        });
    }

    assert!(order.borrow().is_empty());
    assert!(runtime.has_pending_main_tasks());

    let executed = runtime.drain_main_tasks();
    assert_eq!(executed, 2);
    assert_eq!(order.borrow().as_slice(), &["first", "nested"]);
    assert!(!runtime.has_pending_main_tasks());
}

#[test]
fn dispatcher_posts_from_other_threads() {
    let (runtime, _) = runtime();
    let dispatcher = runtime.handle().dispatcher();
    let counter = Arc::new(AtomicUsize::new(0));

    let worker = {
        let counter = Arc::clone(&counter);
        std::thread::spawn(move || {
            dispatcher.post(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        })
    };
    worker.join().expect("worker thread finished");

    assert!(runtime.has_pending_main_tasks());
    assert_eq!(counter.load(Ordering::SeqCst), 0);
    runtime.drain_main_tasks();
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[test]
fn handle_outliving_runtime_is_inert() {
    let (runtime, _) = runtime();
    let handle = runtime.handle();
    let clock = handle.frame_clock();
    drop(runtime);

    assert!(!handle.is_alive());
    handle.post_main(|| panic!("task must never run"));
    let registration = clock.with_frame_nanos(|_| panic!("callback must never run"));
    assert!(!registration.is_active());
}
