//! Deferred task queue
//!
//! Host-state mutations that must not run inside the current event dispatch
//! (caret restores, viewport restores, key replay) are posted here and run
//! later, on the same thread, in posting order.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

type Task = Box<dyn FnOnce()>;

/// Single-threaded FIFO of deferred tasks
///
/// Cloning yields another handle to the same queue.
#[derive(Clone, Default)]
pub struct EventLoop {
    queue: Rc<RefCell<VecDeque<Task>>>,
}

impl std::fmt::Debug for EventLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLoop")
            .field("pending", &self.pending())
            .finish()
    }
}

impl EventLoop {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `task` behind everything already posted
    pub fn post(&self, task: impl FnOnce() + 'static) {
        self.queue.borrow_mut().push_back(Box::new(task));
    }

    /// Run queued tasks until the queue is empty, including tasks posted by
    /// the tasks themselves. Returns how many ran.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        loop {
            let next = self.queue.borrow_mut().pop_front();
            match next {
                Some(task) => {
                    task();
                    ran += 1;
                }
                None => return ran,
            }
        }
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }
}
