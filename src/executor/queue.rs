//! Unbounded FIFO of pending tasks.
//!
//! The queue does no locking of its own. The pool keeps it inside the same
//! mutex that guards the run flag, and every push/pop happens under that lock.

use super::task::Task;
use std::collections::VecDeque;

#[derive(Debug, Default)]
pub struct TaskQueue {
    tasks: VecDeque<Task>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self {
            tasks: VecDeque::new(),
        }
    }

    pub fn push(&mut self, task: Task) {
        self.tasks.push_back(task);
    }

    pub fn pop(&mut self) -> Option<Task> {
        self.tasks.pop_front()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Detach every pending task, leaving the queue empty.
    pub fn take_all(&mut self) -> VecDeque<Task> {
        std::mem::take(&mut self.tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut queue = TaskQueue::new();
        let tasks: Vec<Task> = (0..5).map(|_| Task::new(|| {})).collect();
        let ids: Vec<_> = tasks.iter().map(|t| t.id()).collect();

        for task in tasks {
            queue.push(task);
        }
        assert_eq!(queue.len(), 5);

        let popped: Vec<_> = std::iter::from_fn(|| queue.pop()).map(|t| t.id()).collect();
        assert_eq!(popped, ids);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_pop_empty() {
        let mut queue = TaskQueue::new();
        assert!(queue.pop().is_none());
    }

    #[test]
    fn test_take_all_empties_queue() {
        let mut queue = TaskQueue::new();
        queue.push(Task::new(|| {}));
        queue.push(Task::new(|| {}));

        let taken = queue.take_all();
        assert_eq!(taken.len(), 2);
        assert!(queue.is_empty());
    }
}
