//! Output tracking for nullable infrastructure wrappers.
//!
//! A component that wants to be observable in tests holds an
//! [`OutputListener`] and emits every output through it. Tests call
//! `track()` to receive an [`OutputTracker`] which records all outputs
//! emitted while it is alive. When no tracker is attached, emitting is
//! practically free.

use std::{
    cell::RefCell,
    rc::{Rc, Weak},
    sync::{Arc, Mutex, Weak as WeakMt},
};

pub struct OutputListener<T: Clone> {
    trackers: RefCell<Vec<Weak<OutputTracker<T>>>>,
}

impl<T: Clone> OutputListener<T> {
    pub fn new() -> Self {
        Self {
            trackers: RefCell::new(Vec::new()),
        }
    }

    pub fn track(&self) -> Rc<OutputTracker<T>> {
        let tracker = Rc::new(OutputTracker::new());
        self.trackers.borrow_mut().push(Rc::downgrade(&tracker));
        tracker
    }

    pub fn is_tracked(&self) -> bool {
        self.trackers.borrow().iter().any(|t| t.strong_count() > 0)
    }

    pub fn emit(&self, output: T) {
        let mut trackers = self.trackers.borrow_mut();
        trackers.retain(|t| {
            if let Some(tracker) = t.upgrade() {
                tracker.add(output.clone());
                true
            } else {
                false
            }
        });
    }

    pub fn tracker_count(&self) -> usize {
        self.trackers.borrow().len()
    }
}

impl<T: Clone> Default for OutputListener<T> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct OutputTracker<T: Clone> {
    output: RefCell<Vec<T>>,
}

impl<T: Clone> OutputTracker<T> {
    fn new() -> Self {
        Self {
            output: RefCell::new(Vec::new()),
        }
    }

    fn add(&self, t: T) {
        self.output.borrow_mut().push(t);
    }

    pub fn output(&self) -> Vec<T> {
        self.output.borrow().clone()
    }

    pub fn clear(&self) {
        self.output.borrow_mut().clear();
    }
}

/// Thread safe variant of [`OutputListener`]
pub struct OutputListenerMt<T: Clone> {
    trackers: Mutex<Vec<WeakMt<OutputTrackerMt<T>>>>,
}

impl<T: Clone> OutputListenerMt<T> {
    pub fn new() -> Self {
        Self {
            trackers: Mutex::new(Vec::new()),
        }
    }

    pub fn track(&self) -> Arc<OutputTrackerMt<T>> {
        let tracker = Arc::new(OutputTrackerMt::new());
        self.trackers.lock().unwrap().push(Arc::downgrade(&tracker));
        tracker
    }

    pub fn is_tracked(&self) -> bool {
        self.trackers
            .lock()
            .unwrap()
            .iter()
            .any(|t| t.strong_count() > 0)
    }

    pub fn emit(&self, output: T) {
        let mut trackers = self.trackers.lock().unwrap();
        trackers.retain(|t| {
            if let Some(tracker) = t.upgrade() {
                tracker.add(output.clone());
                true
            } else {
                false
            }
        });
    }

    pub fn tracker_count(&self) -> usize {
        self.trackers.lock().unwrap().len()
    }
}

impl<T: Clone> Default for OutputListenerMt<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread safe variant of [`OutputTracker`]
pub struct OutputTrackerMt<T: Clone> {
    output: Mutex<Vec<T>>,
}

impl<T: Clone> OutputTrackerMt<T> {
    fn new() -> Self {
        Self {
            output: Mutex::new(Vec::new()),
        }
    }

    fn add(&self, t: T) {
        self.output.lock().unwrap().push(t);
    }

    pub fn output(&self) -> Vec<T> {
        self.output.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.output.lock().unwrap().clear();
    }
}
