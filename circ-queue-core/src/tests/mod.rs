mod queue;

use alloc::{rc::Rc, vec::Vec};
use core::cell::RefCell;

/// Value that records its id in a shared log when dropped.
#[derive(Debug)]
pub(crate) struct Tracked {
    pub(crate) id: u32,
    log: Rc<RefCell<Vec<u32>>>,
}

impl Tracked {
    pub(crate) fn new(id: u32, log: &Rc<RefCell<Vec<u32>>>) -> Self {
        Self {
            id,
            log: Rc::clone(log),
        }
    }
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            log: Rc::clone(&self.log),
        }
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.log.borrow_mut().push(self.id);
    }
}

/// Sorted copy of the drop log.
pub(crate) fn dropped(log: &Rc<RefCell<Vec<u32>>>) -> Vec<u32> {
    let mut ids = log.borrow().clone();
    ids.sort_unstable();
    ids
}
