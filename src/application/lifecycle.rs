use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::errors::*;
use crate::utils::object_pool::ObjectPool;

impl_handle!(LifecycleListenerHandle);

/// Hooks that get executed in a pre-determined order around the update routine of
/// application.
pub trait LifecycleListener {
    fn on_pre_update(&mut self) -> Result<()> {
        Ok(())
    }

    fn on_update(&mut self) -> Result<()> {
        Ok(())
    }

    fn on_post_update(&mut self) -> Result<()> {
        Ok(())
    }

    fn on_exit(&mut self) -> Result<()> {
        Ok(())
    }
}

type SharedListener = Rc<RefCell<dyn LifecycleListener>>;

/// Attached listeners. Freed indices get reused by the pool, so every listener also
/// carries the sequence number it was attached with, which decides the dispatch order.
pub struct LifecycleSystem {
    last_frame_lifecycles: RefCell<Vec<SharedListener>>,
    lifecycles: RefCell<ObjectPool<LifecycleListenerHandle, (u64, SharedListener)>>,
    sequence: Cell<u64>,
}

impl LifecycleSystem {
    pub fn new() -> Self {
        LifecycleSystem {
            last_frame_lifecycles: RefCell::new(Vec::new()),
            lifecycles: RefCell::new(ObjectPool::new()),
            sequence: Cell::new(0),
        }
    }

    /// Attaches a listener. A handle turns stale once its listener has been detached,
    /// even if the index gets reused.
    pub fn attach<T>(&self, lis: T) -> LifecycleListenerHandle
    where
        T: LifecycleListener + 'static,
    {
        let listener: SharedListener = Rc::new(RefCell::new(lis));
        let sequence = self.sequence.get();
        self.sequence.set(sequence + 1);

        self.lifecycles.borrow_mut().create((sequence, listener))
    }

    /// Removes the listener. Returns false if the handle is stale.
    #[inline]
    pub fn detach(&self, handle: LifecycleListenerHandle) -> bool {
        self.lifecycles.borrow_mut().free(handle).is_some()
    }

    #[inline]
    pub fn is_attached(&self, handle: LifecycleListenerHandle) -> bool {
        self.lifecycles.borrow().is_alive(handle)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.lifecycles.borrow().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Invokes `func` on every listener in attaching order.
    ///
    /// Listeners are collected before any of them is invoked, so attaching or
    /// detaching inside `func` takes effect on the next call.
    #[inline]
    pub fn foreach<T>(&self, func: T) -> Result<()>
    where
        T: Fn(&mut dyn LifecycleListener) -> Result<()>,
    {
        self.execute(func, false)
    }

    /// Invokes `func` on every listener in reversed attaching order.
    #[inline]
    pub fn foreach_rev<T>(&self, func: T) -> Result<()>
    where
        T: Fn(&mut dyn LifecycleListener) -> Result<()>,
    {
        self.execute(func, true)
    }

    fn execute<T>(&self, func: T, rev: bool) -> Result<()>
    where
        T: Fn(&mut dyn LifecycleListener) -> Result<()>,
    {
        let mut last_frame_lifecycles = match self.last_frame_lifecycles.try_borrow_mut() {
            Ok(v) => v,
            Err(_) => bail!("Lifecycle listeners can not be dispatched recursively."),
        };

        {
            let lifecycles = self.lifecycles.borrow();
            let mut order: Vec<_> = lifecycles.values().cloned().collect();

            order.sort_by_key(|v| v.0);
            if rev {
                order.reverse();
            }

            last_frame_lifecycles.extend(order.into_iter().map(|v| v.1));
        }

        let mut result = Ok(());
        for v in last_frame_lifecycles.iter() {
            result = func(&mut *v.borrow_mut());
            if result.is_err() {
                break;
            }
        }

        last_frame_lifecycles.clear();
        result
    }
}

impl Default for LifecycleSystem {
    fn default() -> Self {
        LifecycleSystem::new()
    }
}
