//! Lock-free memoisation for immutable values.
//!
//! A computation cached here may run more than once when several threads
//! race on an empty cell. The first result to be published wins and every
//! later result is dropped, so the computation must be pure.

use core::{
    ptr,
    sync::atomic::{AtomicPtr, AtomicU8, Ordering},
};

/// A cell that is written at most once and never invalidated.
pub(crate) struct Memo<T> {
    ptr: AtomicPtr<T>,
}

// SAFETY: A `Memo<T>` owns its boxed value like a `Box<T>` does, and
// publishes it with release/acquire ordering.
unsafe impl<T: Send> Send for Memo<T> {}
// SAFETY: Shared access only hands out `&T`, and a value may be computed on
// one thread and dropped on another.
unsafe impl<T: Send + Sync> Sync for Memo<T> {}

impl<T> Memo<T> {
    pub(crate) const fn new() -> Self {
        Self {
            ptr: AtomicPtr::new(ptr::null_mut()),
        }
    }

    pub(crate) fn get(&self) -> Option<&T> {
        let p = self.ptr.load(Ordering::Acquire);
        // SAFETY: A non-null pointer was published by `get_or_init` from a
        // leaked box and is only freed in `drop`, which takes `&mut self`.
        unsafe { p.as_ref() }
    }

    /// Returns the cached value, computing and publishing it if absent.
    pub(crate) fn get_or_init(&self, f: impl FnOnce() -> T) -> &T {
        if let Some(value) = self.get() {
            return value;
        }

        let new = Box::into_raw(Box::new(f()));
        match self
            .ptr
            .compare_exchange(ptr::null_mut(), new, Ordering::AcqRel, Ordering::Acquire)
        {
            // SAFETY: `new` is now owned by the cell and lives as long as `self`.
            Ok(_) => unsafe { &*new },
            Err(existing) => {
                // SAFETY: `new` was never shared, so we still own it.
                drop(unsafe { Box::from_raw(new) });
                // SAFETY: Same as in `get`.
                unsafe { &*existing }
            }
        }
    }
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for Memo<T> {
    fn clone(&self) -> Self {
        let memo = Self::new();
        if let Some(value) = self.get() {
            memo.ptr
                .store(Box::into_raw(Box::new(value.clone())), Ordering::Release);
        }
        memo
    }
}

impl<T> Drop for Memo<T> {
    fn drop(&mut self) {
        let p = *self.ptr.get_mut();
        if !p.is_null() {
            // SAFETY: We have exclusive access and the pointer came from `Box::into_raw`.
            drop(unsafe { Box::from_raw(p) });
        }
    }
}

const UNKNOWN: u8 = 0;
const FALSE: u8 = 1;
const TRUE: u8 = 2;

/// A memoised boolean.
pub(crate) struct Flag(AtomicU8);

impl Flag {
    pub(crate) const fn new() -> Self {
        Self(AtomicU8::new(UNKNOWN))
    }

    pub(crate) fn get_or_init(&self, f: impl FnOnce() -> bool) -> bool {
        match self.0.load(Ordering::Relaxed) {
            TRUE => true,
            FALSE => false,
            _ => {
                let value = f();
                self.set(value);
                value
            }
        }
    }

    pub(crate) fn set(&self, value: bool) {
        self.0
            .store(if value { TRUE } else { FALSE }, Ordering::Relaxed);
    }
}

impl Clone for Flag {
    fn clone(&self) -> Self {
        Self(AtomicU8::new(self.0.load(Ordering::Relaxed)))
    }
}

/// The memoised derived data of a URI reference whose normal form has type `N`.
pub(crate) struct Cache<N> {
    pub(crate) string: Memo<String>,
    pub(crate) normal: Memo<N>,
    pub(crate) is_normal: Flag,
}

impl<N> Cache<N> {
    pub(crate) const fn new() -> Self {
        Self {
            string: Memo::new(),
            normal: Memo::new(),
            is_normal: Flag::new(),
        }
    }
}

impl<N> Default for Cache<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> Clone for Cache<N> {
    // The normal form is left behind to keep clones shallow.
    fn clone(&self) -> Self {
        Self {
            string: self.string.clone(),
            normal: Memo::new(),
            is_normal: self.is_normal.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    #[test]
    fn memo_publishes_first_value() {
        let memo = Memo::new();
        assert!(memo.get().is_none());
        assert_eq!(memo.get_or_init(|| String::from("a")), "a");
        assert_eq!(memo.get_or_init(|| String::from("b")), "a");
        assert_eq!(memo.clone().get().map(String::as_str), Some("a"));
    }

    #[test]
    fn memo_races_agree() {
        let memo = Arc::new(Memo::new());
        let runs = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let memo = Arc::clone(&memo);
                let runs = Arc::clone(&runs);
                std::thread::spawn(move || {
                    memo.get_or_init(|| {
                        runs.fetch_add(1, Ordering::Relaxed);
                        vec![1, 2, 3]
                    })
                    .clone()
                })
            })
            .collect();

        for h in handles {
            assert_eq!(h.join().unwrap(), [1, 2, 3]);
        }
        assert!(runs.load(Ordering::Relaxed) >= 1);
        assert_eq!(memo.get().unwrap(), &[1, 2, 3]);
    }

    #[test]
    fn flag() {
        let flag = Flag::new();
        assert!(flag.get_or_init(|| true));
        assert!(flag.get_or_init(|| false));
        let flag = Flag::new();
        assert!(!flag.get_or_init(|| false));
        assert!(!flag.clone().get_or_init(|| true));
    }
}
