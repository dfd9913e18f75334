//! Locks for the shared resource pool.
//!
//! GPIO ownership is usually claimed from the main loop while features are brought up, and
//! checked or released again from interrupt handlers. Each pool operation reads an entry and
//! writes it back, so an interrupt landing in between could hand the same pin to two features.
//! [`SharedResourcePool`](crate::resource::SharedResourcePool) runs every operation inside
//! [`SharedMutex::lock`] to rule that out.

/// A lock that can hold a [`ResourcePool`](crate::resource::ResourcePool) shared between
/// interrupt handlers and the main loop, or between threads on a hosted target.
///
/// If the `std` feature is enabled, then `SharedMutex` is implemented for `std::sync::Mutex`. If
/// `cortexm` is enabled, then `SharedMutex` is implemented for
/// `cortex_m::interrupt::Mutex<core::cell::RefCell>` (the `RefCell` is needed to add mutability
/// which the mutex does not provide).
///
/// If either of these features is enabled, then the type alias [`DefaultMutex<T>`] will point to
/// the corresponding mutex type to use. With both enabled, it points at the `std` one.
pub trait SharedMutex<T> {
    /// Construct a new instance of this mutex containing the value `v`.
    fn new(v: T) -> Self;

    /// Lock the mutex and call the closure `f` as a critical section, passing a mutable reference
    /// to the owned value. Returns the value returned by `f`. On Cortex-M the closure runs with
    /// interrupts masked, so keep it short.
    fn lock<R, F: FnOnce(&mut T) -> R>(&self, f: F) -> R;
}

#[cfg(feature = "std")]
pub type DefaultMutex<T> = std::sync::Mutex<T>;

#[cfg(all(feature = "cortexm", not(feature = "std")))]
pub type DefaultMutex<T> = cortex_m::interrupt::Mutex<core::cell::RefCell<T>>;

#[cfg(feature = "std")]
impl<T> SharedMutex<T> for std::sync::Mutex<T> {
    fn new(v: T) -> Self {
        std::sync::Mutex::new(v)
    }
    fn lock<R, F: FnOnce(&mut T) -> R>(&self, f: F) -> R {
        // A poisoned pool is still consistent: every operation completes its entry update
        // before anything that can panic.
        let mut v = match self.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut v)
    }
}

#[cfg(feature = "cortexm")]
impl<T> SharedMutex<T> for cortex_m::interrupt::Mutex<core::cell::RefCell<T>> {
    fn new(v: T) -> Self {
        cortex_m::interrupt::Mutex::new(core::cell::RefCell::new(v))
    }
    fn lock<R, F: FnOnce(&mut T) -> R>(&self, f: F) -> R {
        cortex_m::interrupt::free(|cs| {
            let mut v = self.borrow(cs).borrow_mut();
            f(&mut v)
        })
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use crate::resource::{FeatureId, ResourcePool, SharedResourceId};

    #[test]
    fn default_mutex_guards_pool() {
        let pool = ResourcePool::new().into_shared::<DefaultMutex<_>>();
        pool.acquire(SharedResourceId::Gpio05, FeatureId::AuxDacOut).unwrap();
        let seen = pool.with(|p| {
            let owner = p.feature_get(SharedResourceId::Gpio05);
            p.release(SharedResourceId::Gpio05, FeatureId::AuxDacOut).map(|_| owner)
        });
        assert_eq!(seen, Ok(FeatureId::AuxDacOut));
        assert!(pool.availability_check(SharedResourceId::Gpio05));
    }

    #[test]
    fn lock_gives_mutable_access() {
        let m: DefaultMutex<u8> = SharedMutex::new(1);
        let out = SharedMutex::lock(&m, |v| {
            *v += 1;
            *v * 10
        });
        assert_eq!(out, 20);
        assert_eq!(SharedMutex::lock(&m, |v| *v), 2);
    }
}
