//! Lock selection: `std::sync` by default, `parking_lot` when the
//! `parking-lot` feature is enabled.
//!
//! The helpers exist so the rest of the crate can acquire guards with `?`
//! regardless of whether the underlying lock can poison.

#[cfg(feature = "parking-lot")]
pub(crate) use parking_lot::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
#[cfg(not(feature = "parking-lot"))]
pub(crate) use std::sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::Result;

#[cfg(feature = "parking-lot")]
pub(crate) fn lock<'a, T>(mutex: &'a Mutex<T>) -> Result<MutexGuard<'a, T>> {
    Ok(mutex.lock())
}

#[cfg(not(feature = "parking-lot"))]
pub(crate) fn lock<'a, T>(mutex: &'a Mutex<T>) -> Result<MutexGuard<'a, T>> {
    mutex.lock().map_err(crate::Error::from)
}

#[cfg(feature = "parking-lot")]
pub(crate) fn read<'a, T>(lock: &'a RwLock<T>) -> Result<RwLockReadGuard<'a, T>> {
    Ok(lock.read())
}

#[cfg(not(feature = "parking-lot"))]
pub(crate) fn read<'a, T>(lock: &'a RwLock<T>) -> Result<RwLockReadGuard<'a, T>> {
    lock.read().map_err(crate::Error::from)
}

#[cfg(feature = "parking-lot")]
pub(crate) fn write<'a, T>(lock: &'a RwLock<T>) -> Result<RwLockWriteGuard<'a, T>> {
    Ok(lock.write())
}

#[cfg(not(feature = "parking-lot"))]
pub(crate) fn write<'a, T>(lock: &'a RwLock<T>) -> Result<RwLockWriteGuard<'a, T>> {
    lock.write().map_err(crate::Error::from)
}
