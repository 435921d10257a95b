//! Process-wide environment access.
//!
//! All reads and writes go through one mutex so token and configuration
//! lookups never race with tests that rewrite the environment.

use std::env;
use std::ffi::OsStr;
use std::sync::{Mutex, MutexGuard, PoisonError};

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Set an environment variable while holding the global lock.
pub fn set_var<K: AsRef<OsStr>, V: AsRef<OsStr>>(key: K, value: V) {
    let _guard = lock();
    // SAFETY: the mutex serialises access to the unsynchronised std env calls.
    unsafe { env::set_var(key, value) };
}

/// Remove an environment variable while holding the global lock.
pub fn remove_var<K: AsRef<OsStr>>(key: K) {
    let _guard = lock();
    // SAFETY: the mutex serialises access to the unsynchronised std env calls.
    unsafe { env::remove_var(key) };
}

/// Read an environment variable while holding the global lock.
///
/// # Errors
///
/// Returns [`env::VarError`] when the variable is unset or contains invalid
/// Unicode.
pub fn var<K: AsRef<OsStr>>(key: K) -> Result<String, env::VarError> {
    let _guard = lock();
    env::var(key)
}

/// Read a variable, treating unset and empty values alike.
#[must_use]
pub fn non_empty_var<K: AsRef<OsStr>>(key: K) -> Option<String> {
    var(key).ok().filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn set_var_round_trip() {
        let key = "YTK_ENV_HELPER_TEST";
        let old = var(key).ok();
        set_var(key, "helper-value");
        assert_eq!(var(key).expect("read var"), "helper-value");
        match old {
            Some(value) => set_var(key, value),
            None => remove_var(key),
        }
    }

    #[test]
    #[serial]
    fn empty_values_read_as_unset() {
        let key = "YTK_ENV_HELPER_EMPTY";
        set_var(key, "");
        assert_eq!(non_empty_var(key), None);
        remove_var(key);
        assert_eq!(non_empty_var(key), None);
    }
}
