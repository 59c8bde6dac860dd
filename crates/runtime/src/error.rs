//! Runtime Error Handling
//!
//! Provides thread-local error state so the exported entry points can report
//! failures without unwinding across the FFI boundary.
//!
//! # Usage
//!
//! Entry points set an error instead of panicking:
//! ```ignore
//! if let Err(e) = try_compute(n) {
//!     set_runtime_error(format!("fib_try_compute: {}", e));
//!     return 0;
//! }
//! ```
//!
//! Host code checks for errors after a checked call:
//! ```ignore
//! let v = fib_try_compute(n);
//! if fib_has_error() {
//!     let msg = fib_take_error();
//!     // Handle error...
//! }
//! ```

use std::cell::RefCell;
use std::ffi::{CString, c_char};
use std::ptr;

thread_local! {
    /// Thread-local storage for the last runtime error message
    static LAST_ERROR: RefCell<Option<String>> = const { RefCell::new(None) };

    /// Cached C string for FFI access (avoids allocation on every get)
    static ERROR_CSTRING: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Set the last runtime error message
///
/// Note: This clears any cached CString to prevent stale pointer access.
pub fn set_runtime_error(msg: impl Into<String>) {
    ERROR_CSTRING.with(|cs| *cs.borrow_mut() = None);
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = Some(msg.into());
    });
}

/// Take (and clear) the last runtime error message
pub fn take_runtime_error() -> Option<String> {
    LAST_ERROR.with(|e| e.borrow_mut().take())
}

/// Check if there's a pending runtime error
pub fn has_runtime_error() -> bool {
    LAST_ERROR.with(|e| e.borrow().is_some())
}

/// Clear any pending runtime error
pub fn clear_runtime_error() {
    LAST_ERROR.with(|e| *e.borrow_mut() = None);
    ERROR_CSTRING.with(|e| *e.borrow_mut() = None);
}

/// Format a panic payload into an error message
pub fn format_panic_payload(payload: &Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Cache `msg` as a C string and hand out a pointer to the cached copy
fn cache_cstring(msg: &str) -> *const c_char {
    // Replace null bytes with '?' to preserve error content
    let safe_msg: String = msg.chars().map(|c| if c == '\0' { '?' } else { c }).collect();
    let Ok(cstring) = CString::new(safe_msg) else {
        return ptr::null();
    };
    ERROR_CSTRING.with(|cs| {
        let ptr = cstring.as_ptr();
        *cs.borrow_mut() = Some(cstring);
        ptr
    })
}

// FFI-safe error access functions

/// Check if there's a pending runtime error (FFI-safe)
#[unsafe(no_mangle)]
pub extern "C" fn fib_has_error() -> bool {
    has_runtime_error()
}

/// Get the last error message as a C string pointer (FFI-safe)
///
/// Returns null if no error is pending.
///
/// # WARNING: Pointer Lifetime
/// The returned pointer is only valid until the next call to `set_runtime_error`,
/// `get_error`, `take_error`, or `clear_error` on the same thread. Callers must
/// copy the string immediately if they need to retain it.
#[unsafe(no_mangle)]
pub extern "C" fn fib_get_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(msg) => cache_cstring(msg),
        None => ptr::null(),
    })
}

/// Take (and clear) the last error, returning it as a C string (FFI-safe)
///
/// Returns null if no error is pending. Same pointer lifetime as
/// [`fib_get_error`].
#[unsafe(no_mangle)]
pub extern "C" fn fib_take_error() -> *const c_char {
    match take_runtime_error() {
        Some(msg) => cache_cstring(&msg),
        None => ptr::null(),
    }
}

/// Clear any pending error (FFI-safe)
#[unsafe(no_mangle)]
pub extern "C" fn fib_clear_error() {
    clear_runtime_error();
}
