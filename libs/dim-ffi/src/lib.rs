//! C-compatible entry points, usable from native embedders and from a
//! `wasm32-unknown-unknown` build alike (see `include/dim.h`).
//!
//! The ABI keeps a single implicit engine for compatibility with the C
//! header; embedders that need isolation use `dim_expr::Engine` directly.
//! All buffers are byte-counted UTF-8 with no nul termination. Result
//! buffers from `dim_eval` are owned by the module and must be released
//! with `dim_free`. Failure detail goes to the process's stderr; the
//! return code only distinguishes success from failure.

use dim_expr::Engine;
use once_cell::sync::Lazy;
use std::alloc::{alloc, dealloc, Layout};
use std::sync::Mutex;

static ENGINE: Lazy<Mutex<Engine>> = Lazy::new(|| Mutex::new(Engine::new()));

const OK: i32 = 0;
const ERR: i32 = 1;

/// Read a caller buffer as UTF-8.
///
/// # Safety
/// `ptr` must be valid for `len` bytes when `len > 0`.
unsafe fn read_str<'a>(ptr: *const u8, len: usize) -> Option<&'a str> {
    if len == 0 {
        return Some("");
    }
    if ptr.is_null() {
        return None;
    }
    std::str::from_utf8(std::slice::from_raw_parts(ptr, len)).ok()
}

/// Hand a string to the caller as a freshly allocated buffer.
unsafe fn write_out(text: String, out_ptr: *mut *mut u8, out_len: *mut usize) {
    let bytes = text.into_bytes().into_boxed_slice();
    let len = bytes.len();
    if len == 0 {
        *out_ptr = std::ptr::null_mut();
        *out_len = 0;
        return;
    }
    *out_ptr = Box::into_raw(bytes) as *mut u8;
    *out_len = len;
}

/// Evaluate an expression string.
///
/// # Safety
/// `input_ptr` must be valid for `input_len` bytes; `out_ptr` and
/// `out_len` must be valid for writes.
#[no_mangle]
pub unsafe extern "C" fn dim_eval(
    input_ptr: *const u8,
    input_len: usize,
    out_ptr: *mut *mut u8,
    out_len: *mut usize,
) -> i32 {
    if out_ptr.is_null() || out_len.is_null() {
        return ERR;
    }
    *out_ptr = std::ptr::null_mut();
    *out_len = 0;

    let Some(input) = read_str(input_ptr, input_len) else {
        return ERR;
    };
    let Ok(mut engine) = ENGINE.lock() else {
        return ERR;
    };
    match engine.eval(input) {
        Ok(output) => {
            write_out(output, out_ptr, out_len);
            OK
        }
        Err(err) => {
            eprintln!("{}", err.report());
            ERR
        }
    }
}

/// Define a constant from an expression.
///
/// # Safety
/// `name_ptr` and `expr_ptr` must be valid for their lengths.
#[no_mangle]
pub unsafe extern "C" fn dim_define(
    name_ptr: *const u8,
    name_len: usize,
    expr_ptr: *const u8,
    expr_len: usize,
) -> i32 {
    let (Some(name), Some(expr)) = (read_str(name_ptr, name_len), read_str(expr_ptr, expr_len))
    else {
        return ERR;
    };
    let Ok(mut engine) = ENGINE.lock() else {
        return ERR;
    };
    match engine.define(name, expr) {
        Ok(()) => OK,
        Err(err) => {
            eprintln!("{}", err.report());
            ERR
        }
    }
}

/// Remove one constant by name.
///
/// # Safety
/// `name_ptr` must be valid for `name_len` bytes.
#[no_mangle]
pub unsafe extern "C" fn dim_clear(name_ptr: *const u8, name_len: usize) {
    let Some(name) = read_str(name_ptr, name_len) else {
        return;
    };
    if let Ok(mut engine) = ENGINE.lock() {
        engine.clear(name);
    }
}

/// Remove every constant.
#[no_mangle]
pub extern "C" fn dim_clear_all() {
    if let Ok(mut engine) = ENGINE.lock() {
        engine.clear_all();
    }
}

/// Allocate `n` bytes of scratch space for the caller.
#[no_mangle]
pub extern "C" fn dim_alloc(n: usize) -> *mut u8 {
    if n == 0 {
        return std::ptr::NonNull::<u8>::dangling().as_ptr();
    }
    let Ok(layout) = Layout::array::<u8>(n) else {
        return std::ptr::null_mut();
    };
    // Safety: layout has nonzero size.
    unsafe { alloc(layout) }
}

/// Release a buffer from `dim_eval` or `dim_alloc`.
///
/// # Safety
/// `ptr`/`len` must come from this module and be freed exactly once.
#[no_mangle]
pub unsafe extern "C" fn dim_free(ptr: *mut u8, len: usize) {
    if ptr.is_null() || len == 0 {
        return;
    }
    let Ok(layout) = Layout::array::<u8>(len) else {
        return;
    };
    dealloc(ptr, layout);
}
