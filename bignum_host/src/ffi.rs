//! C ABI for hosts embedding the facade.
//!
//! Environments and bignums cross the boundary as opaque pointers. Every
//! pointer returned here must go back through its matching `*_free`
//! function. [`bignum_free`] takes the address of the caller's pointer and
//! nulls it, so releasing the same slot twice is harmless.

// FFI functions intentionally take raw pointers and are called from C code.
// The caller is responsible for ensuring pointer validity.
#![allow(clippy::not_unsafe_ptr_arg_deref)]

use std::cmp::Ordering;
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};

use crate::config::FacadeConfig;
use crate::dispatch::BinOp;
use crate::env::Environment;
use crate::error::{BignumResult, ConfigError};
use crate::operand::Operand;
use crate::value::BigNum;

/// Returned by [`bignum_cmp`] when either argument is null or released
pub const BIGNUM_CMP_ERROR: c_int = c_int::MIN;

/// Either a new bignum or an error message; exactly one field is non-null.
#[repr(C)]
#[derive(Debug)]
pub struct CBignumResult {
    pub value: *mut BigNum,
    pub error: *mut c_char,
}

impl CBignumResult {
    fn ok(value: BigNum) -> Self {
        CBignumResult {
            value: Box::into_raw(Box::new(value)),
            error: std::ptr::null_mut(),
        }
    }

    fn error(message: String) -> Self {
        CBignumResult {
            value: std::ptr::null_mut(),
            error: c_string(message),
        }
    }

    fn from_result(result: BignumResult<BigNum>) -> Self {
        match result {
            Ok(value) => Self::ok(value),
            Err(e) => Self::error(e.to_string()),
        }
    }
}

fn binop_from_code(code: c_int) -> Option<BinOp> {
    match code {
        0 => Some(BinOp::Add),
        1 => Some(BinOp::Sub),
        2 => Some(BinOp::Mul),
        3 => Some(BinOp::Div),
        4 => Some(BinOp::Mod),
        5 => Some(BinOp::Pow),
        _ => None,
    }
}

/// Either a new environment or an error message; exactly one field is non-null.
#[repr(C)]
#[derive(Debug)]
pub struct CEnvResult {
    pub env: *mut Environment,
    pub error: *mut c_char,
}

impl CEnvResult {
    fn from_config(config: Result<FacadeConfig, ConfigError>) -> Self {
        match config {
            Ok(config) => CEnvResult {
                env: Box::into_raw(Box::new(Environment::with_config(config))),
                error: std::ptr::null_mut(),
            },
            Err(e) => {
                tracing::warn!(error = %e, "failed to load bignum configuration");
                CEnvResult {
                    env: std::ptr::null_mut(),
                    error: c_string(e.to_string()),
                }
            }
        }
    }
}

fn c_string(text: String) -> *mut c_char {
    CString::new(text)
        .map(|s| s.into_raw())
        .unwrap_or(std::ptr::null_mut())
}

/// Create an environment configured from the process environment.
/// On failure `error` explains why; free it with [`bignum_string_free`].
#[no_mangle]
pub extern "C" fn bignum_env_new() -> CEnvResult {
    CEnvResult::from_config(FacadeConfig::from_env())
}

/// Tear down and free an environment.
#[no_mangle]
pub extern "C" fn bignum_env_free(env: *mut Environment) {
    if !env.is_null() {
        unsafe {
            drop(Box::from_raw(env));
        }
    }
}

/// New bignum holding zero
#[no_mangle]
pub extern "C" fn bignum_new() -> *mut BigNum {
    Box::into_raw(Box::new(BigNum::new()))
}

/// Parse signed decimal text.
#[no_mangle]
pub extern "C" fn bignum_from_dec(text: *const c_char) -> CBignumResult {
    if text.is_null() {
        return CBignumResult::error("text is null".to_string());
    }
    let text = match unsafe { CStr::from_ptr(text) }.to_str() {
        Ok(s) => s,
        Err(_) => return CBignumResult::error("invalid UTF-8 in text".to_string()),
    };
    CBignumResult::from_result(BigNum::from_dec(text))
}

/// Convert a double under the environment's non-finite policy.
#[no_mangle]
pub extern "C" fn bignum_from_f64(env: *const Environment, value: f64) -> CBignumResult {
    if env.is_null() {
        return CBignumResult::error("environment is null".to_string());
    }
    let env = unsafe { &*env };
    CBignumResult::from_result(BigNum::from_f64(value, env.config().non_finite))
}

/// Apply binary operator `op` (0 add, 1 sub, 2 mul, 3 div, 4 mod, 5 pow).
#[no_mangle]
pub extern "C" fn bignum_binop(
    env: *mut Environment,
    op: c_int,
    a: *const BigNum,
    b: *const BigNum,
) -> CBignumResult {
    if env.is_null() || a.is_null() || b.is_null() {
        return CBignumResult::error("null argument".to_string());
    }
    let Some(op) = binop_from_code(op) else {
        return CBignumResult::error(format!("unknown operator code {}", op));
    };
    let env = unsafe { &mut *env };
    let (a, b) = unsafe { (&*a, &*b) };
    CBignumResult::from_result(env.arith(op, Operand::Handle(a), Operand::Handle(b)))
}

/// Three-way comparison: -1, 0 or 1, or [`BIGNUM_CMP_ERROR`].
#[no_mangle]
pub extern "C" fn bignum_cmp(a: *const BigNum, b: *const BigNum) -> c_int {
    if a.is_null() || b.is_null() {
        return BIGNUM_CMP_ERROR;
    }
    let (a, b) = unsafe { (&*a, &*b) };
    match a.compare(b) {
        Ok(Ordering::Less) => -1,
        Ok(Ordering::Equal) => 0,
        Ok(Ordering::Greater) => 1,
        Err(_) => BIGNUM_CMP_ERROR,
    }
}

/// Decimal text of `value`, to be freed with [`bignum_string_free`].
/// Returns null on error.
#[no_mangle]
pub extern "C" fn bignum_to_dec(value: *const BigNum) -> *mut c_char {
    if value.is_null() {
        return std::ptr::null_mut();
    }
    let value = unsafe { &*value };
    match value.to_dec() {
        Ok(text) => c_string(text),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Free a string returned by this module.
#[no_mangle]
pub extern "C" fn bignum_string_free(s: *mut c_char) {
    if !s.is_null() {
        unsafe {
            drop(CString::from_raw(s));
        }
    }
}

/// Free the bignum at `*slot` and null the slot.
#[no_mangle]
pub extern "C" fn bignum_free(slot: *mut *mut BigNum) {
    if slot.is_null() {
        return;
    }
    unsafe {
        let value = std::ptr::replace(slot, std::ptr::null_mut());
        if !value.is_null() {
            drop(Box::from_raw(value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn take_dec(value: *mut BigNum) -> String {
        let ptr = bignum_to_dec(value);
        let text = unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_string();
        bignum_string_free(ptr);
        text
    }

    fn take_error(result: CBignumResult) -> String {
        assert!(result.value.is_null());
        let text = unsafe { CStr::from_ptr(result.error) }
            .to_str()
            .unwrap()
            .to_string();
        bignum_string_free(result.error);
        text
    }

    #[test]
    fn test_round_trip_through_c_abi() {
        let env = Box::into_raw(Box::new(Environment::new()));
        let text = CString::new("123456789012345678901234567890").unwrap();
        let mut a = bignum_from_dec(text.as_ptr()).value;
        let two = CString::new("2").unwrap();
        let mut b = bignum_from_dec(two.as_ptr()).value;

        let result = bignum_binop(env, 2, a, b);
        assert!(result.error.is_null());
        let mut product = result.value;
        assert_eq!(take_dec(product), "246913578024691357802469135780");
        assert_eq!(bignum_cmp(product, a), 1);

        bignum_free(&mut a);
        bignum_free(&mut b);
        bignum_free(&mut product);
        assert!(a.is_null() && b.is_null() && product.is_null());
        bignum_env_free(env);
    }

    #[test]
    fn test_env_result_reports_config_errors() {
        let result = CEnvResult::from_config(Err(ConfigError::InvalidValue {
            key: "BIGNUM_HOST_NON_FINITE",
            value: "sometimes".to_string(),
        }));
        assert!(result.env.is_null());
        let message = unsafe { CStr::from_ptr(result.error) }.to_str().unwrap().to_string();
        bignum_string_free(result.error);
        assert_eq!(message, "invalid value \"sometimes\" for BIGNUM_HOST_NON_FINITE");

        let result = CEnvResult::from_config(Ok(FacadeConfig::default()));
        assert!(result.error.is_null());
        assert!(!result.env.is_null());
        bignum_env_free(result.env);
    }

    #[test]
    fn test_free_is_idempotent() {
        let mut n = bignum_new();
        bignum_free(&mut n);
        bignum_free(&mut n);
        bignum_free(std::ptr::null_mut());
        assert!(n.is_null());
    }

    #[test]
    fn test_errors_are_reported_as_text() {
        let env = Box::into_raw(Box::new(Environment::new()));
        let empty = CString::new("").unwrap();
        let message = take_error(bignum_from_dec(empty.as_ptr()));
        assert!(message.starts_with("bad argument #1"));

        let mut a = bignum_new();
        let message = take_error(bignum_binop(env, 3, a, a));
        assert!(message.starts_with("bignum:__div: "));

        let message = take_error(bignum_binop(env, 9, a, a));
        assert_eq!(message, "unknown operator code 9");

        bignum_free(&mut a);
        bignum_env_free(env);
    }

    #[test]
    fn test_from_f64_and_cmp_errors() {
        let env = Box::into_raw(Box::new(Environment::new()));
        let mut n = bignum_from_f64(env, -2.5).value;
        assert_eq!(take_dec(n), "-2");
        assert_eq!(bignum_cmp(n, std::ptr::null()), BIGNUM_CMP_ERROR);
        assert!(bignum_to_dec(std::ptr::null()).is_null());
        bignum_free(&mut n);
        bignum_env_free(env);
    }
}
