//! Shared helpers for integration tests
// Each test target uses a different subset of these helpers.
#![allow(dead_code)]

use bignum_host::prelude::*;

/// Parse decimal text, panicking on malformed input
pub fn big(text: &str) -> BigNum {
    BigNum::from_dec(text).unwrap_or_else(|e| panic!("bad literal {:?}: {}", text, e))
}

/// Canonical decimal of a live bignum
pub fn dec(n: &BigNum) -> String {
    n.to_dec().unwrap()
}

/// Decimal of a host value that must hold a bignum
pub fn dec_value(value: &Value) -> String {
    match value {
        Value::BigNum(n) => dec(n),
        other => panic!("expected a bignum, got {}", other.type_name()),
    }
}

/// Call `method` on the environment and unwrap the result
pub fn call(env: &mut Environment, method: &str, args: &[Value]) -> Value {
    env.call(method, args)
        .unwrap_or_else(|e| panic!("{} failed: {}", method, e))
}
