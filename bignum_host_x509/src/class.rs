//! Method tables for the name and certificate wrappers
//!
//! Each wrapped type gets a [`Class`] built on the core crate's
//! [`MethodTable`], so higher layers can interpose `x509.name` and
//! `x509.cert` methods exactly as they do bignum ones.

use std::rc::Rc;

use bignum_host::host::Value;
use bignum_host::interpose::MethodTable;

use crate::error::{X509Error, X509Result};

/// A method bound on objects of type `T`
pub type Method<T> = Rc<dyn Fn(&mut T, &[Value]) -> X509Result<Value>>;

pub fn method<T, F>(f: F) -> Method<T>
where
    F: Fn(&mut T, &[Value]) -> X509Result<Value> + 'static,
{
    Rc::new(f)
}

#[derive(Debug)]
pub struct Class<T> {
    methods: MethodTable<Method<T>>,
}

impl<T> Class<T> {
    pub fn new(name: &str) -> Self {
        Self {
            methods: MethodTable::new(name),
        }
    }

    pub fn with(mut self, name: &str, method: Method<T>) -> Self {
        self.methods.set(name, method);
        self
    }

    pub fn name(&self) -> &str {
        self.methods.class()
    }

    pub fn methods(&self) -> &MethodTable<Method<T>> {
        &self.methods
    }

    /// Invoke `name` on `target`, resolving the binding at call time.
    pub fn call(&self, target: &mut T, name: &str, args: &[Value]) -> X509Result<Value> {
        let method = self
            .methods
            .get(name)
            .ok_or_else(|| X509Error::UnknownMethod(format!("{}:{}", self.name(), name)))?;
        method(target, args)
    }

    /// Replace `name`, returning the previous implementation.
    pub fn interpose(&mut self, name: &str, method: Method<T>) -> Option<Method<T>> {
        self.methods.interpose(name, method)
    }
}

/// String argument `index` (0-based), reported 1-based with the receiver
/// counted as argument #1.
pub(crate) fn string_arg(args: &[Value], index: usize) -> X509Result<&str> {
    let value = bignum_host::host::arg(args, index);
    value.as_str().ok_or_else(|| {
        X509Error::invalid_argument(
            index + 2,
            format!("string expected, got {}", value.type_name()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Counter(i64);

    fn counter_class() -> Class<Counter> {
        Class::new("counter").with(
            "bump",
            method(|c: &mut Counter, _args| {
                c.0 += 1;
                Ok(Value::Number(c.0 as f64))
            }),
        )
    }

    #[test]
    fn test_call_and_interpose() {
        let mut class = counter_class();
        let mut counter = Counter::default();
        assert_eq!(class.call(&mut counter, "bump", &[]).unwrap(), Value::Number(1.0));

        let previous = class.methods().get("bump").unwrap();
        let replaced = class.interpose(
            "bump",
            method(move |c: &mut Counter, args| {
                previous(c, args)?;
                previous(c, args)
            }),
        );
        assert!(replaced.is_some());
        assert_eq!(class.call(&mut counter, "bump", &[]).unwrap(), Value::Number(3.0));
    }

    #[test]
    fn test_unknown_method() {
        let class = counter_class();
        let err = class.call(&mut Counter::default(), "reset", &[]).unwrap_err();
        assert_eq!(err.to_string(), "counter:reset: no such method");
    }

    #[test]
    fn test_string_arg_position() {
        let args = [Value::Number(1.0)];
        let err = string_arg(&args, 0).unwrap_err();
        assert_eq!(err.to_string(), "bad argument #2: string expected, got number");
    }
}
