//! Host environment
//!
//! An [`Environment`] stands for one interpreter instance. It owns the
//! configuration, the bignum method table, and at most one
//! [`ScratchContext`], created on first use and released on teardown.
//!
//! The environment is not `Send`. Hosts that reach one environment from
//! several threads must serialize access themselves, e.g. behind a mutex.

use crate::config::FacadeConfig;
use crate::dispatch::DispatchStats;
use crate::error::{BignumError, BignumResult, ConfigError};
use crate::host::{bignum_class, Method, Value, BIGNUM_CLASS};
use crate::interpose::MethodTable;
use crate::scratch::ScratchContext;

/// One host interpreter instance and the state its bignum calls share
#[derive(Debug)]
pub struct Environment {
    config: FacadeConfig,
    scratch: Option<ScratchContext>,
    /// Contexts created so far; the next context gets this plus one as its id
    scratch_created: u64,
    methods: MethodTable<Method>,
    pub(crate) stats: DispatchStats,
}

impl Environment {
    pub fn new() -> Self {
        Self::with_config(FacadeConfig::default())
    }

    pub fn with_config(config: FacadeConfig) -> Self {
        Self {
            config,
            scratch: None,
            scratch_created: 0,
            methods: bignum_class(),
            stats: DispatchStats::default(),
        }
    }

    /// Environment configured from `BIGNUM_HOST_CONFIG` / `BIGNUM_HOST_NON_FINITE`
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::with_config(FacadeConfig::from_env()?))
    }

    pub fn config(&self) -> &FacadeConfig {
        &self.config
    }

    /// The environment's scratch context, created on first use.
    pub fn scratch(&mut self) -> &mut ScratchContext {
        if self.scratch.is_none() {
            self.scratch_created += 1;
            tracing::debug!(id = self.scratch_created, "created scratch context");
        }
        let id = self.scratch_created;
        self.scratch.get_or_insert_with(|| ScratchContext::new(id))
    }

    pub fn has_scratch(&self) -> bool {
        self.scratch.is_some()
    }

    /// Release the scratch context. Returns `false` if there was none.
    pub fn teardown(&mut self) -> bool {
        match self.scratch.take() {
            Some(ctx) => {
                tracing::debug!(
                    id = ctx.id(),
                    borrows = ctx.borrows(),
                    "released scratch context"
                );
                true
            }
            None => false,
        }
    }

    /// Slot allocation counters since the environment was created
    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    pub fn methods(&self) -> &MethodTable<Method> {
        &self.methods
    }

    /// Invoke bignum method `name`, resolved through the method table now.
    pub fn call(&mut self, name: &str, args: &[Value]) -> BignumResult<Value> {
        let method = self.methods.get(name).ok_or_else(|| {
            BignumError::unsupported(format!("{}: no method named {:?}", BIGNUM_CLASS, name))
        })?;
        method(self, args)
    }

    /// Replace bignum method `name`, returning the previous implementation.
    pub fn interpose(&mut self, name: &str, method: Method) -> Option<Method> {
        self.methods.interpose(name, method)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Environment {
    fn drop(&mut self) {
        self.teardown();
    }
}
