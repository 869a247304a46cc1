//! Configurable function dispatch.
//!
//! Product configurations reference functions by fully qualified name, with
//! optional bound arguments. Names resolve once at configuration load, fail
//! fast on anything malformed, and invoke arbitrarily often afterward.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{OwsError, OwsResult};

/// Keyword-argument map for dispatched calls.
pub type Kwargs = Map<String, Value>;

/// A dispatchable function: positional plus keyword arguments in, value out.
pub type DispatchFn = Arc<dyn Fn(&[Value], &Kwargs) -> OwsResult<Value> + Send + Sync>;

/// Qualified-name → function lookup, populated at startup.
///
/// Stands in for runtime module import: anything a configuration may name
/// must be registered before configurations are resolved.
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, DispatchFn>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function under its fully qualified name.
    pub fn register<F>(&mut self, name: impl Into<String>, function: F)
    where
        F: Fn(&[Value], &Kwargs) -> OwsResult<Value> + Send + Sync + 'static,
    {
        let name = name.into();
        debug!(name = %name, "registered dispatch function");
        self.functions.insert(name, Arc::new(function));
    }

    /// Resolve a qualified name to its registered function.
    pub fn resolve(&self, name: &str) -> OwsResult<DispatchFn> {
        let (module, function) = name.rsplit_once('.').ok_or_else(|| {
            OwsError::Resolution(format!("'{name}' is not a fully qualified function name"))
        })?;
        self.functions.get(name).cloned().ok_or_else(|| {
            OwsError::Resolution(format!(
                "function '{function}' is not registered in module '{module}'"
            ))
        })
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.functions.keys().collect();
        names.sort();
        f.debug_struct("FunctionRegistry")
            .field("functions", &names)
            .finish()
    }
}

/// A function reference in product configuration.
///
/// Either a bare qualified name or a record binding default arguments.
/// Directly supplied callables exist as a variant only to be rejected:
/// configuration must stay serializable.
#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FunctionConfig {
    /// `"module.function"` shorthand.
    Name(String),
    /// Structured record with bound defaults.
    Record(FunctionRecord),
    /// A callable object handed over instead of a name.
    #[serde(skip)]
    Callable(DispatchFn),
}

impl fmt::Debug for FunctionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionConfig::Name(name) => f.debug_tuple("Name").field(name).finish(),
            FunctionConfig::Record(record) => f.debug_tuple("Record").field(record).finish(),
            FunctionConfig::Callable(_) => f.write_str("Callable(..)"),
        }
    }
}

/// Structured function reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionRecord {
    /// Fully qualified function name.
    pub function: String,

    /// Bound positional arguments, appended after call-site arguments.
    #[serde(default)]
    pub args: Vec<Value>,

    /// Bound keyword defaults, overridden by call-site keywords.
    #[serde(default)]
    pub kwargs: Kwargs,

    /// Inject the enclosing product configuration on every call.
    #[serde(default)]
    pub pass_product_cfg: bool,
}

/// A configuration entry resolved into a bound, callable form.
#[derive(Clone)]
pub struct FunctionWrapper {
    function: DispatchFn,
    args: Vec<Value>,
    kwargs: Kwargs,
    product_cfg: Option<Arc<Value>>,
}

impl FunctionWrapper {
    /// Resolve a configuration entry against the registry.
    ///
    /// `product_cfg` is the enclosing layer configuration, retained only
    /// when the entry asks for it with `pass_product_cfg`.
    pub fn new(
        registry: &FunctionRegistry,
        product_cfg: Option<Arc<Value>>,
        config: &FunctionConfig,
    ) -> OwsResult<Self> {
        match config {
            FunctionConfig::Callable(_) => Err(OwsError::Config(
                "Directly including callable objects in configuration is not supported. \
                 Reference callables by fully qualified name."
                    .to_string(),
            )),
            FunctionConfig::Name(name) => Ok(Self {
                function: registry.resolve(name)?,
                args: Vec::new(),
                kwargs: Kwargs::new(),
                product_cfg: None,
            }),
            FunctionConfig::Record(record) => {
                let product_cfg = if record.pass_product_cfg {
                    let cfg = product_cfg.ok_or_else(|| {
                        OwsError::Config(format!(
                            "'{}' sets pass_product_cfg but no product configuration is available",
                            record.function
                        ))
                    })?;
                    Some(cfg)
                } else {
                    None
                };
                Ok(Self {
                    function: registry.resolve(&record.function)?,
                    args: record.args.clone(),
                    kwargs: record.kwargs.clone(),
                    product_cfg,
                })
            }
        }
    }

    /// Invoke with call-site arguments merged against the bound defaults.
    ///
    /// Positional: call-site arguments first, bound defaults appended.
    /// Keyword: bound defaults overlaid by call-site keys. A retained
    /// product configuration is injected as `product_cfg` last, so callers
    /// cannot override it.
    pub fn call(&self, args: &[Value], kwargs: &Kwargs) -> OwsResult<Value> {
        let calling_args: Vec<Value> = args.iter().chain(self.args.iter()).cloned().collect();

        let mut calling_kwargs = self.kwargs.clone();
        for (key, value) in kwargs {
            calling_kwargs.insert(key.clone(), value.clone());
        }
        if let Some(cfg) = &self.product_cfg {
            calling_kwargs.insert("product_cfg".to_string(), cfg.as_ref().clone());
        }

        (self.function)(&calling_args, &calling_kwargs)
    }
}

impl fmt::Debug for FunctionWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionWrapper")
            .field("args", &self.args)
            .field("kwargs", &self.kwargs)
            .field("product_cfg", &self.product_cfg)
            .finish_non_exhaustive()
    }
}
