//! Action descriptors, bound arguments and action results.
//!
//! Actions are registered with an explicit parameter list at registration
//! time. The dispatcher binds request values against that list in
//! declaration order and hands the handler an [`ActionArgs`].

use serde_json::Value;

use crate::core::{Error, Response, Result};

/// Raw request values keyed by parameter name (merged query and path
/// parameters).
pub type ActionParams = serde_json::Map<String, Value>;

/// Boxed action handler.
pub type ActionFn<C> = Box<dyn Fn(&mut C, ActionArgs) -> Result<ActionResult> + Send + Sync>;

/// Whether an action may be invoked by name from a route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Public,
    /// Registered for internal use; dispatch by name is refused.
    Internal,
}

/// Declared action parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionParam {
    name: &'static str,
    optional: bool,
    default: Value,
}

impl ActionParam {
    /// A parameter the request must supply with a non-null value.
    pub fn required(name: &'static str) -> Self {
        Self {
            name,
            optional: false,
            default: Value::Null,
        }
    }

    /// A parameter that falls back to `default` when absent.
    pub fn optional(name: &'static str, default: impl Into<Value>) -> Self {
        Self {
            name,
            optional: true,
            default: default.into(),
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    #[inline]
    pub fn default_value(&self) -> &Value {
        &self.default
    }

    /// Resolve this parameter against the request values.
    ///
    /// Optionality comes from the declaration alone: a required parameter
    /// fails when the value is absent or null.
    fn bind(&self, params: &ActionParams) -> Result<Value> {
        let value = match params.get(self.name) {
            Some(v) => v.clone(),
            None if self.optional => self.default.clone(),
            None => Value::Null,
        };
        if value.is_null() && !self.optional {
            return Err(Error::MissingParameter(self.name.to_string()));
        }
        Ok(value)
    }
}

/// A registered action.
pub struct ActionDef<C> {
    pub(crate) visibility: Visibility,
    pub(crate) params: Vec<ActionParam>,
    pub(crate) handler: ActionFn<C>,
}

impl<C> ActionDef<C> {
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn params(&self) -> &[ActionParam] {
        &self.params
    }

    /// Bind request values to the declared parameters, in order.
    pub fn bind(&self, params: &ActionParams) -> Result<ActionArgs> {
        let values = self
            .params
            .iter()
            .map(|p| p.bind(params).map(|v| (p.name, v)))
            .collect::<Result<Vec<_>>>()?;
        Ok(ActionArgs { values })
    }
}

/// Action table of a controller type, built once at registration.
pub struct ActionTable<C> {
    actions: Vec<(String, ActionDef<C>)>,
}

impl<C> Default for ActionTable<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> ActionTable<C> {
    pub fn new() -> Self {
        Self {
            actions: Vec::new(),
        }
    }

    /// Register a public action. Registering a name twice replaces it.
    pub fn action<F>(&mut self, name: &str, params: &[ActionParam], handler: F) -> &mut Self
    where
        F: Fn(&mut C, ActionArgs) -> Result<ActionResult> + Send + Sync + 'static,
    {
        self.insert(name, Visibility::Public, params, Box::new(handler))
    }

    /// Register an action that exists but must not be reachable by name.
    pub fn internal<F>(&mut self, name: &str, params: &[ActionParam], handler: F) -> &mut Self
    where
        F: Fn(&mut C, ActionArgs) -> Result<ActionResult> + Send + Sync + 'static,
    {
        self.insert(name, Visibility::Internal, params, Box::new(handler))
    }

    fn insert(
        &mut self,
        name: &str,
        visibility: Visibility,
        params: &[ActionParam],
        handler: ActionFn<C>,
    ) -> &mut Self {
        let def = ActionDef {
            visibility,
            params: params.to_vec(),
            handler,
        };
        match self.actions.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = def,
            None => self.actions.push((name.to_string(), def)),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&ActionDef<C>> {
        self.actions
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, def)| def)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Public action names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.actions
            .iter()
            .filter(|(_, def)| def.visibility == Visibility::Public)
            .map(|(n, _)| n.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Arguments bound for one invocation, in declaration order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActionArgs {
    values: Vec<(&'static str, Value)>,
}

impl ActionArgs {
    /// Raw value of a declared parameter.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    /// Coerce a declared parameter to `T`.
    pub fn get<T: FromParam>(&self, name: &str) -> Result<T> {
        let value = self
            .value(name)
            .ok_or_else(|| Error::MissingParameter(name.to_string()))?;
        T::from_param(value).ok_or_else(|| Error::InvalidParameter {
            name: name.to_string(),
            expected: T::EXPECTED,
        })
    }

    /// Coerce the argument at `index` to `T`.
    pub fn at<T: FromParam>(&self, index: usize) -> Result<T> {
        let (name, value) = self
            .values
            .get(index)
            .ok_or_else(|| Error::MissingParameter(format!("#{}", index)))?;
        T::from_param(value).ok_or_else(|| Error::InvalidParameter {
            name: name.to_string(),
            expected: T::EXPECTED,
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.values.iter().map(|(n, v)| (*n, v))
    }
}

/// Conversion from a raw request value into a typed argument.
///
/// Request values usually arrive as strings, so numeric and boolean
/// conversions accept their textual forms.
pub trait FromParam: Sized {
    /// Type description used in `InvalidParameter` errors.
    const EXPECTED: &'static str;

    fn from_param(value: &Value) -> Option<Self>;
}

impl FromParam for Value {
    const EXPECTED: &'static str = "any value";

    fn from_param(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromParam for String {
    const EXPECTED: &'static str = "string";

    fn from_param(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(if *b { "1" } else { "" }.to_string()),
            _ => None,
        }
    }
}

impl FromParam for bool {
    const EXPECTED: &'static str = "boolean";

    fn from_param(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => n.as_f64().map(|f| f != 0.0),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "on" | "yes" => Some(true),
                "" | "0" | "false" | "off" | "no" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

impl FromParam for f64 {
    const EXPECTED: &'static str = "number";

    fn from_param(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FromParam for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_param(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

macro_rules! from_param_via_i64 {
    ($($ty:ty),*) => {
        $(
            impl FromParam for $ty {
                const EXPECTED: &'static str = "integer";

                fn from_param(value: &Value) -> Option<Self> {
                    i64::from_param(value).and_then(|n| <$ty>::try_from(n).ok())
                }
            }
        )*
    };
}

from_param_via_i64!(i32, u32, u64, usize);

impl<T: FromParam> FromParam for Option<T> {
    const EXPECTED: &'static str = T::EXPECTED;

    fn from_param(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::from_param(other).map(Some),
        }
    }
}

/// What an action handler produced.
#[derive(Debug)]
pub enum ActionResult {
    /// A response returned verbatim by the dispatcher.
    Response(Response),
    /// Text written into the controller's current response body.
    Text(String),
    /// Nothing; the current response is returned unmodified.
    Empty,
}

impl ActionResult {
    /// Text result from any displayable scalar.
    pub fn text(value: impl std::fmt::Display) -> Self {
        ActionResult::Text(value.to_string())
    }
}

impl From<Response> for ActionResult {
    fn from(res: Response) -> Self {
        ActionResult::Response(res)
    }
}

impl From<String> for ActionResult {
    fn from(s: String) -> Self {
        ActionResult::Text(s)
    }
}

impl From<&str> for ActionResult {
    fn from(s: &str) -> Self {
        ActionResult::Text(s.to_string())
    }
}

impl From<()> for ActionResult {
    fn from(_: ()) -> Self {
        ActionResult::Empty
    }
}

impl<T: Into<ActionResult>> From<Option<T>> for ActionResult {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(ActionResult::Empty)
    }
}

macro_rules! action_result_from_scalar {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ActionResult {
                fn from(value: $ty) -> Self {
                    ActionResult::Text(value.to_string())
                }
            }
        )*
    };
}

action_result_from_scalar!(i32, i64, u32, u64, usize, f64);
