//! Action dispatch.

use tracing::debug;

use super::{ActionController, ActionParams, ActionTable, Visibility};
use crate::core::{Error, Response, Result};

/// Resolves action names against a controller type's action table, binds
/// parameters and normalizes the handler's result.
pub struct Dispatcher<C> {
    table: ActionTable<C>,
}

impl<C: ActionController> Default for Dispatcher<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ActionController> Dispatcher<C> {
    /// Build the action table by calling `C::register`.
    pub fn new() -> Self {
        let mut table = ActionTable::new();
        C::register(&mut table);
        Self { table }
    }

    pub fn table(&self) -> &ActionTable<C> {
        &self.table
    }

    /// Run one action. An empty name selects the controller's default action.
    pub fn execute(&self, ctrl: &mut C, action: &str, params: &ActionParams) -> Result<Response> {
        let name = if action.is_empty() {
            ctrl.controller().default_action().to_string()
        } else {
            action.to_string()
        };

        let def = self.table.get(&name).ok_or_else(|| Error::MethodNotFound {
            controller: C::NAME.to_string(),
            action: name.clone(),
        })?;
        if def.visibility() != Visibility::Public {
            return Err(Error::MethodNotAccessible {
                controller: C::NAME.to_string(),
                action: name,
            });
        }

        let args = def.bind(params)?;
        debug!(
            controller = C::NAME,
            action = %name,
            args = args.len(),
            "Dispatching action"
        );

        let result = (def.handler)(ctrl, args)?;
        Ok(ctrl.controller_mut().finish(result))
    }
}
