//! Named actions that page controls can trigger.
//!
//! Controls declare an action name (for example `sortshow` on a header sort
//! icon). Names resolve through an explicit registry filled at start-up;
//! dispatching a name nobody registered is an error, never a silent no-op.

use std::collections::HashMap;

use tracing::debug;

use crate::view::{TableView, ViewError};

/// Numeric arguments carried by a control (`row`, `cell`, `column`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionArgs(HashMap<String, usize>);

impl ActionArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: usize) -> Self {
        self.0.insert(name.to_string(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.0.get(name).copied()
    }

    /// Argument `name`, or a [`ViewError::MissingArgument`] naming `action`.
    pub fn require(&self, action: &str, name: &str) -> Result<usize, ViewError> {
        self.get(name).ok_or_else(|| ViewError::MissingArgument {
            action: action.to_string(),
            name: name.to_string(),
        })
    }
}

pub type ActionHandler = fn(&mut TableView, &ActionArgs) -> Result<(), ViewError>;

#[derive(Default)]
pub struct ActionRegistry {
    handlers: HashMap<String, ActionHandler>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the listing-table actions.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register("sortshow", sortshow);
        registry.register("colwrap", colwrap);
        registry.register("err_clear", err_clear);
        registry
    }

    /// Register `handler` under `name`, returning any handler it replaces.
    pub fn register(&mut self, name: &str, handler: ActionHandler) -> Option<ActionHandler> {
        self.handlers.insert(name.to_string(), handler)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Run the action registered as `name` against `view`.
    ///
    /// An unknown name is reported in the view's error area as well.
    pub fn dispatch(
        &self,
        name: &str,
        view: &mut TableView,
        args: &ActionArgs,
    ) -> Result<(), ViewError> {
        let Some(handler) = self.handlers.get(name) else {
            let err = ViewError::UnknownAction(name.to_string());
            view.errors_mut().report("dispatch", &err.to_string());
            return Err(err);
        };
        debug!(action = name, ?args, "Dispatching action");
        handler(view, args)
    }
}

/// Click on a header sort icon. Arguments: `cell`, optional `row` (default 0).
fn sortshow(view: &mut TableView, args: &ActionArgs) -> Result<(), ViewError> {
    let cell = args.require("sortshow", "cell")?;
    let row = args.get("row").unwrap_or(0);
    view.toggle_sort_direction(row, cell).map(|_| ())
}

/// Show or hide a column. Arguments: `column`.
fn colwrap(view: &mut TableView, args: &ActionArgs) -> Result<(), ViewError> {
    let column = args.require("colwrap", "column")?;
    view.toggle_column(column).map(|_| ())
}

fn err_clear(view: &mut TableView, _args: &ActionArgs) -> Result<(), ViewError> {
    view.errors_mut().clear();
    Ok(())
}
