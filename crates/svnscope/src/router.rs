//! Operation router
//!
//! Maps each bridge operation name to its handler. The table is checked at
//! startup to contain exactly the six known operations.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::context::AppContext;
use crate::handlers::{self, HandlerError};

/// Boxed future returned by a routed handler
pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = Result<Value, HandlerError>> + Send + 'a>>;

/// A routed handler: JSON arguments in, JSON result out
pub type HandlerFn = for<'a> fn(&'a AppContext, Option<Map<String, Value>>) -> HandlerFuture<'a>;

/// Wrap a typed handler into a [`HandlerFn`]
macro_rules! route {
    ($handler:path) => {{
        fn call(ctx: &AppContext, args: Option<Map<String, Value>>) -> HandlerFuture<'_> {
            Box::pin(async move {
                let output = $handler(ctx, args).await?;
                Ok::<Value, HandlerError>(serde_json::to_value(output)?)
            })
        }
        call as HandlerFn
    }};
}

/// The operations exposed to the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operation {
    /// Ask the user for a working copy directory
    SelectDirectory,
    /// Fetch and parse the svn log
    GetSvnLog,
    /// Read a local file
    ReadFile,
    /// Fetch a file as of a revision
    GetSvnFile,
    /// Overwrite a local file
    WriteFile,
    /// List files under a directory
    ListFiles,
}

impl Operation {
    /// Every operation, in registration order
    pub const ALL: [Operation; 6] = [
        Operation::SelectDirectory,
        Operation::GetSvnLog,
        Operation::ReadFile,
        Operation::GetSvnFile,
        Operation::WriteFile,
        Operation::ListFiles,
    ];

    /// Wire name of the operation
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::SelectDirectory => "select-directory",
            Self::GetSvnLog => "get-svn-log",
            Self::ReadFile => "read-file",
            Self::GetSvnFile => "get-svn-file",
            Self::WriteFile => "write-file",
            Self::ListFiles => "list-files",
        }
    }

    fn handler(self) -> HandlerFn {
        match self {
            Self::SelectDirectory => route!(handlers::handle_select_directory),
            Self::GetSvnLog => route!(handlers::handle_get_svn_log),
            Self::ReadFile => route!(handlers::handle_read_file),
            Self::GetSvnFile => route!(handlers::handle_get_svn_file),
            Self::WriteFile => route!(handlers::handle_write_file),
            Self::ListFiles => route!(handlers::handle_list_files),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| RouterError::UnknownOperation(s.to_string()))
    }
}

/// Router errors
#[derive(Debug, Error)]
pub enum RouterError {
    /// No handler registered under this name
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// A known operation has no handler
    #[error("Operation not registered: {0}")]
    MissingOperation(Operation),

    /// The table does not hold exactly one entry per operation
    #[error("Expected {expected} routes, found {actual}")]
    WrongRouteCount {
        /// Number of known operations
        expected: usize,
        /// Number of registered routes
        actual: usize,
    },

    /// The handler itself failed
    #[error(transparent)]
    Handler(#[from] HandlerError),
}

/// Table from operation name to handler
pub struct Router {
    routes: BTreeMap<&'static str, HandlerFn>,
}

impl Router {
    /// Register every operation and validate the table
    ///
    /// # Errors
    ///
    /// Returns `RouterError` if the table is not exactly the six operations.
    pub fn new() -> Result<Self, RouterError> {
        Self::from_routes(Operation::ALL.into_iter().map(|op| (op, op.handler())))
    }

    /// Build a router from explicit entries and validate it
    ///
    /// # Errors
    ///
    /// Returns `RouterError` if any operation is missing or the entry count
    /// is wrong.
    pub fn from_routes(
        entries: impl IntoIterator<Item = (Operation, HandlerFn)>,
    ) -> Result<Self, RouterError> {
        let mut routes = BTreeMap::new();
        let mut actual = 0;
        for (op, handler) in entries {
            routes.insert(op.name(), handler);
            actual += 1;
        }

        let router = Self { routes };
        router.validate(actual)?;
        Ok(router)
    }

    fn validate(&self, registered: usize) -> Result<(), RouterError> {
        if let Some(missing) = Operation::ALL
            .into_iter()
            .find(|op| !self.routes.contains_key(op.name()))
        {
            return Err(RouterError::MissingOperation(missing));
        }
        if registered != Operation::ALL.len() {
            return Err(RouterError::WrongRouteCount {
                expected: Operation::ALL.len(),
                actual: registered,
            });
        }
        Ok(())
    }

    /// Registered operation names, sorted
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.routes.keys().copied()
    }

    /// Number of registered routes
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether no routes are registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Look up the handler for `name`
    #[must_use]
    pub fn get(&self, name: &str) -> Option<HandlerFn> {
        self.routes.get(name).copied()
    }

    /// Run the handler registered for `name`
    ///
    /// # Errors
    ///
    /// Returns `RouterError::UnknownOperation` for unregistered names and
    /// `RouterError::Handler` when the handler fails.
    pub async fn dispatch(
        &self,
        ctx: &AppContext,
        name: &str,
        args: Option<Map<String, Value>>,
    ) -> Result<Value, RouterError> {
        let handler = self
            .get(name)
            .ok_or_else(|| RouterError::UnknownOperation(name.to_string()))?;
        Ok(handler(ctx, args).await?)
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.routes.keys()).finish()
    }
}
