use std::sync::Arc;

use http::Method;
use tracing::info;

use super::config::ServerConfig;
use super::stream::HttpStream;
use crate::dispatcher::{default_error_handler, spawn_handler, Dispatcher, ErrorHandler};
use crate::error::{DispatchResult, Error};
use crate::http::{Request, Response};
use crate::middleware::Middleware;
use crate::router::{Route, Router};
use crate::runtime_config::RuntimeConfig;

type BoxedHandler = Box<dyn Fn(Request) -> DispatchResult + Send + 'static>;

/// Builder for a dispatch pipeline.
///
/// Middleware and routes are collected in registration order (which is
/// execution order and routing-tiebreak order respectively), then
/// [`bind`](App::bind) freezes everything into an immutable [`Service`].
/// Nothing can be added afterwards, which is what lets the route table and
/// middleware list be shared across in-flight requests without locks.
///
/// ```no_run
/// use http::StatusCode;
/// use manifold::{App, Response};
/// use serde_json::json;
///
/// let service = App::new()
///     .get("/users/:id", |req| {
///         let id = req.param("id").unwrap_or_default().to_string();
///         Ok(Response::json(StatusCode::OK, json!({ "id": id })))
///     })
///     .bind();
/// // hand `service` to the accept loop; it calls
/// // `service.dispatch(request, &mut stream)` per parsed request
/// ```
pub struct App {
    config: ServerConfig,
    middlewares: Vec<Arc<dyn Middleware>>,
    routes: Vec<(Method, String, BoxedHandler)>,
    error_handler: ErrorHandler,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self::with_config(ServerConfig::default())
    }

    pub fn with_config(config: ServerConfig) -> Self {
        App {
            config,
            middlewares: Vec::new(),
            routes: Vec::new(),
            error_handler: default_error_handler(),
        }
    }

    /// Append a middleware link. Registration order is execution order.
    pub fn add_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.middlewares.push(middleware);
        self
    }

    /// Register a route. The handler runs in its own coroutine once bound.
    pub fn route<F>(mut self, method: Method, pattern: &str, handler: F) -> Self
    where
        F: Fn(Request) -> DispatchResult + Send + 'static,
    {
        self.routes
            .push((method, pattern.to_string(), Box::new(handler)));
        self
    }

    pub fn get<F>(self, pattern: &str, handler: F) -> Self
    where
        F: Fn(Request) -> DispatchResult + Send + 'static,
    {
        self.route(Method::GET, pattern, handler)
    }

    pub fn post<F>(self, pattern: &str, handler: F) -> Self
    where
        F: Fn(Request) -> DispatchResult + Send + 'static,
    {
        self.route(Method::POST, pattern, handler)
    }

    pub fn put<F>(self, pattern: &str, handler: F) -> Self
    where
        F: Fn(Request) -> DispatchResult + Send + 'static,
    {
        self.route(Method::PUT, pattern, handler)
    }

    pub fn delete<F>(self, pattern: &str, handler: F) -> Self
    where
        F: Fn(Request) -> DispatchResult + Send + 'static,
    {
        self.route(Method::DELETE, pattern, handler)
    }

    /// Replace the default error handler.
    pub fn error_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Error) -> Response + Send + Sync + 'static,
    {
        self.error_handler = Arc::new(handler);
        self
    }

    /// Freeze the registrations into a ready-to-dispatch [`Service`].
    ///
    /// Spawns one handler coroutine per route (stack size per
    /// [`RuntimeConfig`]), compiles the route table, and installs the no-op
    /// passthrough link when no middleware was registered so the chain is
    /// never empty.
    pub fn bind(self) -> Service {
        let stack_size = RuntimeConfig::from_env().stack_size;
        let routes: Vec<Route> = self
            .routes
            .into_iter()
            .map(|(method, pattern, handler)| {
                let sender = spawn_handler(&pattern, handler, stack_size);
                Route::new(method, &pattern, sender)
            })
            .collect();

        let router = Arc::new(Router::new(routes));
        let dispatcher = Dispatcher::new(router, self.middlewares, self.error_handler);
        info!(addr = %self.config.addr(), "service bound");
        Service {
            config: self.config,
            dispatcher,
        }
    }
}

/// An immutable, bound pipeline: the configuration the host applies at
/// listen time plus the dispatcher it feeds parsed requests into.
pub struct Service {
    pub config: ServerConfig,
    dispatcher: Dispatcher,
}

impl Service {
    /// Dispatch one parsed request against this service's pipeline.
    pub fn dispatch(&self, request: Request, stream: &mut dyn HttpStream) {
        self.dispatcher.dispatch(request, stream)
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}
