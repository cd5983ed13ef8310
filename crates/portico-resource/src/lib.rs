//! Declarative CRUD resources compiled into routes.
//!
//! A [`Resource`] names a route namespace and up to five verb handlers,
//! each supplied as a factory over the data-access layer. It is pure
//! configuration: nothing happens until [`compile_resource`] expands it
//! through the fixed verb table, or [`compile_resources`] compiles a
//! whole API surface (flattened in declaration order, terminated with
//! the JSON catch-all, enveloped, and namespaced under the API prefix).

use http::Method;

use portico_core::{BoxHandler, ResponseBody, Session};
use portico_router::{namespace_routes, not_found_json_route, Route};

/// A verb-handler factory over the data-access layer.
///
/// Factories receive the data layer by reference at compile time and
/// capture whatever they need into the handler they build.
pub type HandlerFactory<S, D> = Box<dyn Fn(&D) -> BoxHandler<S> + Send + Sync>;

/// A declarative CRUD resource.
///
/// # Example
///
/// ```rust,ignore
/// let widgets = Resource::new("widgets")
///     .read_one(|data: &Store| list_one_handler(data.clone()))
///     .read_many(|data: &Store| list_all_handler(data.clone()));
/// let routes = compile_resource(&widgets, &store);
/// ```
pub struct Resource<S, D> {
    route_namespace: String,
    create: Option<HandlerFactory<S, D>>,
    read_one: Option<HandlerFactory<S, D>>,
    read_many: Option<HandlerFactory<S, D>>,
    update: Option<HandlerFactory<S, D>>,
    delete: Option<HandlerFactory<S, D>>,
}

impl<S, D> std::fmt::Debug for Resource<S, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resource")
            .field("route_namespace", &self.route_namespace)
            .field("create", &self.create.is_some())
            .field("read_one", &self.read_one.is_some())
            .field("read_many", &self.read_many.is_some())
            .field("update", &self.update.is_some())
            .field("delete", &self.delete.is_some())
            .finish()
    }
}

impl<S: Session, D> Resource<S, D> {
    /// Creates a resource with no verbs under the given namespace.
    #[must_use]
    pub fn new(route_namespace: impl Into<String>) -> Self {
        Self {
            route_namespace: route_namespace.into(),
            create: None,
            read_one: None,
            read_many: None,
            update: None,
            delete: None,
        }
    }

    /// Returns the route namespace.
    #[must_use]
    pub fn route_namespace(&self) -> &str {
        &self.route_namespace
    }

    /// Supplies the `create` handler factory (POST `/{ns}`).
    #[must_use]
    pub fn create(mut self, factory: impl Fn(&D) -> BoxHandler<S> + Send + Sync + 'static) -> Self {
        self.create = Some(Box::new(factory));
        self
    }

    /// Supplies the `read_one` handler factory (GET `/{ns}/:id`).
    #[must_use]
    pub fn read_one(
        mut self,
        factory: impl Fn(&D) -> BoxHandler<S> + Send + Sync + 'static,
    ) -> Self {
        self.read_one = Some(Box::new(factory));
        self
    }

    /// Supplies the `read_many` handler factory (GET `/{ns}`).
    #[must_use]
    pub fn read_many(
        mut self,
        factory: impl Fn(&D) -> BoxHandler<S> + Send + Sync + 'static,
    ) -> Self {
        self.read_many = Some(Box::new(factory));
        self
    }

    /// Supplies the `update` handler factory (PUT `/{ns}/:id`).
    #[must_use]
    pub fn update(mut self, factory: impl Fn(&D) -> BoxHandler<S> + Send + Sync + 'static) -> Self {
        self.update = Some(Box::new(factory));
        self
    }

    /// Supplies the `delete` handler factory (DELETE `/{ns}/:id`).
    #[must_use]
    pub fn delete(mut self, factory: impl Fn(&D) -> BoxHandler<S> + Send + Sync + 'static) -> Self {
        self.delete = Some(Box::new(factory));
        self
    }
}

/// Compiles one resource through the fixed verb table.
///
/// Routes come out in verb-table order (create, `read_one`, `read_many`,
/// update, delete); omitted verbs produce no route. The compiler adds
/// nothing around the factory's handler.
#[must_use]
pub fn compile_resource<S: Session, D>(resource: &Resource<S, D>, data: &D) -> Vec<Route<S>> {
    let ns = resource.route_namespace();
    let collection = format!("/{ns}");
    let item = format!("/{ns}/:id");

    let table: [(&Option<HandlerFactory<S, D>>, Method, &str); 5] = [
        (&resource.create, Method::POST, &collection),
        (&resource.read_one, Method::GET, &item),
        (&resource.read_many, Method::GET, &collection),
        (&resource.update, Method::PUT, &item),
        (&resource.delete, Method::DELETE, &item),
    ];

    table
        .into_iter()
        .filter_map(|(slot, method, path)| {
            slot.as_ref()
                .map(|factory| Route::new(method, path, factory(data)))
        })
        .collect()
}

/// Compiles an ordered batch of resources into a complete API surface.
///
/// Resources flatten in declaration order, then the JSON catch-all is
/// appended so unknown API paths answer `404 {}` rather than falling
/// through to the front-end. Every response body is coerced to JSON,
/// and the whole batch lands under `api_prefix`.
#[must_use]
pub fn compile_resources<S: Session, D>(
    resources: &[Resource<S, D>],
    data: &D,
    api_prefix: &str,
) -> Vec<Route<S>> {
    let mut routes: Vec<Route<S>> = resources
        .iter()
        .flat_map(|resource| compile_resource(resource, data))
        .collect();
    routes.push(not_found_json_route());

    let routes = routes
        .into_iter()
        .map(|route| route.map_response(ResponseBody::into_json))
        .collect();
    namespace_routes(api_prefix, routes)
}
