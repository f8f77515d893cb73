//! A lightweight dependency injection container.
//!
//! The [`Container`] stores instances indexed by the types they can be
//! requested as, and creates new objects by resolving the parameters of
//! their constructors and methods from what it has stored. It is meant to be
//! the composition root of an application: services are added to it once at
//! startup, and everything else is wired from there.
//!
//! By default, services held by the container are not thread-safe. This is
//! because `Rc<T>` is used to hold instances of the services, which is not a
//! thread-safe pointer type. This can be changed by disabling default
//! features and enabling the "arc" feature:
//!
//! ```text
//! dependency_container = {
//!     version = "*",
//!     default_features = false,
//!     features = ["arc"]
//! }
//! ```
//!
//! With the "arc" feature, every service must be `Send + Sync` and the
//! container itself can be shared between threads behind a lock.
//!
//! # Registering instances
//!
//! Instances are stored under one or more keys:
//!
//! - [`Container::add`] stores an instance under its own type.
//! - [`Container::add_interfaces`] stores it under every interface its type
//!   declares with [`implements!`].
//! - [`Container::add_interfaces_and_self`] does both.
//!
//! Each has an `add_new*` counterpart that instantiates the type first. The
//! same object is never stored twice under one key.
//!
//! # Interfaces
//!
//! Interfaces are trait objects. A trait becomes an interface with the
//! [`interface!`] macro, and a type declares which interfaces it implements
//! with the [`implements!`] macro. Requesting `Svc<dyn Trait>` then yields
//! whichever instance was stored under that interface, without caring about
//! its concrete type.
//!
//! # Constructors and methods
//!
//! Any function of up to 12 parameters can be registered as a constructor
//! with [`Container::register_constructor`] or as a named method with
//! [`Container::register_method`], as long as each parameter is a
//! [`Request`]. Parameters are bound from explicitly supplied [`Args`]
//! first, and otherwise from the container:
//!
//! - `Svc<T>`: the single instance of `T`. Fails if there is not exactly one.
//! - `Option<Svc<T>>`: the single instance of `T`, or `None`.
//! - [`OrDefault<T>`]: the single instance of `T`, or `T::default()`.
//! - [`Services<T>`], `Vec<Svc<T>>`, `VecDeque<Svc<T>>`, `Box<[Svc<T>]>`:
//!   every instance of `T`, possibly none.
//! - [`Arg<T>`]: a plain value from the supplied arguments, or a clone of the
//!   single instance of `T`.
//!
//! # Example
//!
//! ```
//! use dependency_container::{
//!     args, implements, interface, Container, Service, Services, Svc,
//! };
//!
//! struct User;
//!
//! // This is our interface. The `Service` supertrait makes it usable with
//! // both the "rc" and "arc" features.
//! trait DataService: Service {
//!     fn get_user(&self, user_id: &str) -> Option<User>;
//! }
//! interface!(DataService);
//!
//! #[derive(Default)]
//! struct MockDataService;
//! impl DataService for MockDataService {
//!     fn get_user(&self, _user_id: &str) -> Option<User> {
//!         Some(User)
//!     }
//! }
//! implements!(MockDataService: DataService);
//!
//! // This service depends on our data service, however it doesn't care how
//! // that service is actually implemented.
//! struct UserService {
//!     data_service: Svc<dyn DataService>,
//! }
//!
//! impl UserService {
//!     // This is just a normal constructor. The only requirement is that each
//!     // parameter is a valid request.
//!     pub fn new(data_service: Svc<dyn DataService>) -> Self {
//!         UserService { data_service }
//!     }
//!
//!     pub fn get_user(&self, user_id: &str) -> Option<User> {
//!         self.data_service.get_user(user_id)
//!     }
//! }
//!
//! let mut container = Container::new();
//! container.register_constructor(MockDataService::default);
//! container.register_constructor(UserService::new);
//!
//! container.add_new_interfaces::<MockDataService>(args![]).unwrap();
//! let user_service = container.add_new::<UserService>(args![]).unwrap();
//! assert!(user_service.get_user("john").is_some());
//!
//! let data_services: Services<dyn DataService> =
//!     container.get_all::<dyn DataService>().into_iter().collect();
//! assert_eq!(1, data_services.len());
//! ```

#![forbid(unsafe_code)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::needless_pass_by_value
)]

#[cfg(not(any(feature = "arc", feature = "rc")))]
compile_error!(
    "Either the 'arc' or 'rc' feature must be enabled (but not both)."
);

#[cfg(all(feature = "arc", feature = "rc"))]
compile_error!(
    "The 'arc' and 'rc' features are mutually exclusive and cannot be enabled together."
);

mod container;
mod iter;
mod registry;
mod requests;
mod resolver;
mod services;

pub use container::*;
pub use iter::*;
pub use registry::*;
pub use requests::*;
pub use resolver::*;
pub use services::*;

#[cfg(test)]
mod tests;
