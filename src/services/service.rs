use crate::Activation;
use derive_more::{Display, Error};
use std::any::{Any, TypeId};

#[cfg(feature = "arc")]
mod types {
    use crate::InjectError;
    use std::{any::Any, sync::Arc};

    /// A reference-counted pointer holding a service. The pointer type is
    /// determined by the feature flags passed to this crate.
    pub type Svc<T> = Arc<T>;

    /// A reference-counted pointer holding a type-erased service pointer.
    pub(crate) type AnySvc = Arc<dyn Any + Send + Sync>;

    /// A result from attempting to resolve, construct or invoke something
    /// through the container.
    pub type InjectResult<T> = Result<T, InjectError>;

    /// Implemented automatically on types that are capable of being a service.
    pub trait Service: Any + Send + Sync {}
    impl<T: ?Sized + Any + Send + Sync> Service for T {}
}

#[cfg(feature = "rc")]
mod types {
    use crate::InjectError;
    use std::{any::Any, rc::Rc};

    /// A reference-counted pointer holding a service. The pointer type is
    /// determined by the feature flags passed to this crate.
    pub type Svc<T> = Rc<T>;

    /// A reference-counted pointer holding a type-erased service pointer.
    pub(crate) type AnySvc = Rc<dyn Any>;

    /// A result from attempting to resolve, construct or invoke something
    /// through the container.
    pub type InjectResult<T> = Result<T, InjectError>;

    /// Implemented automatically on types that are capable of being a service.
    pub trait Service: Any {}
    impl<T: ?Sized + Any> Service for T {}
}

pub use types::{InjectResult, Service, Svc};
pub(crate) use types::AnySvc;

/// Type information about a service. This is the key instances are stored
/// under in a [`Registry`](crate::Registry).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct ServiceInfo {
    id: TypeId,
    name: &'static str,
}

impl ServiceInfo {
    /// Creates a [`ServiceInfo`] for the given type.
    #[inline]
    #[must_use]
    pub fn of<T: ?Sized + Any>() -> Self {
        ServiceInfo {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Gets the [`TypeId`] for this service.
    #[inline]
    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Gets the type name of this service.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// An error that has occurred while registering, resolving, constructing or
/// invoking through the container.
#[derive(Debug, Display, Error)]
#[non_exhaustive]
pub enum InjectError {
    /// No single instance is registered for the requested type. This is
    /// returned both when nothing is registered and when several instances
    /// are; `candidates` tells the two apart.
    #[display(
        fmt = "no single instance found for {} ({} registered)",
        "service_info.name()",
        candidates
    )]
    NotFound {
        /// The service that was requested.
        service_info: ServiceInfo,
        /// How many instances are registered for the service.
        candidates: usize,
    },

    /// The requested type does not have exactly one registered constructor.
    #[display(
        fmt = "{} must have exactly one constructor but has {}",
        "service_info.name()",
        constructors
    )]
    AmbiguousConstructor {
        /// The service that was requested.
        service_info: ServiceInfo,
        /// How many constructors are registered for the service.
        constructors: usize,
    },

    /// The requested type is an interface and cannot be instantiated.
    #[display(fmt = "cannot instantiate abstract type {}", "service_info.name()")]
    AbstractType {
        /// The service that was requested.
        service_info: ServiceInfo,
    },

    /// No method with the given name is registered for the target type.
    #[display(fmt = "method {} not found on {}", method, "service_info.name()")]
    MethodNotFound {
        /// The type the method was looked up on.
        service_info: ServiceInfo,
        /// The name of the method.
        method: String,
    },

    /// A parameter has no explicit argument, no registered value and no
    /// default.
    #[display(
        fmt = "cannot resolve {} for parameter {} while {}",
        "parameter.name()",
        index,
        activation
    )]
    UnresolvedParameter {
        /// The declared type of the parameter.
        parameter: ServiceInfo,
        /// The zero-based position of the parameter.
        index: usize,
        /// What the container was doing when the parameter was requested.
        activation: Activation,
    },

    /// A value was used as a type it is not.
    #[display(
        fmt = "expected {} but got {}",
        "expected.name()",
        "actual.name()"
    )]
    TypeMismatch {
        /// The type that was required.
        expected: ServiceInfo,
        /// The type that was supplied.
        actual: ServiceInfo,
    },

    /// An unexpected error has occurred. This is usually caused by a bug in
    /// the library itself.
    #[display(fmt = "an unexpected error occurred (please report this): {}", _0)]
    InternalError(#[error(ignore)] String),
}
