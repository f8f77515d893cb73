use crate::{
    Container, InjectResult, Instance, Interfaces, Request, RequestInfo,
    Service, Svc,
};
use std::{
    any::Any,
    fmt::{Debug, Formatter},
    ops::{Deref, DerefMut},
};

/// An explicitly supplied argument value.
trait Parameter: Any {
    fn clone_dyn(&self) -> Box<dyn Parameter>;

    fn as_any(&self) -> &dyn Any;

    fn type_name(&self) -> &'static str;
}

impl<T: Any + Clone> Parameter for T {
    fn clone_dyn(&self) -> Box<dyn Parameter> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

impl Clone for Box<dyn Parameter> {
    fn clone(&self) -> Self {
        (**self).clone_dyn()
    }
}

/// One supplied argument. A service supplied with
/// [`Args::with_service`] can be seen as several types.
#[derive(Clone)]
enum ArgValue {
    Value(Box<dyn Parameter>),
    Service(Vec<Instance>),
}

impl ArgValue {
    fn find<P: Any + Clone>(&self) -> Option<P> {
        match self {
            ArgValue::Value(value) => {
                (**value).as_any().downcast_ref::<P>().cloned()
            }
            ArgValue::Service(views) => views
                .iter()
                .find_map(|view| view.downcast_ref::<P>())
                .cloned(),
        }
    }
}

/// A pool of explicitly supplied arguments for an instantiation or method
/// invocation.
///
/// Before a parameter is resolved from the container, the pool is searched
/// in order for a value of the parameter's type. The first match is bound.
/// Values are not consumed, so one value can satisfy several parameters of
/// the same type.
///
/// ```
/// use dependency_container::{args, Svc};
///
/// let args = args![Svc::new(3u8), "debug".to_owned()];
/// assert_eq!(2, args.len());
/// assert_eq!(3, *args.find::<Svc<u8>>().unwrap());
/// assert_eq!("debug", args.find::<String>().unwrap());
/// assert!(args.find::<Svc<u16>>().is_none());
/// ```
#[derive(Clone, Default)]
pub struct Args {
    values: Vec<ArgValue>,
}

impl Args {
    /// Creates an empty argument pool.
    #[must_use]
    pub fn new() -> Self {
        Args::default()
    }

    /// Adds a value to the pool. It can be bound to parameters of exactly
    /// type `T`, and to [`Arg<T>`] parameters.
    #[must_use]
    pub fn with<T: Any + Clone>(mut self, value: T) -> Self {
        self.push(value);
        self
    }

    /// Adds a service to the pool. It can be bound to `Svc<T>` parameters as
    /// well as `Svc<dyn I>` parameters for every interface `I` that `T`
    /// implements.
    #[must_use]
    pub fn with_service<T: Interfaces>(mut self, service: Svc<T>) -> Self {
        self.push_service(service);
        self
    }

    /// Adds a value to the pool.
    pub fn push<T: Any + Clone>(&mut self, value: T) {
        self.values.push(ArgValue::Value(Box::new(value)));
    }

    /// Adds a service, viewable as each of its interfaces, to the pool.
    pub fn push_service<T: Interfaces>(&mut self, service: Svc<T>) {
        let mut views = T::interfaces(&service);
        views.insert(0, Instance::new(service));
        self.values.push(ArgValue::Service(views));
    }

    /// Finds the first supplied value that can be bound as a `P`.
    #[must_use]
    pub fn find<P: Any + Clone>(&self) -> Option<P> {
        self.values.iter().find_map(ArgValue::find::<P>)
    }

    /// Gets the number of supplied values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Gets whether no values were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Debug for Args {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.values.iter().map(|value| match value {
                ArgValue::Value(value) => (**value).type_name(),
                ArgValue::Service(views) => views
                    .first()
                    .map_or("<service>", |view| view.info().name()),
            }))
            .finish()
    }
}

/// Creates an [`Args`] pool from a list of values.
///
/// ```
/// use dependency_container::args;
///
/// let empty = args![];
/// assert!(empty.is_empty());
///
/// let args = args![1u32, 'x'];
/// assert_eq!(Some('x'), args.find::<char>());
/// ```
#[macro_export]
macro_rules! args {
    ($($value:expr),* $(,)?) => {
        {
            #[allow(unused_mut)]
            let mut args = $crate::Args::new();
            $(args.push($value);)*
            args
        }
    };
}

/// A plain value passed to a service, rather than a service pointer.
///
/// The value is taken from the explicitly supplied arguments if one of type
/// `T` was given. Otherwise the single registered `T` is cloned. If neither
/// exists, resolution fails.
///
/// ## Example
///
/// ```
/// use dependency_container::{args, Arg, Container};
///
/// struct Pool {
///     size: usize,
/// }
///
/// impl Pool {
///     pub fn new(size: Arg<usize>) -> Self {
///         Pool { size: Arg::into_inner(size) }
///     }
/// }
///
/// let mut container = Container::new();
/// container.register_constructor(Pool::new);
///
/// let pool: Pool = container.instantiate(args![16usize]).unwrap();
/// assert_eq!(16, pool.size);
/// assert!(container.instantiate::<Pool>(args![]).is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Arg<T: Service + Clone>(T);

impl<T: Service + Clone> Arg<T> {
    /// Converts an argument into its inner value.
    pub fn into_inner(arg: Self) -> T {
        arg.0
    }
}

impl<T: Service + Clone> Deref for Arg<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: Service + Clone> DerefMut for Arg<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T: Service + Clone> Request for Arg<T> {
    fn request(container: &Container, info: RequestInfo<'_>) -> InjectResult<Self> {
        if let Some(value) = info.args().find::<T>() {
            return Ok(Arg(value));
        }

        container
            .try_get::<T>()
            .map(|value| Arg(T::clone(&value)))
            .ok_or_else(|| info.unresolved::<T>())
    }
}
