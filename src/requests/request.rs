use crate::{Container, InjectResult, RequestInfo, Service, Services, Svc};
use std::{
    any::Any,
    collections::VecDeque,
    fmt::{Debug, Formatter},
    ops::Deref,
};
use tracing::trace;

/// A parameter that the container knows how to supply.
///
/// Before [`Request::request`] is consulted, the explicitly supplied
/// [`Args`](crate::Args) are searched for a value of the parameter's exact
/// type, which is why requests must be cloneable.
///
/// # Grouping requests
///
/// Requests can be grouped together by using tuples to make multiple requests
/// at once. Since there is a limit of 12 supported parameters for factories,
/// tuples can also be used to get around that limitation.
///
/// ```
/// use dependency_container::{args, Container, Svc};
///
/// struct Bar;
/// struct Baz;
/// struct Foo(Svc<Bar>, Svc<Baz>);
///
/// impl Foo {
///     pub fn new((bar, baz): (Svc<Bar>, Svc<Baz>)) -> Self {
///         Foo(bar, baz)
///     }
/// }
///
/// let mut container = Container::new();
/// container.add(Svc::new(Bar));
/// container.add(Svc::new(Baz));
/// container.register_constructor(Foo::new);
///
/// let _foo: Foo = container.instantiate(args![]).unwrap();
/// ```
pub trait Request: Any + Clone {
    /// Resolves this parameter from the container.
    fn request(container: &Container, info: RequestInfo<'_>) -> InjectResult<Self>;
}

/// Resolves one parameter: an explicit argument of the parameter's type is
/// preferred over anything the container would supply.
pub(crate) fn request_parameter<P: Request>(
    container: &Container,
    info: RequestInfo<'_>,
) -> InjectResult<P> {
    if let Some(value) = info.args().find::<P>() {
        trace!(
            parameter = info.parameter(),
            parameter_type = std::any::type_name::<P>(),
            "bound explicit argument"
        );
        return Ok(value);
    }

    P::request(container, info)
}

/// Requests the single registered instance of a service or interface. This
/// request fails if there is not exactly one.
impl<I: ?Sized + Service> Request for Svc<I> {
    fn request(container: &Container, info: RequestInfo<'_>) -> InjectResult<Self> {
        container
            .try_get::<I>()
            .ok_or_else(|| info.unresolved::<I>())
    }
}

/// Requests a supplied or the single registered instance of a service or
/// interface, or `None` if there is neither.
impl<I: ?Sized + Service> Request for Option<Svc<I>> {
    fn request(container: &Container, info: RequestInfo<'_>) -> InjectResult<Self> {
        Ok(info
            .args()
            .find::<Svc<I>>()
            .or_else(|| container.try_get::<I>()))
    }
}

/// Requests every registered instance of a service or interface.
impl<I: ?Sized + Service> Request for Services<I> {
    fn request(container: &Container, _info: RequestInfo<'_>) -> InjectResult<Self> {
        Ok(container.get_all::<I>().into_iter().collect())
    }
}

/// Requests every registered instance of a service or interface. If nothing
/// is registered, this is an empty [`Vec<T>`].
impl<I: ?Sized + Service> Request for Vec<Svc<I>> {
    fn request(container: &Container, _info: RequestInfo<'_>) -> InjectResult<Self> {
        Ok(container.get_all::<I>())
    }
}

/// Requests every registered instance of a service or interface.
impl<I: ?Sized + Service> Request for VecDeque<Svc<I>> {
    fn request(container: &Container, _info: RequestInfo<'_>) -> InjectResult<Self> {
        Ok(container.get_all::<I>().into())
    }
}

/// Requests every registered instance of a service or interface.
impl<I: ?Sized + Service> Request for Box<[Svc<I>]> {
    fn request(container: &Container, _info: RequestInfo<'_>) -> InjectResult<Self> {
        Ok(container.get_all::<I>().into_boxed_slice())
    }
}

/// A service that falls back to its [`Default`] value when none was supplied
/// and there is not exactly one instance registered. A supplied `Svc<T>` is
/// bound like it would be for a plain `Svc<T>` parameter.
///
/// ```
/// use dependency_container::{args, Container, OrDefault, Svc};
///
/// #[derive(Default)]
/// struct Retries {
///     count: u32,
/// }
///
/// struct Client {
///     retries: u32,
/// }
///
/// impl Client {
///     pub fn new(retries: OrDefault<Retries>) -> Self {
///         Client { retries: retries.count }
///     }
/// }
///
/// let mut container = Container::new();
/// container.register_constructor(Client::new);
/// let client: Client = container.instantiate(args![]).unwrap();
/// assert_eq!(0, client.retries);
///
/// container.add(Svc::new(Retries { count: 3 }));
/// let client: Client = container.instantiate(args![]).unwrap();
/// assert_eq!(3, client.retries);
/// ```
pub struct OrDefault<T: Service + Default>(Svc<T>);

impl<T: Service + Default> OrDefault<T> {
    /// Converts this request into the service pointer it holds.
    pub fn into_inner(value: Self) -> Svc<T> {
        value.0
    }
}

impl<T: Service + Default> Clone for OrDefault<T> {
    fn clone(&self) -> Self {
        OrDefault(self.0.clone())
    }
}

impl<T: Service + Default + Debug> Debug for OrDefault<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("OrDefault").field(&self.0).finish()
    }
}

impl<T: Service + Default> Deref for OrDefault<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: Service + Default> Request for OrDefault<T> {
    fn request(container: &Container, info: RequestInfo<'_>) -> InjectResult<Self> {
        let service = info
            .args()
            .find::<Svc<T>>()
            .or_else(|| container.try_get::<T>())
            .unwrap_or_else(|| Svc::new(T::default()));
        Ok(OrDefault(service))
    }
}

macro_rules! impl_tuple_request {
    () => {
        impl_tuple_request!(@impl ());
    };
    ($first:ident $(, $rest:ident)*) => {
        impl_tuple_request!(@impl ($first $(, $rest)*));
        impl_tuple_request!($($rest),*);
    };
    (@impl ($($type_name:ident),*)) => {
        /// Performs multiple requests at once. This is useful for grouping
        /// together related requests.
        impl <$($type_name),*> Request for ($($type_name,)*)
        where
            $($type_name: Request,)*
        {
            #[allow(unused_variables)]
            fn request(container: &Container, info: RequestInfo<'_>) -> InjectResult<Self> {
                let result = ($(request_parameter::<$type_name>(container, info)?,)*);
                Ok(result)
            }
        }
    };
}

impl_tuple_request!(T0, T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11);
