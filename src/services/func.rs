use crate::{
    Container, InjectError, InjectResult, Instance, Request, RequestInfo,
    Service, ServiceInfo, Svc,
};
use std::{any::Any, marker::PhantomData};

/// A constructor for a service. All functions of arity 12 or less are
/// automatically service factories if each of their parameters is a valid
/// [`Request`] and the return value is a valid service type.
///
/// Registering a service factory with
/// [`Container::register_constructor`] is what lets the container
/// instantiate its result type.
///
/// ```
/// use dependency_container::{args, Container, Svc};
///
/// struct Config(u32);
/// struct Server {
///     port: u32,
/// }
///
/// impl Server {
///     pub fn new(config: Svc<Config>) -> Self {
///         Server { port: config.0 }
///     }
/// }
///
/// let mut container = Container::new();
/// container.add(Svc::new(Config(8080)));
/// container.register_constructor(Server::new);
///
/// let server: Server = container.instantiate(args![]).unwrap();
/// assert_eq!(8080, server.port);
/// ```
///
/// # Type parameters
/// * `D` - Parameters of this service factory as a tuple.
/// * `R` - Resulting service from invoking this service factory.
pub trait ServiceFactory<D, R>: Service
where
    R: Service,
{
    /// Invokes this service factory, resolving each parameter through the
    /// container.
    fn invoke(
        &self,
        container: &Container,
        info: RequestInfo<'_>,
    ) -> InjectResult<R>;
}

/// A method that can be invoked on an instance of `S`. All functions of
/// arity 13 or less whose first parameter is `&S` are automatically methods
/// if each of their other parameters is a valid [`Request`].
///
/// ```
/// use dependency_container::{args, Container, Svc};
///
/// struct Counter(u32);
/// struct Game;
///
/// impl Game {
///     fn score(&self, counter: Svc<Counter>) -> u32 {
///         counter.0 * 10
///     }
/// }
///
/// let mut container = Container::new();
/// container.add(Svc::new(Counter(4)));
///
/// let score = container.invoke_with(&Game, Game::score, args![]).unwrap();
/// assert_eq!(40, score);
/// ```
pub trait Method<S, D, R>: Service
where
    S: ?Sized,
    R: 'static,
{
    /// Invokes this method on `target`, resolving each remaining parameter
    /// through the container.
    fn call(
        &self,
        target: &S,
        container: &Container,
        info: RequestInfo<'_>,
    ) -> InjectResult<R>;
}

/// Walks the parameters of a factory or method in declaration order.
pub(crate) struct Parameters<'a> {
    container: &'a Container,
    info: RequestInfo<'a>,
    index: usize,
}

impl<'a> Parameters<'a> {
    pub(crate) fn new(container: &'a Container, info: RequestInfo<'a>) -> Self {
        Parameters {
            container,
            info,
            index: 0,
        }
    }

    pub(crate) fn next<P: Request>(&mut self) -> InjectResult<P> {
        let info = self.info.with_parameter(self.index);
        self.index += 1;
        crate::requests::request_parameter(self.container, info)
    }
}

macro_rules! impl_service_factory {
    () => {
        impl_service_factory!(@impl ());
    };
    ($first:ident $(, $rest:ident)*) => {
        impl_service_factory!(@impl ($first $(, $rest)*));
        impl_service_factory!($($rest),*);
    };
    (@impl ($($type_name:ident),*)) => {
        impl<F, R $(, $type_name)*> ServiceFactory<($($type_name,)*), R> for F
        where
            F: Service + Fn($($type_name),*) -> R,
            R: Service,
            $($type_name: Request,)*
        {
            #[allow(unused_variables, unused_mut)]
            fn invoke(
                &self,
                container: &Container,
                info: RequestInfo<'_>,
            ) -> InjectResult<R> {
                let mut parameters = Parameters::new(container, info);
                Ok(self($(parameters.next::<$type_name>()?),*))
            }
        }

        impl<F, S, R $(, $type_name)*> Method<S, ($($type_name,)*), R> for F
        where
            F: Service + Fn(&S $(, $type_name)*) -> R,
            S: ?Sized,
            R: 'static,
            $($type_name: Request,)*
        {
            #[allow(unused_variables, unused_mut)]
            fn call(
                &self,
                target: &S,
                container: &Container,
                info: RequestInfo<'_>,
            ) -> InjectResult<R> {
                let mut parameters = Parameters::new(container, info);
                Ok(self(target $(, parameters.next::<$type_name>()?)*))
            }
        }
    };
}

impl_service_factory!(T0, T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11);

/// Object-safe view of a [`ServiceFactory`] with its type parameters fixed.
trait ErasedFactory: Service {
    fn build(
        &self,
        container: &Container,
        info: RequestInfo<'_>,
    ) -> InjectResult<Box<dyn Any>>;

    fn into_instance(&self, value: Box<dyn Any>) -> Option<Instance>;
}

struct TypedFactory<F, D, R> {
    factory: F,
    marker: PhantomData<fn() -> (D, R)>,
}

impl<F, D, R> ErasedFactory for TypedFactory<F, D, R>
where
    F: ServiceFactory<D, R>,
    D: 'static,
    R: Service,
{
    fn build(
        &self,
        container: &Container,
        info: RequestInfo<'_>,
    ) -> InjectResult<Box<dyn Any>> {
        let result = self.factory.invoke(container, info)?;
        Ok(Box::new(result))
    }

    fn into_instance(&self, value: Box<dyn Any>) -> Option<Instance> {
        let value = value.downcast::<R>().ok()?;
        Some(Instance::new::<R>(Svc::new(*value)))
    }
}

/// A type-erased service factory registered for a single result type.
pub(crate) struct Constructor {
    result: ServiceInfo,
    factory: Box<dyn ErasedFactory>,
}

impl Constructor {
    pub(crate) fn new<F, D, R>(factory: F) -> Self
    where
        F: ServiceFactory<D, R>,
        D: 'static,
        R: Service,
    {
        Constructor {
            result: ServiceInfo::of::<R>(),
            factory: Box::new(TypedFactory {
                factory,
                marker: PhantomData,
            }),
        }
    }

    pub(crate) fn result(&self) -> ServiceInfo {
        self.result
    }

    /// Constructs a new value of the result type.
    pub(crate) fn build(
        &self,
        container: &Container,
        info: RequestInfo<'_>,
    ) -> InjectResult<Box<dyn Any>> {
        self.factory.build(container, info)
    }

    /// Moves a value built by this constructor into a new service pointer.
    pub(crate) fn into_instance(
        &self,
        value: Box<dyn Any>,
    ) -> InjectResult<Instance> {
        self.factory.into_instance(value).ok_or_else(|| {
            InjectError::InternalError(format!(
                "constructor for {} built a value of another type",
                self.result.name()
            ))
        })
    }
}

/// Object-safe view of a [`Method`] with its type parameters fixed.
trait ErasedMethod: Service {
    fn call(
        &self,
        receiver: &dyn Any,
        container: &Container,
        info: RequestInfo<'_>,
    ) -> InjectResult<Box<dyn Any>>;
}

struct TypedMethod<M, S, D, R> {
    method: M,
    marker: PhantomData<fn() -> (S, D, R)>,
}

impl<M, S, D, R> ErasedMethod for TypedMethod<M, S, D, R>
where
    M: Method<S, D, R>,
    S: Service,
    D: 'static,
    R: 'static,
{
    fn call(
        &self,
        receiver: &dyn Any,
        container: &Container,
        info: RequestInfo<'_>,
    ) -> InjectResult<Box<dyn Any>> {
        let receiver = receiver.downcast_ref::<S>().ok_or_else(|| {
            InjectError::InternalError(format!(
                "method registered for {} received another type",
                std::any::type_name::<S>()
            ))
        })?;
        let result = self.method.call(receiver, container, info)?;
        Ok(Box::new(result))
    }
}

/// A type-erased method registered under a name for a receiver type.
pub(crate) struct MethodDescriptor {
    output: ServiceInfo,
    method: Box<dyn ErasedMethod>,
}

impl MethodDescriptor {
    pub(crate) fn new<M, S, D, R>(method: M) -> Self
    where
        M: Method<S, D, R>,
        S: Service,
        D: 'static,
        R: 'static,
    {
        MethodDescriptor {
            output: ServiceInfo::of::<R>(),
            method: Box::new(TypedMethod {
                method,
                marker: PhantomData,
            }),
        }
    }

    pub(crate) fn output(&self) -> ServiceInfo {
        self.output
    }

    /// Calls the method on `receiver` and recovers its return value as `R`.
    pub(crate) fn call<R: 'static>(
        &self,
        receiver: &dyn Any,
        container: &Container,
        info: RequestInfo<'_>,
    ) -> InjectResult<R> {
        let result = self.method.call(receiver, container, info)?;
        result.downcast::<R>().map(|result| *result).map_err(|_| {
            InjectError::TypeMismatch {
                expected: ServiceInfo::of::<R>(),
                actual: self.output,
            }
        })
    }
}
