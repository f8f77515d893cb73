use crate::{
    Args, Container, InjectError, InjectResult, Instance, Service, ServiceInfo,
    Svc,
};

/// Something that can look up and create instances. [`Container`] is the
/// implementation provided by this crate, but anything able to answer these
/// requests can stand in for it.
///
/// This trait is object safe. Typed versions of each method are provided by
/// [`ResolverExt`].
pub trait Resolver {
    /// Gets the single instance registered for `service_info`.
    ///
    /// # Errors
    ///
    /// Returns [`InjectError::NotFound`] unless exactly one instance is
    /// registered.
    fn resolve_instance(&self, service_info: ServiceInfo) -> InjectResult<Instance>;

    /// Gets the single instance registered for `service_info`, if there is
    /// exactly one.
    fn try_resolve_instance(&self, service_info: ServiceInfo) -> Option<Instance>;

    /// Gets every instance registered for `service_info`.
    fn resolve_all_instances(&self, service_info: ServiceInfo) -> Vec<Instance>;

    /// Creates a new, unregistered instance of the type described by
    /// `service_info`.
    ///
    /// # Errors
    ///
    /// Returns an error if the type cannot be constructed.
    fn instantiate_instance(
        &self,
        service_info: ServiceInfo,
        args: Args,
    ) -> InjectResult<Instance>;
}

impl Resolver for Container {
    fn resolve_instance(&self, service_info: ServiceInfo) -> InjectResult<Instance> {
        self.try_resolve_instance(service_info)
            .ok_or_else(|| InjectError::NotFound {
                service_info,
                candidates: self.registry().count(service_info),
            })
    }

    fn try_resolve_instance(&self, service_info: ServiceInfo) -> Option<Instance> {
        self.registry().get_single(service_info).cloned()
    }

    fn resolve_all_instances(&self, service_info: ServiceInfo) -> Vec<Instance> {
        self.registry().get_all(service_info).to_vec()
    }

    fn instantiate_instance(
        &self,
        service_info: ServiceInfo,
        args: Args,
    ) -> InjectResult<Instance> {
        Container::instantiate_instance(self, service_info, args)
    }
}

/// Typed access to a [`Resolver`].
///
/// ```
/// use dependency_container::{args, Container, Resolver, ResolverExt, Svc};
///
/// #[derive(Default)]
/// struct Clock;
///
/// fn has_clock(resolver: &dyn Resolver) -> bool {
///     resolver.try_resolve::<Clock>().is_some()
/// }
///
/// let mut container = Container::new();
/// container.register_constructor(Clock::default);
/// assert!(!has_clock(&container));
///
/// let clock: Svc<Clock> = container.instantiate_as(args![]).unwrap();
/// container.add(clock);
/// assert!(has_clock(&container));
/// ```
pub trait ResolverExt: Resolver {
    /// Gets the single instance registered for `T`.
    ///
    /// # Errors
    ///
    /// Returns [`InjectError::NotFound`] unless exactly one instance is
    /// registered.
    fn resolve<T: ?Sized + Service>(&self) -> InjectResult<Svc<T>> {
        let instance = self.resolve_instance(ServiceInfo::of::<T>())?;
        downcast_instance(&instance)
    }

    /// Gets the single instance registered for `T`, if there is exactly one.
    fn try_resolve<T: ?Sized + Service>(&self) -> Option<Svc<T>> {
        self.try_resolve_instance(ServiceInfo::of::<T>())
            .and_then(|instance| instance.downcast::<T>())
    }

    /// Gets every instance registered for `T`.
    fn resolve_all<T: ?Sized + Service>(&self) -> Vec<Svc<T>> {
        self.resolve_all_instances(ServiceInfo::of::<T>())
            .iter()
            .filter_map(Instance::downcast::<T>)
            .collect()
    }

    /// Creates a new, unregistered `T` in a fresh service pointer.
    ///
    /// # Errors
    ///
    /// Returns an error if `T` cannot be constructed.
    fn instantiate_as<T: Service>(&self, args: Args) -> InjectResult<Svc<T>> {
        let instance = self.instantiate_instance(ServiceInfo::of::<T>(), args)?;
        downcast_instance(&instance)
    }
}

impl<R: ?Sized + Resolver> ResolverExt for R {}

fn downcast_instance<T: ?Sized + Service>(instance: &Instance) -> InjectResult<Svc<T>> {
    instance.downcast::<T>().ok_or(InjectError::TypeMismatch {
        expected: ServiceInfo::of::<T>(),
        actual: instance.info(),
    })
}
