use crate::{services::AnySvc, Interface, Service, ServiceInfo, Svc};
use std::fmt::{Debug, Formatter};

/// A type-erased service pointer together with the type it is stored under.
///
/// Every instance remembers the address of the object it points to. Two
/// instances created from the same allocation share that identity even when
/// they are stored under different types, which is how the
/// [`Registry`](crate::Registry) tells duplicates apart.
///
/// ```
/// use dependency_container::{Instance, ServiceInfo, Svc};
///
/// let value = Svc::new(12i32);
/// let instance = Instance::new(value.clone());
///
/// assert_eq!(ServiceInfo::of::<i32>(), instance.info());
/// assert!(Svc::ptr_eq(&value, &instance.downcast::<i32>().unwrap()));
/// assert!(instance.downcast::<u32>().is_none());
/// ```
#[derive(Clone)]
pub struct Instance {
    info: ServiceInfo,
    implementation: Option<ServiceInfo>,
    identity: usize,
    interface: bool,
    service: AnySvc,
}

impl Instance {
    /// Wraps a service pointer so that it can be stored under `I`.
    #[must_use]
    pub fn new<I: ?Sized + Service>(service: Svc<I>) -> Self {
        Self::from_parts(service, None, false)
    }

    /// Wraps a service pointer to the interface `I` that was created from an
    /// instance of `T`.
    ///
    /// This is usually called by the [`implements!`](crate::implements)
    /// macro.
    #[must_use]
    pub fn implementing<T, I>(service: Svc<I>) -> Self
    where
        T: Service,
        I: ?Sized + Interface,
    {
        Self::from_parts(service, Some(ServiceInfo::of::<T>()), true)
    }

    fn from_parts<I: ?Sized + Service>(
        service: Svc<I>,
        implementation: Option<ServiceInfo>,
        interface: bool,
    ) -> Self {
        let identity = Svc::as_ptr(&service).cast::<()>() as usize;
        let service: AnySvc = Svc::new(service);
        Instance {
            info: ServiceInfo::of::<I>(),
            implementation,
            identity,
            interface,
            service,
        }
    }

    /// Gets the type this instance is stored under.
    #[must_use]
    pub fn info(&self) -> ServiceInfo {
        self.info
    }

    /// Gets the concrete type of the instance, if it is known.
    #[must_use]
    pub fn implementation(&self) -> Option<ServiceInfo> {
        self.implementation
    }

    /// Gets whether this instance was created as a view of an interface.
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.interface
    }

    /// Gets whether both instances point to the same object.
    #[must_use]
    pub fn same_object(&self, other: &Instance) -> bool {
        self.identity == other.identity
    }

    /// Recovers the typed service pointer, if this instance is stored as `I`.
    #[must_use]
    pub fn downcast<I: ?Sized + Service>(&self) -> Option<Svc<I>> {
        self.downcast_ref::<Svc<I>>().cloned()
    }

    /// Gets a reference to the stored service pointer if it has type `P`.
    pub(crate) fn downcast_ref<P: 'static>(&self) -> Option<&P> {
        self.service.downcast_ref::<P>()
    }
}

impl Debug for Instance {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instance")
            .field("info", &self.info.name())
            .field(
                "implementation",
                &self.implementation.map(|info| info.name()),
            )
            .finish_non_exhaustive()
    }
}
