use crate::{Instance, Service, Svc};

/// Marker trait for interfaces. Interfaces are trait objects (`dyn Trait`)
/// that services can be registered and requested as. This trait should
/// usually be implemented by the [`interface!`] macro.
///
/// With the "arc" feature enabled, the trait must be a subtrait of [`Send`]
/// and [`Sync`]. Making your interface a subtrait of [`Service`] takes care
/// of this regardless of the feature used.
pub trait Interface: Service {}

/// Lists the interfaces a service type implements. This is what
/// [`Container::add_interfaces`](crate::Container::add_interfaces) uses to
/// decide which keys an instance is stored under. This trait should usually
/// be implemented by the [`implements!`] macro.
pub trait Interfaces: Service + Sized {
    /// Creates one [`Instance`] per interface implemented by this type, each
    /// pointing at `service`.
    fn interfaces(service: &Svc<Self>) -> Vec<Instance>;
}

/// Marks one or more traits as interfaces.
///
/// ## Example
///
/// ```
/// use dependency_container::{interface, Service};
///
/// trait Logger: Service {}
/// trait Plugin: Service {}
///
/// interface!(Logger, Plugin);
/// ```
#[macro_export]
macro_rules! interface {
    ($($interface:ident),+ $(,)?) => {
        $(impl $crate::Interface for dyn $interface {})+
    };
}

/// Declares which interfaces a service type implements. A type that
/// implements no interfaces can still be declared, in which case adding it
/// by its interfaces stores nothing.
///
/// ## Example
///
/// ```
/// use dependency_container::{implements, interface, Container, Service, Svc};
///
/// trait Plugin: Service {}
/// trait Named: Service {}
/// interface!(Plugin, Named);
///
/// struct Audio;
/// impl Plugin for Audio {}
/// impl Named for Audio {}
/// implements!(Audio: Plugin, Named);
///
/// struct Settings;
/// implements!(Settings);
///
/// let mut container = Container::new();
/// container.add_interfaces(Svc::new(Audio));
/// container.add_interfaces(Svc::new(Settings));
///
/// assert!(container.contains::<dyn Plugin>());
/// assert!(container.contains::<dyn Named>());
/// assert!(!container.contains::<Audio>());
/// assert!(!container.contains::<Settings>());
/// ```
#[macro_export]
macro_rules! implements {
    ($service:ty $(: $($interface:ident),+ $(,)?)?) => {
        impl $crate::Interfaces for $service {
            fn interfaces(
                _service: &$crate::Svc<Self>,
            ) -> ::std::vec::Vec<$crate::Instance> {
                ::std::vec![$($(
                    $crate::Instance::implementing::<Self, dyn $interface>(
                        ::std::clone::Clone::clone(_service)
                            as $crate::Svc<dyn $interface>,
                    ),
                )+)?]
            }
        }
    };
}
