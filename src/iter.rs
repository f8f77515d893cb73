use crate::{Service, Svc};
use std::{
    fmt::{Debug, Formatter},
    iter::FromIterator,
    ops::Deref,
    slice::Iter,
    vec::IntoIter,
};

/// A read-only snapshot of every instance registered for a service or
/// interface, in registration order. Requesting a `Services<I>` never fails;
/// if nothing is registered, it is empty.
///
/// ```
/// use dependency_container::{
///     args, implements, interface, Container, Service, Services, Svc,
/// };
///
/// trait Plugin: Service {
///     fn name(&self) -> &'static str;
/// }
/// interface!(Plugin);
///
/// struct Audio;
/// impl Plugin for Audio {
///     fn name(&self) -> &'static str {
///         "audio"
///     }
/// }
/// implements!(Audio: Plugin);
///
/// struct Video;
/// impl Plugin for Video {
///     fn name(&self) -> &'static str {
///         "video"
///     }
/// }
/// implements!(Video: Plugin);
///
/// struct Host {
///     plugins: Vec<&'static str>,
/// }
///
/// impl Host {
///     pub fn new(plugins: Services<dyn Plugin>) -> Self {
///         Host {
///             plugins: plugins.iter().map(|plugin| plugin.name()).collect(),
///         }
///     }
/// }
///
/// let mut container = Container::new();
/// container.add_interfaces(Svc::new(Audio));
/// container.add_interfaces(Svc::new(Video));
/// container.register_constructor(Host::new);
///
/// let host: Host = container.instantiate(args![]).unwrap();
/// assert_eq!(vec!["audio", "video"], host.plugins);
/// ```
pub struct Services<I: ?Sized + Service> {
    services: Vec<Svc<I>>,
}

impl<I: ?Sized + Service> Services<I> {
    /// Gets the number of instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Gets whether there are no instances.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Iterates over the instances in registration order.
    pub fn iter(&self) -> Iter<'_, Svc<I>> {
        self.services.iter()
    }

    /// Converts this snapshot into its instances.
    #[must_use]
    pub fn into_vec(self) -> Vec<Svc<I>> {
        self.services
    }
}

impl<I: ?Sized + Service> Clone for Services<I> {
    fn clone(&self) -> Self {
        Services {
            services: self.services.clone(),
        }
    }
}

impl<I: ?Sized + Service> Default for Services<I> {
    fn default() -> Self {
        Services {
            services: Vec::new(),
        }
    }
}

impl<I: ?Sized + Service> Debug for Services<I> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services")
            .field("service", &std::any::type_name::<I>())
            .field("len", &self.services.len())
            .finish()
    }
}

impl<I: ?Sized + Service> Deref for Services<I> {
    type Target = [Svc<I>];

    fn deref(&self) -> &Self::Target {
        &self.services
    }
}

impl<I: ?Sized + Service> FromIterator<Svc<I>> for Services<I> {
    fn from_iter<T: IntoIterator<Item = Svc<I>>>(iter: T) -> Self {
        Services {
            services: iter.into_iter().collect(),
        }
    }
}

impl<I: ?Sized + Service> IntoIterator for Services<I> {
    type Item = Svc<I>;
    type IntoIter = IntoIter<Svc<I>>;

    fn into_iter(self) -> Self::IntoIter {
        self.services.into_iter()
    }
}

impl<'a, I: ?Sized + Service> IntoIterator for &'a Services<I> {
    type Item = &'a Svc<I>;
    type IntoIter = Iter<'a, Svc<I>>;

    fn into_iter(self) -> Self::IntoIter {
        self.services.iter()
    }
}
