use crate::{InjectError, InjectResult, Instance, ServiceInfo};
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

/// Every instance known to a [`Container`](crate::Container), indexed by the
/// types it can be requested as.
///
/// One object may be stored under several keys, for example its own type and
/// each interface it implements. Within a key, instances are kept in the
/// order they were added, and adding the same object twice is a no-op.
///
/// ```
/// use dependency_container::{Instance, Registry, ServiceInfo, Svc};
///
/// let mut registry = Registry::new();
/// let value = Svc::new(5u16);
/// let key = ServiceInfo::of::<u16>();
///
/// assert!(registry.add(key, Instance::new(value.clone())).unwrap());
/// assert!(!registry.add(key, Instance::new(value)).unwrap());
/// assert_eq!(1, registry.count(key));
/// assert!(registry.get_single(key).is_some());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Registry {
    entries: HashMap<ServiceInfo, Vec<Instance>>,
    interfaces: HashSet<ServiceInfo>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Registry::default()
    }

    /// Stores `instance` under `key`. Returns whether the instance was newly
    /// added; storing an object under a key it is already stored under does
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns [`InjectError::TypeMismatch`] if `instance` was not created
    /// for `key`.
    pub fn add(&mut self, key: ServiceInfo, instance: Instance) -> InjectResult<bool> {
        if instance.info() != key {
            return Err(InjectError::TypeMismatch {
                expected: key,
                actual: instance.info(),
            });
        }

        Ok(self.insert(instance))
    }

    /// Stores `instance` under the key it was created for.
    pub(crate) fn insert(&mut self, instance: Instance) -> bool {
        let key = instance.info();
        if instance.is_interface() {
            self.interfaces.insert(key);
        }

        let instances = self.entries.entry(key).or_default();
        if instances.iter().any(|existing| existing.same_object(&instance)) {
            trace!(service = key.name(), "instance already registered");
            return false;
        }

        trace!(
            service = key.name(),
            implementation = instance.implementation().map(|info| info.name()),
            "registered instance"
        );
        instances.push(instance);
        true
    }

    /// Gets whether at least one instance is stored under `key`.
    #[must_use]
    pub fn contains(&self, key: ServiceInfo) -> bool {
        self.count(key) > 0
    }

    /// Gets how many instances are stored under `key`.
    #[must_use]
    pub fn count(&self, key: ServiceInfo) -> usize {
        self.entries.get(&key).map_or(0, Vec::len)
    }

    /// Gets the instance stored under `key` if it is the only one. Nothing is
    /// returned both when no instance and when several instances are stored.
    #[must_use]
    pub fn get_single(&self, key: ServiceInfo) -> Option<&Instance> {
        match self.get_all(key) {
            [instance] => Some(instance),
            [] => None,
            instances => {
                debug!(
                    service = key.name(),
                    candidates = instances.len(),
                    "ambiguous lookup, several instances registered"
                );
                None
            }
        }
    }

    /// Gets every instance stored under `key` in the order they were added.
    #[must_use]
    pub fn get_all(&self, key: ServiceInfo) -> &[Instance] {
        self.entries.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Gets whether `key` has been populated through an interface. Such
    /// types cannot be instantiated.
    #[must_use]
    pub fn is_interface(&self, key: ServiceInfo) -> bool {
        self.interfaces.contains(&key)
    }

    /// Iterates over every key that has instances stored under it.
    pub fn keys(&self) -> impl Iterator<Item = ServiceInfo> + '_ {
        self.entries
            .iter()
            .filter(|(_, instances)| !instances.is_empty())
            .map(|(key, _)| *key)
    }

    /// Gets the number of keys that have instances stored under them.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys().count()
    }

    /// Gets whether nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
