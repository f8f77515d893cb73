use crate::{
    services::{Constructor, MethodDescriptor},
    Activation, Args, InjectError, InjectResult, Instance, Interfaces, Method,
    Registry, RequestInfo, Service, ServiceFactory, ServiceInfo, Svc,
};
use std::{
    any::Any,
    collections::HashMap,
    fmt::{Debug, Formatter},
};
use tracing::{debug, trace};

/// A dependency injection container. This holds every registered instance,
/// indexed by the types it can be requested as, along with the constructors
/// and methods the container is able to call.
///
/// Instances are only ever stored through the `add*` family of methods.
/// Looking instances up, instantiating types and invoking methods never
/// changes what is registered.
///
/// ```
/// use dependency_container::{
///     args, implements, interface, Container, Service, Svc,
/// };
///
/// trait Storage: Service {
///     fn load(&self, key: &str) -> Option<String>;
/// }
/// interface!(Storage);
///
/// #[derive(Default)]
/// struct MemoryStorage;
///
/// impl Storage for MemoryStorage {
///     fn load(&self, key: &str) -> Option<String> {
///         Some(format!("value of {}", key))
///     }
/// }
/// implements!(MemoryStorage: Storage);
///
/// struct UserService {
///     storage: Svc<dyn Storage>,
/// }
///
/// impl UserService {
///     pub fn new(storage: Svc<dyn Storage>) -> Self {
///         UserService { storage }
///     }
///
///     pub fn name(&self, id: u32) -> Option<String> {
///         self.storage.load(&format!("user/{}", id))
///     }
/// }
///
/// let mut container = Container::new();
/// container.register_constructor(MemoryStorage::default);
/// container.register_constructor(UserService::new);
///
/// container.add_new_interfaces::<MemoryStorage>(args![]).unwrap();
/// let users = container.add_new::<UserService>(args![]).unwrap();
///
/// assert_eq!(Some("value of user/7".to_owned()), users.name(7));
/// assert!(Svc::ptr_eq(&users, &container.get::<UserService>().unwrap()));
/// ```
#[derive(Default)]
pub struct Container {
    registry: Registry,
    constructors: HashMap<ServiceInfo, Vec<Constructor>>,
    methods: HashMap<ServiceInfo, HashMap<String, MethodDescriptor>>,
}

impl Container {
    /// Creates an empty container. The container is not registered in
    /// itself; pass it explicitly to whatever needs it.
    #[must_use]
    pub fn new() -> Self {
        Container::default()
    }

    /// Gets the instances stored in this container.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Registers a constructor for the factory's result type. A type can
    /// only be instantiated if exactly one constructor is registered for it.
    pub fn register_constructor<F, D, R>(&mut self, factory: F)
    where
        F: ServiceFactory<D, R>,
        D: 'static,
        R: Service,
    {
        let constructor = Constructor::new(factory);
        trace!(service = constructor.result().name(), "registered constructor");
        self.constructors
            .entry(constructor.result())
            .or_default()
            .push(constructor);
    }

    /// Registers a method that can be invoked by name on instances of `S`.
    /// Registering another method with the same name replaces the previous
    /// one.
    ///
    /// ```
    /// use dependency_container::{args, Container, Svc};
    ///
    /// struct Greeting(&'static str);
    /// struct Greeter;
    ///
    /// impl Greeter {
    ///     fn greet(&self, greeting: Svc<Greeting>) -> String {
    ///         format!("{}, world", greeting.0)
    ///     }
    /// }
    ///
    /// let mut container = Container::new();
    /// container.add(Svc::new(Greeting("Hello")));
    /// container.register_method("greet", Greeter::greet);
    ///
    /// let greeting: String = container.invoke(&Greeter, "greet", args![]).unwrap();
    /// assert_eq!("Hello, world", greeting);
    /// ```
    pub fn register_method<M, S, D, R>(&mut self, name: impl Into<String>, method: M)
    where
        M: Method<S, D, R>,
        S: Service,
        D: 'static,
        R: 'static,
    {
        let name = name.into();
        let descriptor = MethodDescriptor::new(method);
        trace!(
            target_type = std::any::type_name::<S>(),
            method = %name,
            output = descriptor.output().name(),
            "registered method"
        );
        self.methods
            .entry(ServiceInfo::of::<S>())
            .or_default()
            .insert(name, descriptor);
    }

    /// Stores a service under its own type. Returns whether it was newly
    /// added.
    pub fn add<I: ?Sized + Service>(&mut self, service: Svc<I>) -> bool {
        self.registry.insert(Instance::new(service))
    }

    /// Stores a type-erased instance under `key`. Returns whether it was newly
    /// added.
    ///
    /// # Errors
    ///
    /// Returns [`InjectError::TypeMismatch`] if `instance` was not created for
    /// `key`.
    pub fn add_instance(
        &mut self,
        key: ServiceInfo,
        instance: Instance,
    ) -> InjectResult<bool> {
        self.registry.add(key, instance)
    }

    /// Stores a service under each interface it implements, but not under its
    /// own type. If it implements no interfaces, nothing is stored.
    pub fn add_interfaces<T: Interfaces>(&mut self, service: Svc<T>) {
        for instance in T::interfaces(&service) {
            self.registry.insert(instance);
        }
    }

    /// Stores a service under each interface it implements and under its own
    /// type.
    pub fn add_interfaces_and_self<T: Interfaces>(&mut self, service: Svc<T>) {
        self.add_interfaces(service.clone());
        self.add(service);
    }

    /// Instantiates `T` and stores the new instance under its own type.
    ///
    /// # Errors
    ///
    /// Fails like [`Container::instantiate`]. Nothing is stored on failure.
    pub fn add_new<T: Service>(&mut self, args: Args) -> InjectResult<Svc<T>> {
        let service = Svc::new(self.instantiate::<T>(args)?);
        self.add(service.clone());
        Ok(service)
    }

    /// Instantiates `T` and stores the new instance under each interface it
    /// implements.
    ///
    /// # Errors
    ///
    /// Fails like [`Container::instantiate`]. Nothing is stored on failure.
    pub fn add_new_interfaces<T: Interfaces>(
        &mut self,
        args: Args,
    ) -> InjectResult<Svc<T>> {
        let service = Svc::new(self.instantiate::<T>(args)?);
        self.add_interfaces(service.clone());
        Ok(service)
    }

    /// Instantiates `T` and stores the new instance under each interface it
    /// implements and under its own type.
    ///
    /// # Errors
    ///
    /// Fails like [`Container::instantiate`]. Nothing is stored on failure.
    pub fn add_new_interfaces_and_self<T: Interfaces>(
        &mut self,
        args: Args,
    ) -> InjectResult<Svc<T>> {
        let service = Svc::new(self.instantiate::<T>(args)?);
        self.add_interfaces_and_self(service.clone());
        Ok(service)
    }

    /// Gets whether any instance is stored under `I`.
    #[must_use]
    pub fn contains<I: ?Sized + Service>(&self) -> bool {
        self.registry.contains(ServiceInfo::of::<I>())
    }

    /// Gets the instance stored under `I`.
    ///
    /// # Errors
    ///
    /// Returns [`InjectError::NotFound`] unless exactly one instance is
    /// stored under `I`.
    pub fn get<I: ?Sized + Service>(&self) -> InjectResult<Svc<I>> {
        self.try_get::<I>().ok_or_else(|| {
            let service_info = ServiceInfo::of::<I>();
            InjectError::NotFound {
                service_info,
                candidates: self.registry.count(service_info),
            }
        })
    }

    /// Gets the instance stored under `I`, or `None` unless exactly one
    /// instance is stored under it.
    #[must_use]
    pub fn try_get<I: ?Sized + Service>(&self) -> Option<Svc<I>> {
        self.registry
            .get_single(ServiceInfo::of::<I>())
            .and_then(Instance::downcast::<I>)
    }

    /// Gets every instance stored under `I` in registration order.
    #[must_use]
    pub fn get_all<I: ?Sized + Service>(&self) -> Vec<Svc<I>> {
        self.registry
            .get_all(ServiceInfo::of::<I>())
            .iter()
            .filter_map(Instance::downcast::<I>)
            .collect()
    }

    /// Creates a new `T` using its registered constructor. Each parameter of
    /// the constructor is bound to an explicit argument from `args` if one
    /// matches, and is otherwise resolved from the container. The new value
    /// is not stored.
    ///
    /// # Errors
    ///
    /// - [`InjectError::AbstractType`] if `T` is known as an interface, that
    ///   is, an instance was stored under `T` through an interface. An
    ///   interface nothing was stored under yet has no constructor instead,
    ///   so it fails with [`InjectError::AmbiguousConstructor`].
    /// - [`InjectError::AmbiguousConstructor`] unless exactly one constructor
    ///   is registered for `T`.
    /// - [`InjectError::UnresolvedParameter`] if a parameter cannot be bound.
    pub fn instantiate<T: Service>(&self, args: Args) -> InjectResult<T> {
        let service_info = ServiceInfo::of::<T>();
        let (_, value) = self.construct(service_info, &args)?;
        value.downcast::<T>().map(|value| *value).map_err(|_| {
            InjectError::InternalError(format!(
                "constructor for {} built a value of another type",
                service_info.name()
            ))
        })
    }

    /// Creates a new instance of the type described by `service_info` and
    /// wraps it in a fresh service pointer. The new instance is not stored.
    ///
    /// # Errors
    ///
    /// Fails like [`Container::instantiate`]. Whether an interface key gives
    /// [`InjectError::AbstractType`] or [`InjectError::AmbiguousConstructor`]
    /// depends on whether anything was stored under it through an interface.
    pub fn instantiate_instance(
        &self,
        service_info: ServiceInfo,
        args: Args,
    ) -> InjectResult<Instance> {
        let (constructor, value) = self.construct(service_info, &args)?;
        constructor.into_instance(value)
    }

    fn construct(
        &self,
        service_info: ServiceInfo,
        args: &Args,
    ) -> InjectResult<(&Constructor, Box<dyn Any>)> {
        if self.registry.is_interface(service_info) {
            return Err(InjectError::AbstractType { service_info });
        }

        let constructor = match self.constructors.get(&service_info) {
            Some(constructors) if constructors.len() == 1 => &constructors[0],
            constructors => {
                return Err(InjectError::AmbiguousConstructor {
                    service_info,
                    constructors: constructors.map_or(0, Vec::len),
                })
            }
        };

        debug!(service = service_info.name(), args = ?args, "instantiating");
        let activation = Activation::Instantiating(service_info);
        let value = constructor.build(self, RequestInfo::new(&activation, args))?;
        Ok((constructor, value))
    }

    /// Invokes the method registered as `name` for `S` on `target`. Each
    /// parameter after the receiver is bound the same way as a constructor
    /// parameter.
    ///
    /// # Errors
    ///
    /// - [`InjectError::MethodNotFound`] if no method named `name` is
    ///   registered for `S`.
    /// - [`InjectError::TypeMismatch`] if the method does not return an `R`.
    /// - [`InjectError::UnresolvedParameter`] if a parameter cannot be bound.
    pub fn invoke<S: Service, R: 'static>(
        &self,
        target: &S,
        name: &str,
        args: Args,
    ) -> InjectResult<R> {
        let target_info = ServiceInfo::of::<S>();
        let method = self
            .methods
            .get(&target_info)
            .and_then(|methods| methods.get(name))
            .ok_or_else(|| InjectError::MethodNotFound {
                service_info: target_info,
                method: name.to_owned(),
            })?;

        debug!(target_type = target_info.name(), method = name, args = ?args, "invoking");
        let activation = Activation::Invoking {
            method: name.to_owned(),
            target: target_info,
        };
        let receiver: &dyn Any = target;
        method.call::<R>(receiver, self, RequestInfo::new(&activation, &args))
    }

    /// Invokes `method` on `target` without registering it first.
    ///
    /// # Errors
    ///
    /// Returns [`InjectError::UnresolvedParameter`] if a parameter cannot be
    /// bound.
    pub fn invoke_with<S, M, D, R>(
        &self,
        target: &S,
        method: M,
        args: Args,
    ) -> InjectResult<R>
    where
        S: ?Sized + Service,
        M: Method<S, D, R>,
        R: 'static,
    {
        let activation = Activation::Invoking {
            method: std::any::type_name::<M>().to_owned(),
            target: ServiceInfo::of::<S>(),
        };
        debug!(%activation, args = ?args, "invoking");
        method.call(target, self, RequestInfo::new(&activation, &args))
    }
}

impl Debug for Container {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("registry", &self.registry)
            .field(
                "constructors",
                &self
                    .constructors
                    .keys()
                    .map(ServiceInfo::name)
                    .collect::<Vec<_>>(),
            )
            .field(
                "methods",
                &self
                    .methods
                    .iter()
                    .flat_map(|(target, methods)| {
                        methods
                            .keys()
                            .map(move |name| format!("{}::{}", target.name(), name))
                    })
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{args, implements, interface};

    trait Engine: Service {
        fn power(&self) -> u32;
    }
    interface!(Engine);

    #[derive(Default)]
    struct Diesel;

    impl Engine for Diesel {
        fn power(&self) -> u32 {
            300
        }
    }
    implements!(Diesel: Engine);

    struct Car {
        engine: Svc<dyn Engine>,
    }

    impl Car {
        fn new(engine: Svc<dyn Engine>) -> Self {
            Car { engine }
        }

        fn horsepower(&self, multiplier: Svc<u32>) -> u32 {
            self.engine.power() * *multiplier
        }
    }

    #[test]
    fn get_reports_candidate_count() {
        let mut container = Container::new();
        container.add(Svc::new(1u8));
        container.add(Svc::new(2u8));

        match container.get::<u8>() {
            Err(InjectError::NotFound {
                service_info,
                candidates,
            }) => {
                assert_eq!(ServiceInfo::of::<u8>(), service_info);
                assert_eq!(2, candidates);
            }
            Err(error) => Err(error).unwrap(),
            Ok(_) => unreachable!("ambiguous lookup should fail"),
        }
    }

    #[test]
    fn interfaces_and_self_share_one_object() {
        let mut container = Container::new();
        let diesel = Svc::new(Diesel);
        container.add_interfaces_and_self(diesel.clone());

        let as_engine = container.get::<dyn Engine>().unwrap();
        let as_self = container.get::<Diesel>().unwrap();
        assert!(Svc::ptr_eq(&diesel, &as_self));
        assert_eq!(300, as_engine.power());
    }

    #[test]
    fn interface_cannot_be_instantiated() {
        let mut container = Container::new();
        container.add_interfaces(Svc::new(Diesel));

        let info = ServiceInfo::of::<dyn Engine>();
        match container.instantiate_instance(info, args![]) {
            Err(InjectError::AbstractType { service_info }) => {
                assert_eq!(info, service_info);
            }
            Err(error) => Err(error).unwrap(),
            Ok(_) => unreachable!("interface should not be instantiated"),
        }
    }

    #[test]
    fn unknown_interface_has_no_constructor() {
        let container = Container::new();

        let info = ServiceInfo::of::<dyn Engine>();
        match container.instantiate_instance(info, args![]) {
            Err(InjectError::AmbiguousConstructor {
                service_info,
                constructors,
            }) => {
                assert_eq!(info, service_info);
                assert_eq!(0, constructors);
            }
            Err(error) => Err(error).unwrap(),
            Ok(_) => unreachable!("interface should not be instantiated"),
        }
    }

    #[test]
    fn instantiate_instance_wraps_new_object() {
        let mut container = Container::new();
        container.register_constructor(Diesel::default);

        let instance = container
            .instantiate_instance(ServiceInfo::of::<Diesel>(), args![])
            .unwrap();
        assert_eq!(ServiceInfo::of::<Diesel>(), instance.info());
        assert!(instance.downcast::<Diesel>().is_some());
        assert!(!container.contains::<Diesel>());
    }

    #[test]
    fn add_instance_checks_key() {
        let mut container = Container::new();
        let instance = Instance::new(Svc::new(Diesel));

        assert!(container
            .add_instance(ServiceInfo::of::<Diesel>(), instance.clone())
            .unwrap());
        assert!(container
            .add_instance(ServiceInfo::of::<dyn Engine>(), instance)
            .is_err());
    }

    #[test]
    fn invoke_resolves_remaining_parameters() {
        let mut container = Container::new();
        container.add_interfaces(Svc::new(Diesel));
        container.add(Svc::new(2u32));
        container.register_constructor(Car::new);
        container.register_method("horsepower", Car::horsepower);

        let car: Car = container.instantiate(args![]).unwrap();
        let horsepower: u32 =
            container.invoke(&car, "horsepower", args![]).unwrap();
        assert_eq!(600, horsepower);

        let explicit: u32 = container
            .invoke(&car, "horsepower", args![Svc::new(3u32)])
            .unwrap();
        assert_eq!(900, explicit);
    }

    #[test]
    fn invoke_with_wrong_return_type_fails() {
        let mut container = Container::new();
        container.add_interfaces(Svc::new(Diesel));
        container.add(Svc::new(2u32));
        container.register_method("horsepower", Car::horsepower);

        let car = Car::new(Svc::new(Diesel));
        match container.invoke::<Car, String>(&car, "horsepower", args![]) {
            Err(InjectError::TypeMismatch { expected, actual }) => {
                assert_eq!(ServiceInfo::of::<String>(), expected);
                assert_eq!(ServiceInfo::of::<u32>(), actual);
            }
            Err(error) => Err(error).unwrap(),
            Ok(_) => unreachable!("return type should not match"),
        }
    }

    #[test]
    fn unknown_method_is_not_found() {
        let container = Container::new();
        let car = Car::new(Svc::new(Diesel));

        match container.invoke::<Car, u32>(&car, "horsepower", args![]) {
            Err(InjectError::MethodNotFound {
                service_info,
                method,
            }) => {
                assert_eq!(ServiceInfo::of::<Car>(), service_info);
                assert_eq!("horsepower", method);
            }
            Err(error) => Err(error).unwrap(),
            Ok(_) => unreachable!("method should not be found"),
        }
    }

    #[test]
    fn invoke_with_reports_unresolved_parameter() {
        let container = Container::new();
        let car = Car::new(Svc::new(Diesel));

        match container.invoke_with(&car, Car::horsepower, args![]) {
            Err(InjectError::UnresolvedParameter {
                parameter,
                index,
                activation: Activation::Invoking { target, .. },
            }) => {
                assert_eq!(ServiceInfo::of::<u32>(), parameter);
                assert_eq!(0, index);
                assert_eq!(ServiceInfo::of::<Car>(), target);
            }
            Err(error) => Err(error).unwrap(),
            Ok(_) => unreachable!("parameter should not resolve"),
        }
    }
}
