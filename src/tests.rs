use crate::{
    args, implements, interface, Activation, Container, InjectError,
    OrDefault, ResolverExt, Service, ServiceInfo, Services, Svc,
};
use std::sync::Mutex;

#[derive(Default)]
struct Svc1(pub i32);

struct Svc2 {
    pub dep1: Svc<Svc1>,
}

impl Svc2 {
    pub fn new(dep1: Svc<Svc1>) -> Self {
        Svc2 { dep1 }
    }
}

struct Svc3 {
    pub dep1: Svc<Svc1>,
    pub dep2: Svc<Svc2>,
}

impl Svc3 {
    pub fn new(dep1: Svc<Svc1>, dep2: Svc<Svc2>) -> Self {
        Svc3 { dep1, dep2 }
    }
}

trait Plugin: Service {
    fn id(&self) -> usize;
}
interface!(Plugin);

struct NumberedPlugin(usize);

impl Plugin for NumberedPlugin {
    fn id(&self) -> usize {
        self.0
    }
}
implements!(NumberedPlugin: Plugin);

struct PluginHost {
    pub plugins: Services<dyn Plugin>,
}

impl PluginHost {
    pub fn new(plugins: Services<dyn Plugin>) -> Self {
        PluginHost { plugins }
    }
}

fn same_object<T: ?Sized>(a: &Svc<T>, b: &Svc<T>) -> bool {
    Svc::as_ptr(a).cast::<()>() == Svc::as_ptr(b).cast::<()>()
}

#[test]
fn unregistered_type_is_not_found() {
    let container = Container::new();

    match container.get::<Svc1>() {
        Err(InjectError::NotFound {
            service_info,
            candidates,
        }) if service_info == ServiceInfo::of::<Svc1>() => {
            assert_eq!(0, candidates);
        }
        Err(error) => Err(error).unwrap(),
        Ok(_) => unreachable!("nothing should have been found"),
    }

    assert!(container.try_get::<Svc1>().is_none());
    assert!(container.get_all::<Svc1>().is_empty());
    assert!(!container.contains::<Svc1>());
}

#[test]
fn adding_twice_stores_once() {
    let mut container = Container::new();
    let svc1 = Svc::new(Svc1(1));

    assert!(container.add(svc1.clone()));
    assert!(!container.add(svc1.clone()));
    assert!(!container.add(svc1.clone()));

    let all = container.get_all::<Svc1>();
    assert_eq!(1, all.len());
    assert!(Svc::ptr_eq(&svc1, &all[0]));
}

#[test]
fn interfaces_and_self_are_resolved_independently() {
    let mut container = Container::new();
    let plugin = Svc::new(NumberedPlugin(4));
    container.add_interfaces_and_self(plugin.clone());
    container.add_interfaces_and_self(plugin.clone());

    assert_eq!(4, container.get::<dyn Plugin>().unwrap().id());
    assert!(Svc::ptr_eq(
        &plugin,
        &container.get::<NumberedPlugin>().unwrap()
    ));
    assert_eq!(1, container.get_all::<dyn Plugin>().len());
    assert_eq!(1, container.get_all::<NumberedPlugin>().len());
}

#[test]
fn ambiguous_lookup_is_not_found() {
    let mut container = Container::new();
    container.add_interfaces(Svc::new(NumberedPlugin(1)));
    container.add_interfaces(Svc::new(NumberedPlugin(2)));

    match container.get::<dyn Plugin>() {
        Err(InjectError::NotFound {
            service_info,
            candidates,
        }) if service_info == ServiceInfo::of::<dyn Plugin>() => {
            assert_eq!(2, candidates);
        }
        Err(error) => Err(error).unwrap(),
        Ok(_) => unreachable!("ambiguous lookup should not pick an instance"),
    }

    assert!(container.try_get::<dyn Plugin>().is_none());
    assert!(container.resolve::<dyn Plugin>().is_err());
    assert_eq!(2, container.get_all::<dyn Plugin>().len());
}

#[test]
fn several_constructors_are_ambiguous() {
    fn make_svc1() -> Svc1 {
        Svc1(10)
    }

    let mut container = Container::new();
    container.register_constructor(Svc1::default);
    container.register_constructor(make_svc1);

    match container.instantiate::<Svc1>(args![]) {
        Err(InjectError::AmbiguousConstructor {
            service_info,
            constructors,
        }) if service_info == ServiceInfo::of::<Svc1>() => {
            assert_eq!(2, constructors);
        }
        Err(error) => Err(error).unwrap(),
        Ok(_) => unreachable!("constructor should be ambiguous"),
    }
}

#[test]
fn missing_constructor_is_ambiguous() {
    let container = Container::new();

    match container.instantiate::<Svc1>(args![]) {
        Err(InjectError::AmbiguousConstructor { constructors, .. }) => {
            assert_eq!(0, constructors);
        }
        Err(error) => Err(error).unwrap(),
        Ok(_) => unreachable!("nothing should be able to construct Svc1"),
    }
}

#[test]
fn single_constructor_makes_new_instances() {
    type Counter = Mutex<i32>;

    fn make_svc1(counter: Svc<Counter>) -> Svc1 {
        let mut counter = counter.lock().unwrap();
        *counter += 1;
        Svc1(*counter)
    }

    let mut container = Container::new();
    container.add(Svc::new(Mutex::new(0)));
    container.register_constructor(make_svc1);

    let first: Svc<Svc1> = container.instantiate_as(args![]).unwrap();
    let second: Svc<Svc1> = container.instantiate_as(args![]).unwrap();

    assert!(!Svc::ptr_eq(&first, &second));
    assert_eq!(1, first.0);
    assert_eq!(2, second.0);
    assert!(!container.contains::<Svc1>());
}

#[test]
fn can_make_svc3() {
    let mut container = Container::new();
    container.register_constructor(Svc1::default);
    container.register_constructor(Svc2::new);
    container.register_constructor(Svc3::new);

    let svc1 = container.add_new::<Svc1>(args![]).unwrap();
    let svc2 = container.add_new::<Svc2>(args![]).unwrap();
    let svc3: Svc3 = container.instantiate(args![]).unwrap();

    assert!(Svc::ptr_eq(&svc1, &svc2.dep1));
    assert!(Svc::ptr_eq(&svc1, &svc3.dep1));
    assert!(Svc::ptr_eq(&svc2, &svc3.dep2));
}

#[test]
fn plugins_are_collected() {
    for count in [0, 1, 3] {
        let mut container = Container::new();
        container.register_constructor(PluginHost::new);
        for id in 0..count {
            container.add_interfaces(Svc::new(NumberedPlugin(id)));
        }

        let host: PluginHost = container.instantiate(args![]).unwrap();
        assert_eq!(count, host.plugins.len());
        assert_eq!(
            (0..count).collect::<Vec<_>>(),
            host.plugins.iter().map(|plugin| plugin.id()).collect::<Vec<_>>()
        );
    }
}

#[test]
fn defaults_are_used_when_unresolved() {
    struct Settings {
        level: i32,
        optional: Option<Svc<Svc2>>,
    }

    fn make_settings(level: OrDefault<Svc1>, optional: Option<Svc<Svc2>>) -> Settings {
        Settings {
            level: (*level).0,
            optional,
        }
    }

    let mut container = Container::new();
    container.register_constructor(make_settings);

    let settings: Settings = container.instantiate(args![]).unwrap();
    assert_eq!(0, settings.level);
    assert!(settings.optional.is_none());

    container.add(Svc::new(Svc1(7)));
    let settings: Settings = container.instantiate(args![]).unwrap();
    assert_eq!(7, settings.level);
}

#[test]
fn supplied_values_replace_defaults() {
    struct Settings {
        level: i32,
        optional: Option<Svc<Svc2>>,
    }

    fn make_settings(level: OrDefault<Svc1>, optional: Option<Svc<Svc2>>) -> Settings {
        Settings {
            level: (*level).0,
            optional,
        }
    }

    let mut container = Container::new();
    container.add(Svc::new(Svc1(7)));
    container.register_constructor(make_settings);

    let svc2 = Svc::new(Svc2::new(Svc::new(Svc1(1))));
    let settings: Settings = container
        .instantiate(args![Svc::new(Svc1(5)), svc2.clone()])
        .unwrap();

    assert_eq!(5, settings.level);
    match settings.optional {
        Some(optional) => assert!(Svc::ptr_eq(&svc2, &optional)),
        None => panic!("supplied Svc2 should have been bound"),
    }
}

#[test]
fn supplied_value_fills_every_matching_parameter() {
    struct Pair {
        first: Svc<Svc1>,
        second: Svc<Svc1>,
    }

    fn make_pair(first: Svc<Svc1>, second: Svc<Svc1>) -> Pair {
        Pair { first, second }
    }

    let mut container = Container::new();
    container.register_constructor(make_pair);

    let svc1 = Svc::new(Svc1(3));
    let pair: Pair = container.instantiate(args![svc1.clone()]).unwrap();

    assert!(Svc::ptr_eq(&svc1, &pair.first));
    assert!(Svc::ptr_eq(&svc1, &pair.second));
}

#[test]
fn failed_add_new_registers_nothing() {
    let mut container = Container::new();
    container.register_constructor(Svc2::new);

    match container.add_new::<Svc2>(args![]) {
        Err(InjectError::UnresolvedParameter {
            parameter,
            index,
            activation: Activation::Instantiating(service_info),
        }) => {
            assert_eq!(ServiceInfo::of::<Svc1>(), parameter);
            assert_eq!(0, index);
            assert_eq!(ServiceInfo::of::<Svc2>(), service_info);
        }
        Err(error) => Err(error).unwrap(),
        Ok(_) => unreachable!("Svc1 should not be resolvable"),
    }

    assert!(container.registry().is_empty());
}

#[test]
fn explicit_arguments_take_precedence() {
    let mut container = Container::new();
    container.add(Svc::new(Svc1(1)));
    container.register_constructor(Svc2::new);

    let explicit = Svc::new(Svc1(2));
    let svc2: Svc2 = container.instantiate(args![explicit.clone()]).unwrap();
    assert!(Svc::ptr_eq(&explicit, &svc2.dep1));
}

#[test]
fn end_to_end() {
    struct A;

    struct B;
    impl Plugin for B {
        fn id(&self) -> usize {
            2
        }
    }
    implements!(B: Plugin);

    struct C {
        a: Svc<A>,
        i: Svc<dyn Plugin>,
        all_i: Services<dyn Plugin>,
        all_i_vec: Vec<Svc<dyn Plugin>>,
    }

    impl C {
        fn new(
            a: Svc<A>,
            i: Svc<dyn Plugin>,
            all_i: Services<dyn Plugin>,
            all_i_vec: Vec<Svc<dyn Plugin>>,
        ) -> Self {
            C {
                a,
                i,
                all_i,
                all_i_vec,
            }
        }
    }

    let a = Svc::new(A);
    let b = Svc::new(B);

    let mut container = Container::new();
    container.add(a.clone());
    container.add_interfaces(b.clone());
    container.register_constructor(C::new);

    let c: C = container.instantiate(args![]).unwrap();
    let b_as_plugin: Svc<dyn Plugin> = b;
    assert!(Svc::ptr_eq(&a, &c.a));
    assert!(same_object(&b_as_plugin, &c.i));
    assert_eq!(1, c.all_i.len());
    assert!(same_object(&b_as_plugin, &c.all_i[0]));
    assert_eq!(1, c.all_i_vec.len());
    assert!(same_object(&b_as_plugin, &c.all_i_vec[0]));
}
