//! Scope Tests

use nrc_domain::error::Error;
use nrc_infrastructure::context::{Bundle, Scope};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, PartialEq)]
struct Greeting(&'static str);

trait Shape: Send + Sync {
    fn sides(&self) -> u32;
}

struct Square;

impl Shape for Square {
    fn sides(&self) -> u32 {
        4
    }
}

struct Triangle;

impl Shape for Triangle {
    fn sides(&self) -> u32 {
        3
    }
}

#[test]
fn test_root_scope_resolves_values() {
    let root = Scope::root([Bundle::new("base").value(Arc::new(Greeting("hello")))]);

    let greeting = root.get::<Greeting>().unwrap();
    assert_eq!(*greeting, Greeting("hello"));
    assert!(root.parent().is_none());
    assert_eq!(root.definition_count(), 1);
}

#[test]
fn test_trait_object_capability() {
    let root = Scope::root([Bundle::new("shapes").provide::<dyn Shape, _>(|_| {
        let shape: Arc<dyn Shape> = Arc::new(Square);
        Ok(shape)
    })]);

    assert_eq!(root.get::<dyn Shape>().unwrap().sides(), 4);
}

#[test]
fn test_last_definition_wins() {
    let first = Bundle::new("first").value::<dyn Shape>(Arc::new(Square));
    let second = Bundle::new("second").value::<dyn Shape>(Arc::new(Triangle));
    let root = Scope::root([first, second]);

    assert_eq!(root.get::<dyn Shape>().unwrap().sides(), 3);
    assert_eq!(root.definition_count(), 1);
}

#[test]
fn test_qualified_definitions_are_distinct() {
    let root = Scope::root([Bundle::new("shapes")
        .value_named::<dyn Shape>("square", Arc::new(Square))
        .value_named::<dyn Shape>("triangle", Arc::new(Triangle))]);

    assert_eq!(root.get_named::<dyn Shape>("square").unwrap().sides(), 4);
    assert_eq!(root.get_named::<dyn Shape>("triangle").unwrap().sides(), 3);
    assert!(matches!(
        root.get::<dyn Shape>(),
        Err(Error::NotFound { .. })
    ));
    assert!(root.contains_named::<dyn Shape>("square"));
    assert!(!root.contains::<dyn Shape>());
}

#[test]
fn test_singleton_built_once() {
    let builds = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&builds);
    let root = Scope::root([Bundle::new("counted").provide::<Greeting, _>(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(Greeting("once")))
    })]);

    let first = root.get::<Greeting>().unwrap();
    let second = root.get::<Greeting>().unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(builds.load(Ordering::SeqCst), 1);
    assert_eq!(root.instantiated_count(), 1);
}

#[test]
fn test_find_distinguishes_absent_from_failing() {
    let root = Scope::root([Bundle::new("failing").provide::<Greeting, _>(|_| {
        Err(Error::internal("factory exploded"))
    })]);

    assert!(root.find::<Square>().unwrap().is_none());
    assert!(root.find::<Greeting>().is_err());
}

#[test]
fn test_failed_build_is_not_cached() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&attempts);
    let root = Scope::root([Bundle::new("flaky").provide::<Greeting, _>(move |_| {
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            Err(Error::internal("first attempt fails"))
        } else {
            Ok(Arc::new(Greeting("recovered")))
        }
    })]);

    assert!(root.get::<Greeting>().is_err());
    assert_eq!(*root.get::<Greeting>().unwrap(), Greeting("recovered"));
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[test]
fn test_dependency_resolved_in_same_scope() {
    struct Engine(u32);
    struct Car(Arc<Engine>);

    let root = Scope::root([
        Bundle::new("engine").value(Arc::new(Engine(8))),
        Bundle::new("car").provide::<Car, _>(|scope| Ok(Arc::new(Car(scope.get::<Engine>()?)))),
    ]);

    assert_eq!(root.get::<Car>().unwrap().0.0, 8);
}

#[test]
fn test_circular_dependency_is_configuration_error() {
    #[derive(Debug)]
    struct Left;
    #[derive(Debug)]
    struct Right;

    let root = Scope::root([Bundle::new("cycle")
        .provide::<Left, _>(|scope| {
            scope.get::<Right>()?;
            Ok(Arc::new(Left))
        })
        .provide::<Right, _>(|scope| {
            scope.get::<Left>()?;
            Ok(Arc::new(Right))
        })]);

    let err = root.get::<Left>().unwrap_err();
    assert!(err.is_configuration(), "unexpected error: {err}");
    assert!(err.to_string().contains("Circular dependency"));
}

#[test]
fn test_close_releases_singletons() {
    let builds = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&builds);
    let root = Scope::root([Bundle::new("counted").provide::<Greeting, _>(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(Greeting("again")))
    })]);

    let before = root.get::<Greeting>().unwrap();
    root.close();
    assert_eq!(root.instantiated_count(), 0);

    let after = root.get::<Greeting>().unwrap();
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(builds.load(Ordering::SeqCst), 2);
}

#[test]
fn test_bundle_reports_definitions() {
    let bundle = Bundle::new("shapes")
        .value::<dyn Shape>(Arc::new(Square))
        .value_named::<dyn Shape>("tri", Arc::new(Triangle));

    assert_eq!(bundle.name(), "shapes");
    assert_eq!(bundle.len(), 2);
    assert_eq!(bundle.definitions()[1].key().qualifier(), Some("tri"));
    assert!(Bundle::new("empty").is_empty());
}
