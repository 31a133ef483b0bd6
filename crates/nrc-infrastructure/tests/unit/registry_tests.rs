//! Config Registry Tests

use nrc_domain::constants::DEFAULT_CONTEXT_NAME;
use nrc_domain::value_objects::ServiceName;
use nrc_infrastructure::context::{Bundle, ConfigRegistry};

fn name(value: &str) -> ServiceName {
    ServiceName::new(value).unwrap()
}

#[test]
fn test_register_accumulates_in_order() {
    let registry = ConfigRegistry::new();
    registry.register(&name("users"), [Bundle::new("a")]).unwrap();
    registry.register(&name("users"), [Bundle::new("b"), Bundle::new("c")]).unwrap();

    let specification = registry.specification(&name("users")).unwrap();
    let names: Vec<&str> = specification.bundles().iter().map(Bundle::name).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
    assert_eq!(specification.name(), "users");
}

#[test]
fn test_default_name_is_global() {
    let registry = ConfigRegistry::new();
    registry.register_default([Bundle::new("global-1")]).unwrap();
    registry
        .register(&name(DEFAULT_CONTEXT_NAME), [Bundle::new("global-2")])
        .unwrap();

    let globals: Vec<String> = registry
        .default_bundles()
        .iter()
        .map(|bundle| bundle.name().to_string())
        .collect();
    assert_eq!(globals, vec!["global-1", "global-2"]);
    assert!(registry.names().is_empty());
}

#[test]
fn test_names_sorted_without_default() {
    let registry = ConfigRegistry::new();
    registry.register(&name("zeta"), [Bundle::new("z")]).unwrap();
    registry.register(&name("alpha"), [Bundle::new("a")]).unwrap();
    registry.register_default([Bundle::new("g")]).unwrap();

    assert_eq!(registry.names(), vec![name("alpha"), name("zeta")]);
}

#[test]
fn test_frozen_registry_rejects_registration() {
    let registry = ConfigRegistry::new();
    registry.freeze();

    assert!(registry.is_frozen());
    let err = registry.register(&name("late"), [Bundle::new("x")]).unwrap_err();
    assert!(err.is_configuration());
    assert!(registry.register_default([Bundle::new("y")]).is_err());
    assert!(registry.specification(&name("late")).is_none());
}

#[test]
fn test_unknown_specification_is_none() {
    let registry = ConfigRegistry::new();
    assert!(registry.specification(&name("missing")).is_none());
    assert!(registry.default_bundles().is_empty());
}
