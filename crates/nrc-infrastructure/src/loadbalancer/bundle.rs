//! Default client bundle
//!
//! Applied first in every client scope, so per-service or global bundles
//! can replace any of these definitions.

use super::config::resolve_client_config;
use super::introspector::DefaultServerIntrospector;
use super::server_list::StaticServerListLoadBalancer;
use crate::config::AppConfig;
use crate::constants::CLIENT_BUNDLE_NAME;
use crate::context::Bundle;
use nrc_domain::ports::{LoadBalancer, ServerIntrospector};
use nrc_domain::value_objects::{ClientConfig, ContextName};
use std::sync::Arc;

/// Client configuration, load balancer and introspector for the scope's service
pub fn client_bundle() -> Bundle {
    Bundle::new(CLIENT_BUNDLE_NAME)
        .provide::<ClientConfig, _>(|scope| {
            let app = scope.get::<AppConfig>()?;
            let name = scope.get::<ContextName>()?;
            Ok(Arc::new(resolve_client_config(name.service(), &app)?))
        })
        .provide::<dyn LoadBalancer, _>(|scope| {
            let config = scope.get::<ClientConfig>()?;
            let load_balancer: Arc<dyn LoadBalancer> = Arc::new(
                StaticServerListLoadBalancer::new(config.service.clone(), config.servers.clone())?,
            );
            Ok(load_balancer)
        })
        .provide::<dyn ServerIntrospector, _>(|scope| {
            let config = scope.get::<ClientConfig>()?;
            let introspector: Arc<dyn ServerIntrospector> =
                Arc::new(DefaultServerIntrospector::new(config.secure_ports.clone()));
            Ok(introspector)
        })
}
