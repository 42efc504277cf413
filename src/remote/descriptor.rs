//! Route descriptor schema.
//!
//! # Responsibilities
//! - Map a `Route` to the remote's native route descriptor
//! - Read the path matcher back out of any remote descriptor
//!
//! # Design Decisions
//! - One pinned schema version; see `SCHEMA_VERSION`
//! - Total: a structurally valid route always yields a descriptor
//! - Matching is `path + "*"` (prefix); handling is a single reverse proxy

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::routes::Route;

/// Descriptor shape written by this crate: `match[].path[]` + `handle[].handler = reverse_proxy`
/// with `upstreams[].dial`.
pub const SCHEMA_VERSION: &str = "http.routes/v2-path-reverse_proxy";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDescriptor {
    #[serde(rename = "match")]
    pub matchers: Vec<PathMatcher>,
    pub handle: Vec<Handler>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathMatcher {
    pub path: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "handler", rename_all = "snake_case")]
pub enum Handler {
    ReverseProxy { upstreams: Vec<Upstream> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upstream {
    pub dial: String,
}

impl RouteDescriptor {
    pub fn for_route(route: &Route) -> Self {
        Self {
            matchers: vec![PathMatcher {
                path: vec![format!("{}*", route.path)],
            }],
            handle: vec![Handler::ReverseProxy {
                upstreams: vec![Upstream {
                    dial: route.target.clone(),
                }],
            }],
        }
    }

    pub fn into_value(self) -> Value {
        // Plain structs of strings; serialization cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Build the native descriptor for a route.
pub fn build(route: &Route) -> Value {
    RouteDescriptor::for_route(route).into_value()
}

/// First path pattern of a descriptor (`match[0].path[0]`), if any.
pub fn matcher_path(descriptor: &Value) -> Option<&str> {
    descriptor
        .get("match")?
        .get(0)?
        .get("path")?
        .get(0)?
        .as_str()
}

/// First upstream dial address of a reverse proxy descriptor, if any.
pub fn upstream_dial(descriptor: &Value) -> Option<&str> {
    descriptor
        .get("handle")?
        .as_array()?
        .iter()
        .find(|h| h.get("handler").and_then(Value::as_str) == Some("reverse_proxy"))?
        .get("upstreams")?
        .get(0)?
        .get("dial")?
        .as_str()
}
