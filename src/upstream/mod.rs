//! Everything that talks to the upstream game API: routing, URLs, the
//! authenticated client and the typed, scheduled endpoints built on it.

pub mod client;
pub mod credential;
pub mod endpoints;
pub mod http_client;
pub mod routing;
pub mod urls;

pub use client::{UpstreamClient, status_to_error};
pub use credential::ApiKey;
pub use endpoints::GameApi;
pub use http_client::create_http_client_with_timeout;
pub use routing::{Cluster, Platform};
pub use urls::{HostResolver, build_url};
