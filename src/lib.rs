pub mod amount;
pub mod api;
pub mod cert;
pub mod client;
pub mod config;
pub mod crypto;
pub mod decode;
pub mod endpoint;
pub mod error;
pub mod model;
pub mod normalize;
pub mod notify;
pub mod transport;

pub use client::VipsptClient;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::VipsptError;
pub use notify::{NotifyForwarder, handle_webhook};
pub use transport::{HttpTransport, Transport, TransportError};
