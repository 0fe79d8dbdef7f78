mod auth;
mod client;
mod codec;
mod config;
mod constants;
mod discovery;
mod errors;
mod subscription;
mod transport;

pub use client::*;
pub use codec::decode_form;
pub use codec::decode_response_text;
pub use codec::encode_form;
pub use codec::fingerprint;
pub use codec::FormVariant;
pub use config::*;
pub use errors::*;
pub use subscription::ConfigKey;
pub use subscription::ConfigListener;
pub use transport::ApiRequest;
pub use transport::ApiResponse;
pub use transport::HttpMethod;
pub use transport::HttpTransport;
pub use transport::ReqwestTransport;
