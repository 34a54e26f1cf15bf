pub mod client;
pub mod endpoints;
pub mod transport;

pub use client::HttpClient;
pub use transport::{ApiRequest, FormPayload, ImageUpload, RawResponse, RequestBody, ReqwestTransport, Transport};
