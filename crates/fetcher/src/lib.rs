pub mod fetcher;
pub mod transport;
pub mod validator;

pub use fetcher::{StatusFetcher, StatusResponse};
pub use transport::{HttpTransport, RawResponse, ReqwestTransport, StatusRequest};
