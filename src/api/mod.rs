// Upload server communication
//
// - auth: Authorization header from stored credentials
// - client: reqwest implementation of the upload transport
// - transport: the trait the uploader depends on
// - types: wire bodies of the chunked upload protocol

pub mod auth;
pub mod client;
pub mod error;
pub mod transport;
pub mod types;
