//! Stud.IP REST API access
//!
//! The rest of the crate talks to the server only through [`RemoteApi`],
//! which keeps the tree walk and the archive logic independent of HTTP.

mod client;
pub mod models;

use std::io::Write;

use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

pub use client::StudipClient;

/// Authenticated request/response access to the remote API
///
/// `path` is relative to the API root (`/user`, `/folder/{id}/files`, ...).
/// Paths that already carry the API prefix, as returned in `modules`
/// links, are accepted too.
pub trait RemoteApi {
    /// GET a JSON resource
    fn get_json(&self, path: &str) -> Result<serde_json::Value>;

    /// GET a binary resource and stream it into `sink`, returning the
    /// number of bytes written
    fn download(&self, path: &str, sink: &mut dyn Write) -> Result<u64>;
}

/// GET a JSON resource and decode it into `T`
pub fn fetch<T: DeserializeOwned>(api: &dyn RemoteApi, path: &str) -> Result<T> {
    let value = api.get_json(path)?;
    serde_json::from_value(value).map_err(|source| Error::Json {
        path: path.to_string(),
        source,
    })
}
