//! HTTP interface to a chunk reader.
//!
//! `GET /{key}` answers `200` with the chunk's bytes, `404` when no reader
//! has the chunk, `400` when the path is not a key and `500` for any other
//! failure. This is the protocol [`crate::chunks::RemoteReader`] speaks.

mod router;
mod server;

pub use router::{router, SharedReader};
pub use server::{serve_on, Server};
