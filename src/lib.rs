//! Presigned S3/R2 URLs for an anonymous pastebin.
//!
//! The server keeps the store credentials; browsers only ever receive a
//! time-boxed URL signed with AWS Signature Version 4 that authorizes one
//! method on one object key.
//!
//! - [`store`] holds the signing core and its inverse check.
//! - [`server`] exposes the signer over HTTP.
//! - [`cli`] wires configuration, logging and the command line together.

pub mod cli;
pub mod config;
pub mod server;
pub mod store;
