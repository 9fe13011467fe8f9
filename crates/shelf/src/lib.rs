#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![warn(missing_docs, rust_2018_idioms)]
#![allow(clippy::module_name_repetitions)]

//! # shelf
//!
//! shelf is a library for keeping a personal catalog of books in a local SQLite file, see
//! [`BookStore`]. Books can be enriched with an ISBN resolved from their title using the Google
//! Books API, see [`MetadataClient`].

pub mod api;
mod book;
mod error;
pub mod isbn;
pub mod store;

pub use api::MetadataClient;
pub use book::Book;
pub use error::{Error, ErrorKind};
pub use isbn::is_isbn;
pub use store::BookStore;
