//! citypop - city population API backed by a document store
//!
//! A thin HTTP layer: validate input, make one store call, translate the
//! outcome into a JSON response.

pub mod city;
pub mod cli;
pub mod http_server;
pub mod observability;
pub mod store;
