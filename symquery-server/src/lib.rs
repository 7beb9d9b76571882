//! Router construction for the query service, split out so integration tests can drive
//! the service without binding a socket.

pub mod routes;
