//! Stratos mission telemetry: the full mission dataset over HTTP and
//! live "as of instant" snapshots over a WebSocket.
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
