//! Prezo Live - Real-time audience interaction backend
//!
//! Hosts live presentation sessions in which an audience submits and
//! upvotes questions, votes in polls and picks words in word clouds, while
//! every connected viewer receives the resulting updates over WebSocket.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
