//! Crewdesk - private messaging between a business owner and employees.
//!
//! This crate implements the real-time messaging core: an address scheme
//! for rooms, a connection registry, a router, the WebSocket session
//! gateway, and a client adapter for chat views.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
