//! Domain services shared by the voice and chat routes.
//!
//! ARCHITECTURE
//! ============
//! `list` and `confirmation` own the shared mutable state. The gateways
//! translate inbound events into calls on them, and `notify` fans list
//! changes out to the chat without holding up the caller.

pub mod chat;
pub mod confirmation;
pub mod list;
pub mod notify;
pub mod render;
pub mod voice;
