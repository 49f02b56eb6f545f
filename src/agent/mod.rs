//! Agent module for Mikoko Guardian
//!
//! This module contains the conversation memory and the tool-calling
//! agent loop.

pub mod conversation;
pub mod core;

pub use conversation::Conversation;
pub use core::Agent;
