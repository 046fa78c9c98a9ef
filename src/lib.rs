//! Core of a multi-variant affirmation onboarding flow: a discovery loop
//! that gathers context through agent-generated question screens, a parser
//! cascade that recovers structure from free-text LLM output, deterministic
//! prompt serialization, and error-normalized entry points. The binary in
//! `main.rs` drives the same protocol as a terminal wizard.

pub mod actions;
pub mod cli;
pub mod config;
pub mod context;
pub mod errors;
pub mod flow;
pub mod log;
pub mod parse;
pub mod prompt;
pub mod provider;
pub mod session;
pub mod template;
pub mod ux;
pub mod wire;
