//! Clash of Clans chat bot for Signal.
//!
//! Messages flow from the Signal receiver through [`dispatch::Dispatcher`],
//! which rate-limits, checks chat access and runs a command handler, to
//! [`outbox::Outbox`], which delivers the resulting [`reply::Reply`] values.

pub mod app;
pub mod commands;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod fanout;
pub mod format;
pub mod outbox;
pub mod rate_limit;
pub mod render;
pub mod reply;
pub mod tags;
pub mod upstream;
