//! Core of the daily certification test runner.
//!
//! The control flow is linear: [`session::login`] authenticates against the
//! portal, [`resolver`] picks the target, and [`dispatcher::dispatch`] runs the
//! diagnostic commands concurrently and submits their output.

pub mod command;
pub mod dispatcher;
pub mod error;
pub mod resolver;
pub mod session;
