//! PsycheFit terminal front-end
//!
//! Drives a [`psychefit_common::QuizSession`] from line-based input and
//! renders every screen as text. The `psychefit` binary wires it to
//! stdin/stdout; tests feed it scripted input.

pub mod app;
pub mod export;
pub mod screens;

pub use app::{App, AppOptions, Exit, CONFETTI_PIECES};
pub use screens::ScreenFormatter;
