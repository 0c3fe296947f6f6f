//! Console actions as values: build an [model::action::Action] tree, then hand it
//! to the [engine::ActionEngine] together with a console to get it run.

pub mod console;
pub mod demo;
pub mod engine;
pub mod model;
pub mod script;
