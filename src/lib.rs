pub mod cli;
pub mod controller;
pub mod form;
pub mod list;
pub mod model;
pub mod observe;
pub mod parser;
pub mod persist;
pub mod schedule;
pub mod scroll;
pub mod state;
pub mod tui;
pub mod ui;
