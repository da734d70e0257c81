#![forbid(unsafe_code)]

pub mod catalog;
pub mod cli;
pub mod lists;
pub mod logging;
pub mod score;
pub mod select;
pub mod session;
pub mod stats;
pub mod steps;
pub mod wizard;
