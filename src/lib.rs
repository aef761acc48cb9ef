pub mod backend;
pub mod form;
pub mod ipc;
pub mod model;
pub mod render;
pub mod report;
pub mod roster_csv;
