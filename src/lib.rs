pub mod model;
pub mod panel;
pub mod parser;
pub mod state;
