pub mod controller;
pub mod errors;
pub mod remote;
pub mod state;
pub mod types;
