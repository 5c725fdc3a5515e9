pub mod config;
pub mod order;
pub mod run;
pub mod window;
