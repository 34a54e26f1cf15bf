pub mod api;
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod gate;
pub mod gateway;
pub mod models;
pub mod resources;
pub mod settings;

#[cfg(test)]
pub mod testing;
