pub mod aggregate;
pub mod app;
pub mod archive;
pub mod classify;
pub mod config;
pub mod domain;
pub mod error;
pub mod links;
pub mod output;
pub mod portal;
pub mod suppliers;
