pub mod circuit;
pub mod config;
pub mod rest;
pub mod session;
