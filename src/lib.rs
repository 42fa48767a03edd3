pub mod data;
pub mod pages;
pub mod server;
pub mod session;
