pub mod config;
pub mod domain;
pub mod forms;
pub mod notify;
pub mod repository;
pub mod routes;
pub mod services;
