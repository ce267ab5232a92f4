pub mod audit;
pub mod checkout;
pub mod config;
pub mod db;
pub mod dto;
pub mod error;
pub mod gateway;
pub mod models;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;
