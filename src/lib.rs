#![doc = "The `inkhaven` library crate."]
#![doc = ""]
#![doc = "This crate contains the business logic, domain models, authentication"]
#![doc = "mechanisms, social login strategies, routing configuration, and error"]
#![doc = "handling for the Inkhaven article-publishing API. It is used by the main"]
#![doc = "binary (`main.rs`) to construct and run the application."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod social;
