#![doc = "The `taskdeck` library crate."]
#![doc = ""]
#![doc = "Session-authenticated task management API: users register, log in and manage"]
#![doc = "their own tasks; administrators manage the user roster and read the audit"]
#![doc = "trail. The crate is split into the authentication core (`auth`), the domain"]
#![doc = "models (`models`), the HTTP surface (`routes`) and the ambient pieces"]
#![doc = "(`config`, `error`, `bootstrap`) used by the binary in `main.rs`."]

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
