//! Application services: loaders, the editor controller, and persistence seams.

pub mod admin;
pub mod env;
pub mod error;
pub mod posts;
pub mod render;
pub mod repos;
pub mod session;
