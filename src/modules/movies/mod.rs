pub mod controller;
pub mod filter;
pub mod model;
pub mod router;
pub mod service;
