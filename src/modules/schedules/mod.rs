pub mod controller;
pub mod functions;
pub mod router;
pub mod service;
