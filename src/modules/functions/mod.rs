//! `POST /invoke/{function}`: every handler behind one envelope-in,
//! envelope-out endpoint.

pub mod controller;
pub mod router;
pub mod service;
