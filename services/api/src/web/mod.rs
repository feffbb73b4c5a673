pub mod auth;
pub mod rest;
pub mod state;

// Re-export the handlers the binary wires into the router.
pub use rest::{admin_stats_handler, generate_handler, purchase_handler, visit_handler};
