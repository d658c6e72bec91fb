pub mod aggregate;
pub mod api;
pub mod config;
pub mod controller;
pub mod metrics_server;
pub mod normalize;
pub mod observability;
pub mod pipeline;
pub mod planner;
pub mod timestamps;
pub mod views;

pub use controller::Controller;
pub use pipeline::{Envelope, Generation};
