//! HTML viewer for notes and the standalone greeting server.

mod render;
mod server;

pub use render::{DEFAULT_TEMPLATE, interpolate, render_fragment};
pub use server::{GREETER_PORT, GREETING, greeter_router, router, serve};
