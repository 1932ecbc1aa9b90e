mod render;
mod server;

pub use self::{render::render, server::run_server};
