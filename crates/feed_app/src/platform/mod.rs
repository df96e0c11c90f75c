mod app;
mod logging;
mod render;

pub use app::run_app;
