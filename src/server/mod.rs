// Server module entry point
// Listener creation, connection handling and the accept loop

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the file is mounted as server_loop
#[path = "loop.rs"]
pub mod server_loop;

pub use listener::create_reusable_listener;
pub use server_loop::start_server_loop;
