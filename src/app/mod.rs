pub mod events;
pub mod handlers;
pub mod renderer;
pub mod script;
pub mod session;
