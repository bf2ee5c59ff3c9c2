// Library surface for the headless integration tests. The rendering and
// app-shell types stay in main.rs; nothing here touches a terminal.
pub mod config;
pub mod game;
pub mod pointer;
pub mod rounds;
pub mod runtime;
pub mod session;
pub mod surface;
