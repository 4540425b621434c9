pub mod clipboard;
pub mod desktop;
pub mod icon;
pub mod ipc;
pub mod keys;
pub mod macros;
pub mod wm;
