pub mod command;
pub mod pipe;
pub mod process;
pub mod thumbnail;
