pub mod app;
pub mod cli;
pub mod config;
pub mod extract;
pub mod history;
pub mod llm;
pub mod math;
pub mod paths;
pub mod prompts;
pub mod session;
