pub mod action_cmd;
pub mod config_cmd;
pub mod estimate_cmd;
pub mod list_cmd;
pub mod output;
pub mod renderer;
