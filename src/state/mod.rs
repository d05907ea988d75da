pub mod app_settings;
pub mod app_state;
pub mod countdown;
pub mod match_clock;
pub mod messages;
pub mod network;
pub mod result_edit;
pub mod ticker;
