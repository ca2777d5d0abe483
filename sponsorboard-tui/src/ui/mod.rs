pub mod filter_popup;
pub mod format;
pub mod help;
pub mod leaderboard;
pub mod log_view;
pub mod profile;
pub mod search_bar;
pub mod statistics;
pub mod theme;
