pub mod browse;
pub mod buy;
pub mod positions;
pub mod session;
pub mod setup;
pub mod ui;
pub mod watch;
