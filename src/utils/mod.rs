pub mod command_tasks;
pub mod fetch_data;
pub mod format;
pub mod logger;
pub mod single_flight;
pub mod time_label;
pub mod wait;

// Re-export commonly used items
pub use command_tasks::CommandTasks;
pub use fetch_data::HttpFetcher;
pub use logger::Logger;
pub use single_flight::SingleFlight;
pub use time_label::{clean_label, normalize, pad_label, Bound};
pub use wait::wait_until;
