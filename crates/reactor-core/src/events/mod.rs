//! Domain events - discrete happenings pushed to dashboard subscribers

mod dashboard_event;

pub use dashboard_event::DashboardEvent;
