//! API endpoint implementations.

mod applications;
mod dashboard;
mod payments;
mod reviews;
mod scholarships;
mod users;

pub use applications::ApplicationsApi;
pub use dashboard::DashboardApi;
pub use payments::PaymentsApi;
pub use reviews::ReviewsApi;
pub use scholarships::ScholarshipsApi;
pub use users::UsersApi;
