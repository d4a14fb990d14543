//! Destinations a flow hands the user off to.

use std::fmt;

use scholarly_types::Id;

/// Where the user should land after an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// The student's application tracking table.
    MyApplications,
    /// Cost summary and checkout button for one application.
    PaymentPage(Id),
    /// Sign-in page, used after a forced logout.
    Login,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::MyApplications => "/dashboard/my-applications".to_string(),
            Route::PaymentPage(id) => format!("/dashboard/payment-page/{}", id),
            Route::Login => "/login".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
