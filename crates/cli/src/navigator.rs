//! Session navigation rendered on the terminal

use backoffice_http::{Navigator, Route};

/// Prints a hint on stderr when the session sends the user back to login
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, route: Route) {
        match route {
            Route::Login => {
                eprintln!("Session ended. Run `backoffice login` to sign in again.");
            }
        }
    }
}
