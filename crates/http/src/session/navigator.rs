//! Navigation requests emitted by the session

use std::fmt;

/// Views a session change can send the user to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login => f.write_str("/login"),
        }
    }
}

/// Front-end hook invoked when the session asks to show another view
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

impl<F> Navigator for F
where
    F: Fn(Route) + Send + Sync,
{
    fn navigate(&self, route: Route) {
        self(route);
    }
}

/// Navigator for headless use; only logs the request
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate(&self, route: Route) {
        debug!("Navigation to {} requested", route);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn closures_act_as_navigators() {
        let seen = Mutex::new(Vec::new());
        let navigator = |route: Route| seen.lock().unwrap().push(route.to_string());

        navigator.navigate(Route::Login);

        assert_eq!(*seen.lock().unwrap(), ["/login"]);
    }
}
