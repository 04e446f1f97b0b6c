/// Decides whether a submitted credential unlocks the manager view
///
/// Stateless by contract: nothing is remembered between calls, so every
/// manager render checks again.
pub trait Authenticator {
    fn authenticate(&self, submitted: &str) -> bool;
}

/// Manager secret baked in at build time
///
/// Set `REMNANT_MANAGER_SECRET` when compiling to override the default.
pub const MANAGER_SECRET: &str = match option_env!("REMNANT_MANAGER_SECRET") {
    Some(secret) => secret,
    None => "Jenny@PrimeCountertops2025",
};

/// Verbatim comparison against one fixed shared secret
#[derive(Debug, Clone, Copy)]
pub struct StaticSecret {
    secret: &'static str,
}

impl StaticSecret {
    pub const fn new(secret: &'static str) -> Self {
        StaticSecret { secret }
    }
}

impl Default for StaticSecret {
    fn default() -> Self {
        StaticSecret::new(MANAGER_SECRET)
    }
}

impl Authenticator for StaticSecret {
    fn authenticate(&self, submitted: &str) -> bool {
        let granted = submitted == self.secret;
        if !granted {
            log::warn!("Manager access denied");
        }
        granted
    }
}

impl<F> Authenticator for F
where
    F: Fn(&str) -> bool,
{
    fn authenticate(&self, submitted: &str) -> bool {
        self(submitted)
    }
}
