use insights_flux::Action;

/// Progress of script injection into the target page
#[derive(Debug)]
pub struct InjectionActions {
    pub injection_started: Action<()>,
    pub injection_completed: Action<()>,
    pub injection_failed: Action<()>,
}

impl Default for InjectionActions {
    fn default() -> Self {
        Self {
            injection_started: Action::new("injectionStarted"),
            injection_completed: Action::new("injectionCompleted"),
            injection_failed: Action::new("injectionFailed"),
        }
    }
}
