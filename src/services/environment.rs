use std::collections::HashMap;
use std::sync::Mutex;

/// Where placeholder values come from and where injected tokens go.
pub trait EnvironmentSink: Send + Sync {
    fn var(&self, name: &str) -> Option<String>;
    fn set_var(&self, name: &str, value: &str);
}

/// The real process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnvironment;

impl EnvironmentSink for ProcessEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn set_var(&self, name: &str, value: &str) {
        std::env::set_var(name, value);
    }
}

/// In-memory environment, isolated from the process.
#[derive(Debug, Default)]
pub struct MemoryEnvironment {
    vars: Mutex<HashMap<String, String>>,
}

impl MemoryEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_var(self, name: &str, value: &str) -> Self {
        self.set_var(name, value);
        self
    }
}

impl EnvironmentSink for MemoryEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        let guard = self.vars.lock().unwrap_or_else(|err| err.into_inner());
        guard.get(name).cloned()
    }

    fn set_var(&self, name: &str, value: &str) {
        let mut guard = self.vars.lock().unwrap_or_else(|err| err.into_inner());
        guard.insert(name.to_string(), value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::{EnvironmentSink, MemoryEnvironment};

    #[test]
    fn memory_environment_round_trips() {
        let env = MemoryEnvironment::new().with_var("A", "1");
        assert_eq!(env.var("A").as_deref(), Some("1"));
        env.set_var("A", "2");
        assert_eq!(env.var("A").as_deref(), Some("2"));
        assert!(env.var("B").is_none());
    }
}
