use std::collections::HashMap;

use super::{StoreError, TransactionContext};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedEvent {
    pub name: String,
    pub payload: Vec<u8>,
}

/// HashMap-backed [`TransactionContext`] with a fixed caller role and a log
/// of emitted events. Stands in for the ledger host in tests and in the
/// driver binary; reads and writes never fail.
#[derive(Debug, Default)]
pub struct InMemoryContext {
    pub state: HashMap<String, Vec<u8>>,
    pub role: Option<String>,
    pub events: Vec<EmittedEvent>,
}

impl InMemoryContext {
    pub fn with_role(role: &str) -> Self {
        Self {
            role: Some(role.to_string()),
            ..Self::default()
        }
    }
}

impl TransactionContext for InMemoryContext {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.state.get(key).cloned())
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        self.state.insert(key.to_string(), value);
        Ok(())
    }

    fn client_attribute(&self, name: &str) -> Option<String> {
        if name == "role" { self.role.clone() } else { None }
    }

    fn emit_event(&mut self, name: &str, payload: Vec<u8>) -> Result<(), StoreError> {
        self.events.push(EmittedEvent {
            name: name.to_string(),
            payload,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_then_get_round_trips() {
        let mut ctx = InMemoryContext::default();
        assert_eq!(ctx.get_state("k").unwrap(), None);
        ctx.put_state("k", b"v1".to_vec()).unwrap();
        assert_eq!(ctx.get_state("k").unwrap(), Some(b"v1".to_vec()));
        ctx.put_state("k", b"v2".to_vec()).unwrap();
        assert_eq!(ctx.get_state("k").unwrap(), Some(b"v2".to_vec()));
    }

    #[test]
    fn only_the_role_attribute_is_exposed() {
        let ctx = InMemoryContext::with_role("Investor");
        assert_eq!(ctx.client_attribute("role").as_deref(), Some("Investor"));
        assert_eq!(ctx.client_attribute("department"), None);
        assert_eq!(InMemoryContext::default().client_attribute("role"), None);
    }

    #[test]
    fn events_are_recorded_in_order() {
        let mut ctx = InMemoryContext::default();
        ctx.emit_event("First", b"a".to_vec()).unwrap();
        ctx.emit_event("Second", b"b".to_vec()).unwrap();
        assert_eq!(ctx.events.len(), 2);
        assert_eq!(ctx.events[0].name, "First");
        assert_eq!(ctx.events[1].payload, b"b");
    }
}
