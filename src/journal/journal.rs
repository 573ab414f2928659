use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use super::{ActionRecord, PayloadError};

/// Append-only log of the actions a reducer has applied.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Journal {
    id: String,
    version: u64,
    records: Vec<ActionRecord>,
    #[serde(skip, default)]
    replaying: bool,
    timestamp: SystemTime,
}

impl Default for Journal {
    fn default() -> Self {
        Journal {
            id: String::new(),
            version: 0,
            records: Vec::new(),
            replaying: false,
            timestamp: SystemTime::now(),
        }
    }
}

struct ReplayGuard<'a> {
    replaying: &'a mut bool,
}

impl<'a> ReplayGuard<'a> {
    fn new(replaying: &'a mut bool) -> Self {
        *replaying = true;
        ReplayGuard { replaying }
    }
}

impl Drop for ReplayGuard<'_> {
    fn drop(&mut self) {
        *self.replaying = false;
    }
}

impl Journal {
    pub fn new() -> Self {
        Journal::default()
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Journal {
            id: id.into(),
            ..Journal::default()
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn records(&self) -> &[ActionRecord] {
        &self.records
    }

    /// Record an action with a serializable payload.
    ///
    /// Does nothing while the journal is being replayed.
    pub fn digest<T: Serialize>(
        &mut self,
        name: impl Into<String>,
        payload: &T,
    ) -> Result<(), PayloadError> {
        if self.replaying {
            return Ok(());
        }

        let sequence = self.records.len() as u64 + 1;
        let record = ActionRecord::encode(name, payload, sequence)?;
        self.records.push(record);
        self.version = self.records.len() as u64;
        self.timestamp = SystemTime::now();
        Ok(())
    }

    /// Walk every record in order with digesting suspended.
    pub fn rehydrate<F, E>(&mut self, mut apply: F) -> Result<(), E>
    where
        F: FnMut(&ActionRecord) -> Result<(), E>,
    {
        let _guard = ReplayGuard::new(&mut self.replaying);

        for record in &self.records {
            apply(record)?;
        }

        Ok(())
    }

    pub fn is_replaying(&self) -> bool {
        self.replaying
    }
}
