use serde::{de::DeserializeOwned, Serialize};

use crate::error::FeedError;
use crate::journal::{Journal, PayloadError};

/// A named state transition.
pub trait Action: Serialize + DeserializeOwned {
    fn name(&self) -> &'static str;
}

/// State that changes only by dispatching actions through its journal.
pub trait Reducer: Sized + Default {
    type Action: Action;

    fn journal(&self) -> &Journal;
    fn journal_mut(&mut self) -> &mut Journal;

    /// Apply one action. Must not touch the journal.
    fn reduce(&mut self, action: &Self::Action);

    /// Record `action`, then apply it.
    fn dispatch(&mut self, action: Self::Action) -> Result<(), PayloadError> {
        self.journal_mut().digest(action.name(), &action)?;
        self.reduce(&action);
        Ok(())
    }
}

/// Rebuild a reducer by replaying every action in `journal`.
pub fn hydrate<R: Reducer>(mut journal: Journal) -> Result<R, FeedError> {
    let mut reducer = R::default();

    journal.rehydrate(|record| {
        let action = record.decode::<R::Action>().map_err(|err| {
            FeedError::Replay(format!(
                "record {} ({}): {}",
                record.sequence, record.action_name, err
            ))
        })?;
        if action.name() != record.action_name {
            return Err(FeedError::Replay(format!(
                "record {} is named {} but decodes as {}",
                record.sequence,
                record.action_name,
                action.name()
            )));
        }
        reducer.reduce(&action);
        Ok(())
    })?;

    *reducer.journal_mut() = journal;
    Ok(reducer)
}
