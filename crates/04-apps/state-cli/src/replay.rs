//! Store construction and NDJSON replay.

use anyhow::{Context, Result};
use reducer::Action;
use root_state::{root_reducer, RootReducer, RootState};
use std::io::{BufRead, Write};
use std::sync::Arc;
use store::{Store, StoreConfig};

pub type RootStore = Store<RootReducer>;

/// Counts gathered while replaying an action log.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    pub dispatched: usize,
    pub unchanged: usize,
}

/// Builds the root store, optionally seeded with a preloaded state.
pub fn configure_store(config: StoreConfig, preloaded: Option<RootState>) -> Result<RootStore> {
    let reducer = root_reducer();
    let store = match preloaded {
        Some(state) => Store::with_state(reducer, state, config),
        None => Store::new(reducer, config),
    };
    store.context("failed to initialise root store")
}

/// Dispatches every non-blank line of `reader` as an action.
///
/// `on_state` runs after each dispatch with the resulting state.
pub fn replay<R, F>(store: &RootStore, reader: R, mut on_state: F) -> Result<ReplaySummary>
where
    R: BufRead,
    F: FnMut(&Arc<RootState>) -> Result<()>,
{
    let mut summary = ReplaySummary::default();

    for (idx, line) in reader.lines().enumerate() {
        let lineno = idx + 1;
        let line = line.with_context(|| format!("failed to read line {lineno}"))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let action: Action = serde_json::from_str(line)
            .with_context(|| format!("line {lineno}: invalid action {line:?}"))?;
        let before = store.state();
        let after = store
            .dispatch(action)
            .with_context(|| format!("line {lineno}: dispatch failed"))?;

        summary.dispatched += 1;
        if Arc::ptr_eq(&before, &after) {
            summary.unchanged += 1;
        }
        on_state(&after)?;
    }

    Ok(summary)
}

/// Writes `state` as a single JSON line.
pub fn write_state<W: Write>(out: &mut W, state: &RootState) -> Result<()> {
    serde_json::to_writer(&mut *out, state)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn store() -> RootStore {
        configure_store(StoreConfig::named("replay-test"), None).unwrap()
    }

    #[test]
    fn replays_add_then_noop() {
        let store = store();
        let log = "{\"type\":\"ADD\",\"payload\":\"repo1\"}\n\n{\"type\":\"NOOP\"}\n";
        let mut lines = Vec::new();

        let summary = replay(&store, Cursor::new(log), |state| {
            write_state(&mut lines, state)
        })
        .unwrap();

        assert_eq!(summary, ReplaySummary { dispatched: 2, unchanged: 1 });
        assert_eq!(
            String::from_utf8(lines).unwrap(),
            "{\"repositories\":[\"repo1\"]}\n{\"repositories\":[\"repo1\"]}\n"
        );
    }

    #[test]
    fn invalid_line_reports_line_number() {
        let store = store();
        let err = replay(&store, Cursor::new("{\"type\":\"NOOP\"}\nnot json\n"), |_| Ok(()))
            .unwrap_err();
        assert!(err.to_string().starts_with("line 2:"), "{err}");
        assert!(store.state().repositories.is_empty());
    }

    #[test]
    fn preloaded_state_seeds_the_store() {
        let preloaded = RootState {
            repositories: vec!["seed".into()],
        };
        let store = configure_store(StoreConfig::default(), Some(preloaded.clone())).unwrap();
        assert_eq!(*store.state(), preloaded);
    }
}
