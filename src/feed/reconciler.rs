//! Preference reconciliation.
//!
//! A preference change is classified into one of three outcomes before any
//! state is touched:
//!
//! - **FullReset** - some kind was newly enabled. Re-admitting a kind
//!   without resetting would under-represent it against kinds that were
//!   never disabled, so the whole session restarts: seen, preparing and
//!   ready are cleared and the epoch advances.
//! - **PartialPrune** - kinds were only disabled. Buffered cards of those
//!   kinds are dropped; everything else is left alone.
//! - **Idle** - the enabled-kind set did not change.
//!
//! Classification works on the preference->kind mapping alone. Pool
//! emptiness affects which kinds the selector visits, not how a preference
//! change is handled.

use crate::core::{KindList, Preferences};

/// The outcome of classifying a preference change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Reconciliation {
    /// At least one kind newly enabled: clear all bookkeeping, bump the
    /// epoch, refill from scratch.
    FullReset,
    /// Kinds only disabled: drop their buffered cards, keep the rest.
    PartialPrune {
        /// The kinds that were turned off.
        disabled: KindList,
    },
    /// No change to the enabled-kind set.
    Idle,
}

/// Classify a preference change.
pub(crate) fn classify(old: &Preferences, new: &Preferences) -> Reconciliation {
    let old_kinds = old.enabled_kinds();
    let new_kinds = new.enabled_kinds();

    let any_added = new_kinds.iter().any(|kind| !old_kinds.contains(kind));
    if any_added {
        return Reconciliation::FullReset;
    }

    let disabled: KindList = old_kinds
        .iter()
        .copied()
        .filter(|kind| !new_kinds.contains(kind))
        .collect();

    if disabled.is_empty() {
        Reconciliation::Idle
    } else {
        Reconciliation::PartialPrune { disabled }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardKind;

    #[test]
    fn test_no_change_is_idle() {
        let prefs = Preferences::all();
        assert_eq!(classify(&prefs, &prefs), Reconciliation::Idle);
    }

    #[test]
    fn test_newly_enabled_kind_forces_full_reset() {
        let old = Preferences::none().with_texts(true);
        let new = old.with_genres(true);

        assert_eq!(classify(&old, &new), Reconciliation::FullReset);
    }

    #[test]
    fn test_re_enabling_same_kind_is_full_reset() {
        let on = Preferences::none().with_texts(true);
        let off = on.with_texts(false);

        // Disable then re-enable: the re-enable leg resets.
        assert!(matches!(classify(&on, &off), Reconciliation::PartialPrune { .. }));
        assert_eq!(classify(&off, &on), Reconciliation::FullReset);
    }

    #[test]
    fn test_disable_only_is_partial_prune() {
        let old = Preferences::all();
        let new = old.with_genres(false);

        match classify(&old, &new) {
            Reconciliation::PartialPrune { disabled } => {
                assert_eq!(disabled.as_slice(), &[CardKind::Genre]);
            }
            other => panic!("expected PartialPrune, got {:?}", other),
        }
    }

    #[test]
    fn test_topics_flag_covers_topic_and_author() {
        let old = Preferences::all();
        let new = old.with_topics(false);

        match classify(&old, &new) {
            Reconciliation::PartialPrune { disabled } => {
                assert!(disabled.contains(&CardKind::Topic));
                assert!(disabled.contains(&CardKind::Author));
                assert_eq!(disabled.len(), 2);
            }
            other => panic!("expected PartialPrune, got {:?}", other),
        }

        // And re-enabling topics is a reset, like any other enable.
        assert_eq!(classify(&new, &old), Reconciliation::FullReset);
    }

    #[test]
    fn test_simultaneous_enable_and_disable_resets() {
        let old = Preferences::none().with_texts(true);
        let new = Preferences::none().with_genres(true);

        // Text turned off AND genre turned on: the enable wins.
        assert_eq!(classify(&old, &new), Reconciliation::FullReset);
    }
}
