// src/favorites/reducer.rs
// DOCUMENTATION: Deterministic optimistic state of one user's favorites
// PURPOSE: Apply and revert pending mutations on top of the last server state

use crate::errors::{GuideError, GuideResult};
use crate::models::{Favorite, FavoriteEntry, FavoriteKey, LocationRef, TempId};
use std::collections::HashSet;

/// Handle of a pending mutation inside one FavoritesState
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MutationId(u64);

/// Mutation applied locally but not yet settled by the server
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Placeholder shown until the create request settles
    Add {
        temp_id: TempId,
        user_id: i64,
        location: LocationRef,
        /// Placeholder was removed while the create was in flight
        cancelled: bool,
    },
    /// Confirmed favorite hidden until the delete request settles
    Remove { favorite_id: i64 },
}

/// Outcome of `begin_remove`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveTicket {
    /// Issue DELETE for `favorite_id`, then settle or revert `mutation`
    Server { mutation: MutationId, favorite_id: i64 },
    /// Removal of a placeholder; the create's settlement performs the delete
    Deferred { add_mutation: MutationId },
}

/// Outcome of a successful create
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Server record now part of the confirmed set
    Confirmed,
    /// Placeholder was removed in the meantime; the server record must be deleted
    Cancelled,
}

/// Confirmed server records plus pending mutations, in issue order
#[derive(Debug, Clone, Default)]
pub struct FavoritesState {
    confirmed: Vec<Favorite>,
    pending: Vec<(MutationId, Mutation)>,
    next_mutation: u64,
}

impl FavoritesState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known server state
    pub fn confirmed(&self) -> &[Favorite] {
        &self.confirmed
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Replace the server state with an authoritative list
    /// Pending mutations stay applied on top of it
    pub fn replace_confirmed(&mut self, favorites: Vec<Favorite>) {
        self.confirmed = favorites;
    }

    /// Displayed favorites: confirmed minus pending removals, plus pending additions
    /// DOCUMENTATION: A placeholder whose location is already confirmed is not shown
    /// twice; records with an invalid location are skipped
    pub fn view(&self) -> Vec<FavoriteEntry> {
        let hidden: HashSet<i64> = self
            .pending
            .iter()
            .filter_map(|(_, m)| match m {
                Mutation::Remove { favorite_id } => Some(*favorite_id),
                Mutation::Add { .. } => None,
            })
            .collect();

        let mut shown_locations = HashSet::new();
        let mut entries = Vec::with_capacity(self.confirmed.len() + self.pending.len());

        for favorite in &self.confirmed {
            let location = match favorite.location() {
                Ok(location) => location,
                Err(e) => {
                    log::warn!("Skipping favorite {}: {}", favorite.id, e);
                    continue;
                }
            };
            // Pending removal; its location stays free for a re-add placeholder
            if hidden.contains(&favorite.id) {
                continue;
            }
            shown_locations.insert((favorite.user_id, location));
            entries.push(FavoriteEntry {
                key: FavoriteKey::Confirmed(favorite.id),
                user_id: favorite.user_id,
                location,
                created_at: favorite.created_at,
            });
        }

        for (_, mutation) in &self.pending {
            if let Mutation::Add {
                temp_id,
                user_id,
                location,
                cancelled: false,
            } = mutation
            {
                if shown_locations.insert((*user_id, *location)) {
                    entries.push(FavoriteEntry {
                        key: FavoriteKey::Pending(*temp_id),
                        user_id: *user_id,
                        location: *location,
                        created_at: None,
                    });
                }
            }
        }

        entries
    }

    /// Whether `key` names a confirmed record or a live placeholder of this state
    /// A placeholder folded into a confirmed entry by `view` still counts
    pub fn owns(&self, key: FavoriteKey) -> bool {
        match key {
            FavoriteKey::Confirmed(favorite_id) => {
                self.confirmed.iter().any(|f| f.id == favorite_id)
            }
            FavoriteKey::Pending(temp) => self.pending.iter().any(|(_, m)| {
                matches!(m, Mutation::Add { temp_id, cancelled: false, .. } if *temp_id == temp)
            }),
        }
    }

    /// Insert a placeholder for a create about to be issued
    pub fn begin_add(&mut self, user_id: i64, location: LocationRef) -> (MutationId, TempId) {
        let mutation = self.next_id();
        let temp_id = TempId::generate();
        self.pending.push((
            mutation,
            Mutation::Add {
                temp_id,
                user_id,
                location,
                cancelled: false,
            },
        ));
        (mutation, temp_id)
    }

    /// Hide an entry for a delete about to be issued
    /// Fails with NotFound when `key` is not displayed
    pub fn begin_remove(&mut self, key: FavoriteKey) -> GuideResult<RemoveTicket> {
        match key {
            FavoriteKey::Confirmed(favorite_id) => {
                let known = self.confirmed.iter().any(|f| f.id == favorite_id);
                let already_removing = self.pending.iter().any(|(_, m)| {
                    matches!(m, Mutation::Remove { favorite_id: id } if *id == favorite_id)
                });
                if !known || already_removing {
                    return Err(GuideError::NotFound(format!("favorite {}", key)));
                }

                let mutation = self.next_id();
                self.pending
                    .push((mutation, Mutation::Remove { favorite_id }));
                Ok(RemoveTicket::Server {
                    mutation,
                    favorite_id,
                })
            }
            FavoriteKey::Pending(temp) => {
                let add = self.pending.iter_mut().find_map(|(id, m)| match m {
                    Mutation::Add {
                        temp_id, cancelled, ..
                    } if *temp_id == temp && !*cancelled => Some((*id, cancelled)),
                    _ => None,
                });

                match add {
                    Some((add_mutation, cancelled)) => {
                        *cancelled = true;
                        Ok(RemoveTicket::Deferred { add_mutation })
                    }
                    None => Err(GuideError::NotFound(format!("favorite {}", key))),
                }
            }
        }
    }

    /// Settle a successful create with the server record
    pub fn confirm_add(&mut self, mutation: MutationId, favorite: Favorite) -> AddOutcome {
        let cancelled = match self.take(mutation) {
            Some(Mutation::Add { cancelled, .. }) => cancelled,
            _ => false,
        };

        if cancelled {
            return AddOutcome::Cancelled;
        }

        if !self.confirmed.iter().any(|f| f.id == favorite.id) {
            self.confirmed.push(favorite);
        }
        AddOutcome::Confirmed
    }

    /// Settle a successful delete
    pub fn confirm_remove(&mut self, mutation: MutationId) {
        if let Some(Mutation::Remove { favorite_id }) = self.take(mutation) {
            self.confirmed.retain(|f| f.id != favorite_id);
        }
    }

    /// Roll back a failed mutation
    pub fn revert(&mut self, mutation: MutationId) -> Option<Mutation> {
        self.take(mutation)
    }

    fn take(&mut self, mutation: MutationId) -> Option<Mutation> {
        let index = self.pending.iter().position(|(id, _)| *id == mutation)?;
        Some(self.pending.remove(index).1)
    }

    fn next_id(&mut self) -> MutationId {
        self.next_mutation += 1;
        MutationId(self.next_mutation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn favorite(id: i64, user_id: i64, location: LocationRef) -> Favorite {
        let (attraction_id, restaurant_id) = location.into_parts();
        Favorite {
            id,
            user_id,
            attraction_id,
            restaurant_id,
            created_at: None,
        }
    }

    fn keys(state: &FavoritesState) -> Vec<FavoriteKey> {
        state.view().into_iter().map(|e| e.key).collect()
    }

    fn seeded() -> FavoritesState {
        let mut state = FavoritesState::new();
        state.replace_confirmed(vec![favorite(1, 3, LocationRef::Attraction(5))]);
        state
    }

    #[test]
    fn test_add_shows_placeholder_then_confirms() {
        let mut state = seeded();
        let (mutation, temp) = state.begin_add(3, LocationRef::Restaurant(9));

        let view = state.view();
        assert_eq!(view.len(), 2);
        assert_eq!(view[0].key, FavoriteKey::Confirmed(1));
        assert_eq!(view[1].key, FavoriteKey::Pending(temp));
        assert_eq!(view[1].location, LocationRef::Restaurant(9));

        let outcome = state.confirm_add(mutation, favorite(42, 3, LocationRef::Restaurant(9)));
        assert_eq!(outcome, AddOutcome::Confirmed);
        assert_eq!(
            keys(&state),
            vec![FavoriteKey::Confirmed(1), FavoriteKey::Confirmed(42)]
        );
        assert!(!state.has_pending());
    }

    #[test]
    fn test_revert_add_restores_previous_view() {
        let mut state = seeded();
        let before = state.view();

        let (mutation, _) = state.begin_add(3, LocationRef::Restaurant(9));
        assert_ne!(state.view(), before);

        state.revert(mutation);
        assert_eq!(state.view(), before);
    }

    #[test]
    fn test_remove_hides_then_reappears_on_revert() {
        let mut state = seeded();
        state.replace_confirmed(vec![
            favorite(1, 3, LocationRef::Attraction(5)),
            favorite(2, 3, LocationRef::Restaurant(9)),
        ]);
        let before = state.view();

        let ticket = state.begin_remove(FavoriteKey::Confirmed(1)).unwrap();
        assert_eq!(keys(&state), vec![FavoriteKey::Confirmed(2)]);

        let RemoveTicket::Server { mutation, favorite_id } = ticket else {
            panic!("expected a server removal");
        };
        assert_eq!(favorite_id, 1);

        state.revert(mutation);
        assert_eq!(state.view(), before);
    }

    #[test]
    fn test_confirm_remove_drops_record() {
        let mut state = seeded();
        let ticket = state.begin_remove(FavoriteKey::Confirmed(1)).unwrap();
        let RemoveTicket::Server { mutation, .. } = ticket else {
            panic!("expected a server removal");
        };

        state.confirm_remove(mutation);
        assert!(state.view().is_empty());
        assert!(state.confirmed().is_empty());
    }

    #[test]
    fn test_remove_unknown_key_is_not_found() {
        let mut state = seeded();
        assert!(matches!(
            state.begin_remove(FavoriteKey::Confirmed(99)),
            Err(GuideError::NotFound(_))
        ));
        assert!(matches!(
            state.begin_remove(FavoriteKey::Pending(TempId::generate())),
            Err(GuideError::NotFound(_))
        ));

        // Second removal of the same record while the first is pending
        state.begin_remove(FavoriteKey::Confirmed(1)).unwrap();
        assert!(matches!(
            state.begin_remove(FavoriteKey::Confirmed(1)),
            Err(GuideError::NotFound(_))
        ));
    }

    #[test]
    fn test_remove_placeholder_cancels_add() {
        let mut state = seeded();
        let (mutation, temp) = state.begin_add(3, LocationRef::Restaurant(9));

        let ticket = state.begin_remove(FavoriteKey::Pending(temp)).unwrap();
        assert_eq!(
            ticket,
            RemoveTicket::Deferred {
                add_mutation: mutation
            }
        );
        assert_eq!(keys(&state), vec![FavoriteKey::Confirmed(1)]);

        let outcome = state.confirm_add(mutation, favorite(42, 3, LocationRef::Restaurant(9)));
        assert_eq!(outcome, AddOutcome::Cancelled);
        assert_eq!(keys(&state), vec![FavoriteKey::Confirmed(1)]);
        assert!(!state.has_pending());
    }

    #[test]
    fn test_placeholder_not_duplicated_by_refetch() {
        let mut state = seeded();
        let (mutation, _) = state.begin_add(3, LocationRef::Restaurant(9));

        // Refetch observed the server record before the create response arrived
        state.replace_confirmed(vec![
            favorite(1, 3, LocationRef::Attraction(5)),
            favorite(42, 3, LocationRef::Restaurant(9)),
        ]);
        assert_eq!(
            keys(&state),
            vec![FavoriteKey::Confirmed(1), FavoriteKey::Confirmed(42)]
        );

        state.confirm_add(mutation, favorite(42, 3, LocationRef::Restaurant(9)));
        assert_eq!(state.confirmed().len(), 2);
    }

    #[test]
    fn test_concurrent_mutations_revert_independently() {
        let mut state = seeded();
        let (first, _) = state.begin_add(3, LocationRef::Restaurant(9));
        let (second, second_temp) = state.begin_add(3, LocationRef::Attraction(6));

        state.revert(first);
        assert_eq!(
            keys(&state),
            vec![FavoriteKey::Confirmed(1), FavoriteKey::Pending(second_temp)]
        );

        state.revert(second);
        assert_eq!(keys(&state), vec![FavoriteKey::Confirmed(1)]);
    }

    #[test]
    fn test_invalid_server_records_are_skipped() {
        let mut state = FavoritesState::new();
        state.replace_confirmed(vec![Favorite {
            id: 8,
            user_id: 3,
            attraction_id: None,
            restaurant_id: None,
            created_at: None,
        }]);
        assert!(state.view().is_empty());
    }

    #[test]
    fn test_placeholder_hidden_by_dedup_can_be_removed() {
        let mut state = seeded();
        let (_, temp_id) = state.begin_add(3, LocationRef::Attraction(5));
        let key = FavoriteKey::Pending(temp_id);

        // Same location as the confirmed record: shown once
        assert_eq!(keys(&state), vec![FavoriteKey::Confirmed(1)]);
        assert!(state.owns(key));

        assert!(matches!(
            state.begin_remove(key),
            Ok(RemoveTicket::Deferred { .. })
        ));
        assert!(!state.owns(key));
        assert!(state.owns(FavoriteKey::Confirmed(1)));
    }
}
