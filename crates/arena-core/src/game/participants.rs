use std::collections::BTreeSet;

use crate::environment::{EnvironmentId, Platform, PlayerId};

/// Identities counted as active players of a game.
///
/// The stored set may go stale (players disconnect or wander off); it is
/// reconciled against the platform whenever it is read through
/// [`ParticipantSet::reconcile`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticipantSet {
    ids: BTreeSet<PlayerId>,
}

impl ParticipantSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, player: PlayerId) -> bool {
        self.ids.insert(player)
    }

    pub fn remove(&mut self, player: PlayerId) -> bool {
        self.ids.remove(&player)
    }

    pub fn contains(&self, player: PlayerId) -> bool {
        self.ids.contains(&player)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Replaces the whole set.
    pub fn replace(&mut self, players: impl IntoIterator<Item = PlayerId>) {
        self.ids = players.into_iter().collect();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Drops every identity that is offline or no longer located in
    /// `environment`, then returns the remaining set.
    pub fn reconcile(
        &mut self,
        platform: &dyn Platform,
        environment: &EnvironmentId,
    ) -> BTreeSet<PlayerId> {
        self.ids
            .retain(|player| platform.locate(*player).as_ref() == Some(environment));
        self.ids.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::{Location, SimulatedPlatform};

    #[test]
    fn test_reconcile_prunes_departed_players() {
        let platform = SimulatedPlatform::new();
        let arena = EnvironmentId::from("arena");
        let lobby = EnvironmentId::from("lobby");
        platform.add_environment(arena.clone(), Location::default());
        platform.add_environment(lobby.clone(), Location::default());

        let stays = PlayerId::new_v4();
        let walks = PlayerId::new_v4();
        let quits = PlayerId::new_v4();
        for player in [stays, walks, quits] {
            platform.connect(player, &arena);
        }

        let mut set = ParticipantSet::new();
        set.replace([stays, walks, quits]);

        platform.move_player(walks, &lobby);
        platform.disconnect(quits);

        let live = set.reconcile(&platform, &arena);
        assert_eq!(live.into_iter().collect::<Vec<_>>(), vec![stays]);
        assert_eq!(set.len(), 1);
    }
}
