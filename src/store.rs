use rustc_hash::FxHashMap;

use crate::{DrawMarginBelief, Error, SkillBelief};

/// Dense handle of a player, in order of first appearance.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct PlayerId(usize);

impl PlayerId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Default, Clone)]
struct PlayerIds {
    inner: FxHashMap<Box<str>, PlayerId>,
    names: Vec<Box<str>>,
}

impl PlayerIds {
    fn get_or_insert(&mut self, name: &str) -> (PlayerId, bool) {
        if let Some(&id) = self.inner.get(name) {
            return (id, false);
        }
        let id = PlayerId(self.names.len());
        self.inner.insert(name.into(), id);
        self.names.push(name.into());
        (id, true)
    }

    fn get(&self, name: &str) -> Option<PlayerId> {
        self.inner.get(name).copied()
    }

    fn name(&self, PlayerId(id): PlayerId) -> &str {
        &self.names[id]
    }
}

/// Append-only history of skill beliefs per player, plus the shared history
/// of draw margin beliefs.
#[derive(Debug, Clone)]
pub struct RatingStore {
    players: PlayerIds,
    skills: Vec<Vec<SkillBelief>>,
    draw_margins: Vec<DrawMarginBelief>,
}

impl RatingStore {
    pub fn new(initial_draw_margin: DrawMarginBelief) -> RatingStore {
        RatingStore {
            players: PlayerIds::default(),
            skills: Vec::new(),
            draw_margins: vec![initial_draw_margin],
        }
    }

    /// Registers `name` with history `[prior]`, unless already known.
    /// Returns `true` if the player was new.
    pub fn ensure_player(&mut self, name: &str, prior: SkillBelief) -> bool {
        let (PlayerId(id), inserted) = self.players.get_or_insert(name);
        if inserted {
            debug_assert_eq!(id, self.skills.len());
            self.skills.push(vec![prior]);
        }
        inserted
    }

    pub fn contains(&self, name: &str) -> bool {
        self.players.get(name).is_some()
    }

    pub fn player_id(&self, name: &str) -> Result<PlayerId, Error> {
        self.players
            .get(name)
            .ok_or_else(|| Error::UnknownPlayer(name.into()))
    }

    pub fn append_skill(&mut self, name: &str, belief: SkillBelief) -> Result<(), Error> {
        let PlayerId(id) = self.player_id(name)?;
        self.skills[id].push(belief);
        Ok(())
    }

    pub fn append_draw_margin(&mut self, belief: DrawMarginBelief) {
        self.draw_margins.push(belief);
    }

    pub fn latest(&self, name: &str) -> Result<SkillBelief, Error> {
        self.history(name).map(|history| history[history.len() - 1])
    }

    pub fn history(&self, name: &str) -> Result<&[SkillBelief], Error> {
        let PlayerId(id) = self.player_id(name)?;
        Ok(&self.skills[id])
    }

    pub fn latest_draw_margin(&self) -> DrawMarginBelief {
        self.draw_margins[self.draw_margins.len() - 1]
    }

    pub fn draw_margin_history(&self) -> &[DrawMarginBelief] {
        &self.draw_margins
    }

    /// Latest belief of every known player.
    pub fn all_latest(&self) -> FxHashMap<Box<str>, SkillBelief> {
        self.iter()
            .map(|(name, history)| (name.into(), history[history.len() - 1]))
            .collect()
    }

    /// Players with their histories, in order of first appearance.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[SkillBelief])> + '_ {
        self.skills
            .iter()
            .enumerate()
            .map(|(id, history)| (self.players.name(PlayerId(id)), history.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Gaussian;

    fn store() -> RatingStore {
        RatingStore::new(Gaussian::new(1.0, 0.1))
    }

    #[test]
    fn test_ensure_player_is_idempotent() {
        let mut store = store();
        assert!(store.ensure_player("alice", Gaussian::new(0.0, 1.0)));
        assert!(!store.ensure_player("alice", Gaussian::new(5.0, 1.0)));
        assert_eq!(store.history("alice").unwrap(), [Gaussian::new(0.0, 1.0)]);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_append_and_latest() {
        let mut store = store();
        store.ensure_player("alice", Gaussian::new(0.0, 1.0));
        store.append_skill("alice", Gaussian::new(1.0, 0.5)).unwrap();
        store.append_skill("alice", Gaussian::new(2.0, 0.25)).unwrap();
        assert_eq!(store.latest("alice").unwrap(), Gaussian::new(2.0, 0.25));
        assert_eq!(store.history("alice").unwrap().len(), 3);
    }

    #[test]
    fn test_unknown_player() {
        let mut store = store();
        assert!(matches!(store.latest("bob"), Err(Error::UnknownPlayer(_))));
        assert!(matches!(store.history("bob"), Err(Error::UnknownPlayer(_))));
        assert!(matches!(
            store.append_skill("bob", Gaussian::new(0.0, 1.0)),
            Err(Error::UnknownPlayer(_))
        ));
    }

    #[test]
    fn test_draw_margin_history() {
        let mut store = store();
        assert_eq!(store.draw_margin_history().len(), 1);
        store.append_draw_margin(Gaussian::new(2.0, 0.1));
        assert_eq!(store.latest_draw_margin(), Gaussian::new(2.0, 0.1));
        assert_eq!(store.draw_margin_history().len(), 2);
    }

    #[test]
    fn test_iter_in_insertion_order() {
        let mut store = store();
        for name in ["carol", "alice", "bob"] {
            store.ensure_player(name, Gaussian::new(0.0, 1.0));
        }
        let names: Vec<_> = store.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["carol", "alice", "bob"]);
        assert_eq!(store.all_latest().len(), 3);
    }
}
