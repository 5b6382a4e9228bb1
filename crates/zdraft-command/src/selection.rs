//! 选择集

use serde::{Deserialize, Serialize};
use zdraft_core::entity::EntityId;

/// 有序选择集，点选为叠加切换
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSet {
    ids: Vec<EntityId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ids(ids: impl IntoIterator<Item = EntityId>) -> Self {
        let mut set = Self::new();
        for id in ids {
            set.add(id);
        }
        set
    }

    pub fn add(&mut self, id: EntityId) {
        if !self.ids.contains(&id) {
            self.ids.push(id);
        }
    }

    pub fn remove(&mut self, id: &EntityId) {
        self.ids.retain(|e| e != id);
    }

    /// 切换选择状态，返回切换后是否处于选中状态
    pub fn toggle(&mut self, id: EntityId) -> bool {
        if self.contains(&id) {
            self.remove(&id);
            false
        } else {
            self.ids.push(id);
            true
        }
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.ids.contains(id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn ids(&self) -> &[EntityId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// 保留仍满足条件的实体（例如文档里已删除的实体）
    pub fn retain(&mut self, f: impl FnMut(&EntityId) -> bool) {
        self.ids.retain(f);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_is_additive() {
        let mut set = SelectionSet::new();
        assert!(set.toggle(EntityId(3)));
        assert!(set.toggle(EntityId(1)));
        assert_eq!(set.ids(), &[EntityId(3), EntityId(1)]);

        assert!(!set.toggle(EntityId(3)));
        assert_eq!(set.ids(), &[EntityId(1)]);
    }

    #[test]
    fn test_from_ids_dedups() {
        let set = SelectionSet::from_ids([EntityId(2), EntityId(2), EntityId(5)]);
        assert_eq!(set.len(), 2);
    }
}
