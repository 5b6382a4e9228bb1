//! 文档模型
//!
//! 实体按创建顺序保存，ID 单调分配且不复用。文档只在命令完成时
//! 通过 [`EditBatch`] 整批修改，批次要么全部生效，要么全部不生效。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use zdraft_core::dimension::{DimChain, Dimension};
use zdraft_core::entity::{Entity, EntityId, DEFAULT_LAYER};
use zdraft_core::geometry::Geometry;
use zdraft_core::layer::Layer;

use crate::error::CommandError;

/// 一次命令提交的修改
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditBatch {
    /// 新绘制的几何（使用当前图层）
    pub create: Vec<Geometry>,
    /// 已有实体的副本（保留原属性）
    pub duplicate: Vec<Entity>,
    /// 原地替换几何
    pub modify: Vec<(EntityId, Geometry)>,
    pub delete: Vec<EntityId>,
}

impl EditBatch {
    pub fn create(geometry: impl Into<Vec<Geometry>>) -> Self {
        Self {
            create: geometry.into(),
            ..Self::default()
        }
    }

    pub fn create_one(geometry: Geometry) -> Self {
        Self::create(vec![geometry])
    }

    pub fn modify(changes: Vec<(EntityId, Geometry)>) -> Self {
        Self {
            modify: changes,
            ..Self::default()
        }
    }

    pub fn delete(ids: Vec<EntityId>) -> Self {
        Self {
            delete: ids,
            ..Self::default()
        }
    }

    pub fn duplicate(entities: Vec<Entity>) -> Self {
        Self {
            duplicate: entities,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.create.is_empty() && self.duplicate.is_empty() && self.modify.is_empty() && self.delete.is_empty()
    }

    /// 合并另一个批次
    pub fn merge(mut self, other: EditBatch) -> Self {
        self.create.extend(other.create);
        self.duplicate.extend(other.duplicate);
        self.modify.extend(other.modify);
        self.delete.extend(other.delete);
        self
    }
}

/// 批次提交结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub created: Vec<EntityId>,
    pub modified: Vec<EntityId>,
    pub deleted: Vec<EntityId>,
}

/// 文档
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    entities: Vec<Entity>,
    layers: BTreeMap<String, Layer>,
    current_layer: String,
    next_entity_id: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut doc = Self {
            entities: Vec::new(),
            layers: BTreeMap::new(),
            current_layer: DEFAULT_LAYER.to_string(),
            next_entity_id: 1,
        };
        doc.ensure_layer(DEFAULT_LAYER);
        doc
    }

    fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_entity_id);
        self.next_entity_id += 1;
        id
    }

    // ========== 图层 ==========

    pub fn ensure_layer(&mut self, name: impl AsRef<str>) {
        let key = name.as_ref();
        self.layers
            .entry(key.to_string())
            .or_insert_with(|| Layer::new(key));
    }

    pub fn add_layer(&mut self, layer: Layer) {
        self.layers.insert(layer.name.clone(), layer);
    }

    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.get(name)
    }

    pub fn layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.values()
    }

    pub fn current_layer(&self) -> &str {
        &self.current_layer
    }

    pub fn set_current_layer(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.ensure_layer(&name);
        self.current_layer = name;
    }

    // ========== 实体 ==========

    /// 直接加入一个实体（脚本、测试或导入使用），返回分配的 ID
    pub fn add_entity(&mut self, mut entity: Entity) -> EntityId {
        self.ensure_layer(&entity.layer);
        let id = self.next_id();
        entity.id = id;
        self.entities.push(entity);
        id
    }

    /// 在当前图层加入几何
    pub fn add(&mut self, geometry: Geometry) -> EntityId {
        let entity = Entity::new(geometry).with_layer(self.current_layer.clone());
        self.add_entity(entity)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// 按创建顺序遍历
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn last(&self) -> Option<&Entity> {
        self.entities.last()
    }

    /// 最后创建的线性/对齐类标注（连续、基线标注的起点）
    pub fn last_linear_dimension(&self) -> Option<&Dimension> {
        self.entities.iter().rev().find_map(|e| match &e.geometry {
            Geometry::Dimension(dim) if DimChain::from_dimension(dim).is_some() => Some(dim),
            _ => None,
        })
    }

    /// 实体及其图层都可见
    pub fn is_visible(&self, entity: &Entity) -> bool {
        entity.visible && self.layer(&entity.layer).map_or(true, |l| l.visible)
    }

    /// 实体及其图层都可见且未锁定
    pub fn is_editable(&self, entity: &Entity) -> bool {
        self.is_visible(entity)
            && !entity.locked
            && self.layer(&entity.layer).map_or(true, |l| !l.locked)
    }

    /// 可见实体（拾取、悬停）
    pub fn visible_entities(&self) -> Vec<&Entity> {
        self.entities.iter().filter(|e| self.is_visible(e)).collect()
    }

    /// 可编辑实体（捕捉、修剪边界、变换）
    pub fn editable_entities(&self) -> Vec<&Entity> {
        self.entities.iter().filter(|e| self.is_editable(e)).collect()
    }

    /// 整批提交
    ///
    /// 先检查所有被修改或删除的实体都存在且可编辑，任何一项不满足都
    /// 不做修改直接返回错误。`elevation` 写入新绘制的实体。
    pub fn apply(&mut self, batch: EditBatch, elevation: f64) -> Result<BatchOutcome, CommandError> {
        for id in batch.modify.iter().map(|(id, _)| id).chain(batch.delete.iter()) {
            let entity = self.get(*id).ok_or(CommandError::EntityNotFound(*id))?;
            if !self.is_editable(entity) {
                return Err(CommandError::EntityLocked(*id));
            }
        }

        let mut outcome = BatchOutcome::default();

        for (id, geometry) in batch.modify {
            if let Some(entity) = self.get_mut(id) {
                entity.geometry = geometry;
                outcome.modified.push(id);
            }
        }

        for geometry in batch.create {
            let entity = Entity::new(geometry)
                .with_layer(self.current_layer.clone())
                .with_elevation(elevation);
            outcome.created.push(self.add_entity(entity));
        }

        for entity in batch.duplicate {
            outcome.created.push(self.add_entity(entity));
        }

        if !batch.delete.is_empty() {
            self.entities.retain(|e| !batch.delete.contains(&e.id));
            outcome.deleted = batch.delete;
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zdraft_core::geometry::{Circle, Line};
    use zdraft_core::math::Point2;

    fn line() -> Geometry {
        Geometry::Line(Line::new(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)))
    }

    #[test]
    fn test_ids_are_monotonic_and_never_reused() {
        let mut doc = Document::new();
        let a = doc.add(line());
        let b = doc.add(line());
        assert!(b > a);

        doc.apply(EditBatch::delete(vec![b]), 0.0).unwrap();
        let c = doc.add(line());
        assert!(c > b);
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_batch_is_atomic() {
        let mut doc = Document::new();
        let a = doc.add(line());
        let circle = Geometry::Circle(Circle::new(Point2::origin(), 1.0));

        let batch = EditBatch {
            create: vec![circle.clone()],
            modify: vec![(a, circle.clone()), (EntityId(99), circle)],
            ..EditBatch::default()
        };
        assert_eq!(doc.apply(batch, 0.0), Err(CommandError::EntityNotFound(EntityId(99))));
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.get(a).map(|e| e.geometry.type_name()), Some("Line"));
    }

    #[test]
    fn test_locked_layer_blocks_modification() {
        let mut doc = Document::new();
        doc.add_layer(Layer {
            locked: true,
            ..Layer::new("frozen")
        });
        let id = doc.add_entity(Entity::new(line()).with_layer("frozen"));
        assert_eq!(
            doc.apply(EditBatch::delete(vec![id]), 0.0),
            Err(CommandError::EntityLocked(id))
        );
        assert!(doc.editable_entities().is_empty());
        assert_eq!(doc.visible_entities().len(), 1);
    }

    #[test]
    fn test_created_entities_use_current_layer_and_elevation() {
        let mut doc = Document::new();
        doc.set_current_layer("walls");
        let outcome = doc.apply(EditBatch::create_one(line()), 3.5).unwrap();
        let entity = doc.get(outcome.created[0]).unwrap();
        assert_eq!(entity.layer, "walls");
        assert_eq!(entity.elevation, 3.5);
        assert!(doc.layer("walls").is_some());
    }
}
