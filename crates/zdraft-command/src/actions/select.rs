//! 选择阶段
//!
//! 变换类命令、删除以及修剪/延伸的边界选择共用的第一步：
//! 每次点选切换一个实体，回车结束选择。

use crate::action::{ActionContext, ActionResult};
use crate::selection::SelectionSet;
use tracing::debug;
use zdraft_core::entity::{Entity, EntityId};
use zdraft_core::geometry::Geometry;
use zdraft_core::math::Point2;
use zdraft_core::transform::Transform2D;

/// 选择阶段状态
#[derive(Debug, Clone, Default)]
pub struct SelectionPhase {
    set: SelectionSet,
}

impl SelectionPhase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_selection(set: SelectionSet) -> Self {
        Self { set }
    }

    /// 点选：命中时切换选择状态
    pub fn pick(&mut self, ctx: &ActionContext, point: Point2) -> ActionResult {
        match ctx.pick_for_selection(&point) {
            Some(entity) => {
                let selected = self.set.toggle(entity.id);
                debug!("{} {}", if selected { "选中" } else { "取消选中" }, entity.id);
                ActionResult::Continue
            }
            None => ActionResult::ignored("nothing under the cursor"),
        }
    }

    /// 已删除或被锁定的实体不再参与
    pub fn prune(&mut self, ctx: &ActionContext) {
        let document = ctx.document;
        self.set
            .retain(|id| document.get(*id).is_some_and(|e| document.is_editable(e)));
    }

    pub fn ids(&self) -> &[EntityId] {
        self.set.ids()
    }

    pub fn to_vec(&self) -> Vec<EntityId> {
        self.set.ids().to_vec()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.set.contains(id)
    }

    pub fn clear(&mut self) {
        self.set.clear();
    }

    /// 当前选择集在文档中对应的实体
    pub fn entities<'a>(&self, ctx: &ActionContext<'a>) -> Vec<&'a Entity> {
        self.set.ids().iter().filter_map(|id| ctx.entity(*id)).collect()
    }

    /// 原地变换全部选中实体
    pub fn transformed(&self, ctx: &ActionContext, t: &Transform2D) -> Vec<(EntityId, Geometry)> {
        self.entities(ctx)
            .into_iter()
            .map(|e| (e.id, e.geometry.transformed(t)))
            .collect()
    }

    /// 变换后的副本，保留原属性
    pub fn duplicated(&self, ctx: &ActionContext, t: &Transform2D) -> Vec<Entity> {
        self.entities(ctx)
            .into_iter()
            .map(|e| e.derive(e.geometry.transformed(t)))
            .collect()
    }
}
