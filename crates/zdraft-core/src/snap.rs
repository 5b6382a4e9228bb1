//! 对象捕捉系统
//!
//! 实现 CAD 标准的对象捕捉功能。
//!
//! 支持的捕捉类型：
//! - 端点 (Endpoint)
//! - 中点 (Midpoint)
//! - 圆心 (Center)
//! - 象限点 (Quadrant)
//! - 交点 (Intersection)
//! - 垂足 (Perpendicular)
//! - 切点 (Tangent)
//! - 最近点 (Nearest)
//! - 节点 (Node)
//! - 网格点 (Grid)
//!
//! 候选点按到光标的距离排序，距离相同时按优先级决定。

use crate::dimension::DimDefinition;
use crate::entity::{Entity, EntityId};
use crate::geometry::{Arc, Circle, Geometry, Line, PolylineSegment};
use crate::intersect::find_entity_intersections;
use crate::math::{angle_of, Point2, EPSILON};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};

/// 捕捉类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SnapType {
    /// 端点捕捉
    Endpoint,
    /// 中点捕捉
    Midpoint,
    /// 圆心捕捉
    Center,
    /// 交点捕捉
    Intersection,
    /// 垂足捕捉
    Perpendicular,
    /// 切点捕捉
    Tangent,
    /// 最近点捕捉
    Nearest,
    /// 网格点捕捉
    Grid,
    /// 象限点（圆/弧的0°, 90°, 180°, 270°位置）
    Quadrant,
    /// 节点（点标记、文字插入点、标注定义点）
    Node,
}

impl SnapType {
    pub const ALL: [SnapType; 10] = [
        SnapType::Endpoint,
        SnapType::Midpoint,
        SnapType::Center,
        SnapType::Intersection,
        SnapType::Perpendicular,
        SnapType::Tangent,
        SnapType::Nearest,
        SnapType::Grid,
        SnapType::Quadrant,
        SnapType::Node,
    ];

    /// 获取捕捉类型的名称
    pub fn name(&self) -> &'static str {
        match self {
            SnapType::Endpoint => "端点",
            SnapType::Midpoint => "中点",
            SnapType::Center => "圆心",
            SnapType::Intersection => "交点",
            SnapType::Perpendicular => "垂足",
            SnapType::Tangent => "切点",
            SnapType::Nearest => "最近点",
            SnapType::Grid => "网格点",
            SnapType::Quadrant => "象限点",
            SnapType::Node => "节点",
        }
    }

    /// 获取捕捉类型的快捷键
    pub fn shortcut(&self) -> &'static str {
        match self {
            SnapType::Endpoint => "END",
            SnapType::Midpoint => "MID",
            SnapType::Center => "CEN",
            SnapType::Intersection => "INT",
            SnapType::Perpendicular => "PER",
            SnapType::Tangent => "TAN",
            SnapType::Nearest => "NEA",
            SnapType::Grid => "GRI",
            SnapType::Quadrant => "QUA",
            SnapType::Node => "NOD",
        }
    }

    /// 渲染器使用的标记形状
    pub fn marker(&self) -> SnapMarker {
        match self {
            SnapType::Endpoint => SnapMarker::Square,
            SnapType::Midpoint => SnapMarker::Triangle,
            SnapType::Center => SnapMarker::Circle,
            SnapType::Intersection | SnapType::Node => SnapMarker::Cross,
            SnapType::Quadrant => SnapMarker::Diamond,
            SnapType::Perpendicular => SnapMarker::RightAngle,
            SnapType::Tangent => SnapMarker::TangentCircle,
            SnapType::Nearest => SnapMarker::Hourglass,
            SnapType::Grid => SnapMarker::Plus,
        }
    }

    fn mask_bit(&self) -> u16 {
        match self {
            SnapType::Endpoint => SnapMask::ENDPOINT,
            SnapType::Midpoint => SnapMask::MIDPOINT,
            SnapType::Center => SnapMask::CENTER,
            SnapType::Intersection => SnapMask::INTERSECTION,
            SnapType::Perpendicular => SnapMask::PERPENDICULAR,
            SnapType::Tangent => SnapMask::TANGENT,
            SnapType::Nearest => SnapMask::NEAREST,
            SnapType::Grid => SnapMask::GRID,
            SnapType::Quadrant => SnapMask::QUADRANT,
            SnapType::Node => SnapMask::NODE,
        }
    }
}

/// 捕捉标记形状
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnapMarker {
    Square,
    Triangle,
    Circle,
    Cross,
    Diamond,
    RightAngle,
    TangentCircle,
    Hourglass,
    Plus,
}

/// 捕捉点
#[derive(Debug, Clone, PartialEq)]
pub struct SnapPoint {
    /// 捕捉到的世界坐标
    pub point: Point2,
    /// 捕捉类型
    pub snap_type: SnapType,
    /// 关联的实体ID（交点为第一个实体）
    pub entity_id: Option<EntityId>,
    /// 距离鼠标的距离（世界坐标，用于排序）
    pub distance: f64,
}

impl SnapPoint {
    pub fn new(point: Point2, snap_type: SnapType, entity_id: Option<EntityId>, distance: f64) -> Self {
        Self {
            point,
            snap_type,
            entity_id,
            distance,
        }
    }
}

/// 捕捉解析结果
#[derive(Debug, Clone, PartialEq)]
pub enum SnapResult {
    /// 吸附到候选点
    Snapped {
        point: Point2,
        mode: SnapType,
        entity: Option<EntityId>,
    },
    /// 未吸附，返回原始点；磁吸关闭时 `candidate` 仍用于显示标记
    Raw {
        point: Point2,
        candidate: Option<SnapPoint>,
    },
}

impl SnapResult {
    /// 命令实际使用的点
    pub fn point(&self) -> Point2 {
        match self {
            SnapResult::Snapped { point, .. } | SnapResult::Raw { point, .. } => *point,
        }
    }

    pub fn is_snapped(&self) -> bool {
        matches!(self, SnapResult::Snapped { .. })
    }

    /// 需要显示的标记
    pub fn marker(&self) -> Option<(Point2, SnapMarker)> {
        match self {
            SnapResult::Snapped { point, mode, .. } => Some((*point, mode.marker())),
            SnapResult::Raw { candidate, .. } => candidate.as_ref().map(|c| (c.point, c.snap_type.marker())),
        }
    }
}

/// 捕捉配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    /// 总开关
    pub enabled: bool,
    /// 捕捉容差（屏幕像素）
    pub tolerance: f64,
    /// 启用的捕捉类型
    pub enabled_types: SnapMask,
    /// 网格间距
    pub grid_spacing: f64,
    /// 是否显示捕捉标记
    pub show_markers: bool,
    /// 是否显示捕捉提示
    pub show_tooltips: bool,
    /// 磁吸：开启时光标被拉到捕捉点，关闭时只显示标记
    pub magnet: bool,
    /// 磁吸范围占捕捉容差的比例 (0, 1]
    pub magnet_strength: f64,
    /// 距离相同时的优先级（靠前优先）
    pub priority: Vec<SnapType>,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tolerance: 10.0, // 10像素
            enabled_types: SnapMask::default(),
            grid_spacing: 10.0,
            show_markers: true,
            show_tooltips: true,
            magnet: true,
            magnet_strength: 1.0,
            priority: vec![
                SnapType::Endpoint,
                SnapType::Node,
                SnapType::Intersection,
                SnapType::Center,
                SnapType::Midpoint,
                SnapType::Quadrant,
                SnapType::Perpendicular,
                SnapType::Tangent,
                SnapType::Nearest,
                SnapType::Grid,
            ],
        }
    }
}

impl SnapConfig {
    /// 优先级序号，越小越优先；未列出的类型排在最后
    pub fn rank(&self, snap_type: SnapType) -> usize {
        // 节点与端点同级
        let key = if snap_type == SnapType::Node {
            SnapType::Endpoint
        } else {
            snap_type
        };
        self.priority
            .iter()
            .position(|t| *t == key)
            .unwrap_or(self.priority.len())
    }
}

/// 捕捉掩码（位域，用于快速启用/禁用捕捉类型）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapMask {
    bits: u16,
}

impl SnapMask {
    pub const ENDPOINT: u16 = 1 << 0;
    pub const MIDPOINT: u16 = 1 << 1;
    pub const CENTER: u16 = 1 << 2;
    pub const INTERSECTION: u16 = 1 << 3;
    pub const PERPENDICULAR: u16 = 1 << 4;
    pub const TANGENT: u16 = 1 << 5;
    pub const NEAREST: u16 = 1 << 6;
    pub const GRID: u16 = 1 << 7;
    pub const QUADRANT: u16 = 1 << 8;
    pub const NODE: u16 = 1 << 9;

    pub const NONE: SnapMask = SnapMask { bits: 0 };
    pub const ALL: SnapMask = SnapMask { bits: 0x03FF };

    pub fn new(bits: u16) -> Self {
        Self { bits }
    }

    pub fn from_types(types: &[SnapType]) -> Self {
        let mut mask = Self::NONE;
        for t in types {
            mask.set(*t, true);
        }
        mask
    }

    pub fn is_enabled(&self, snap_type: SnapType) -> bool {
        self.bits & snap_type.mask_bit() != 0
    }

    pub fn set(&mut self, snap_type: SnapType, enabled: bool) {
        let bit = snap_type.mask_bit();
        if enabled {
            self.bits |= bit;
        } else {
            self.bits &= !bit;
        }
    }

    pub fn toggle(&mut self, snap_type: SnapType) {
        let enabled = self.is_enabled(snap_type);
        self.set(snap_type, !enabled);
    }
}

impl Default for SnapMask {
    fn default() -> Self {
        // 默认启用常用的捕捉类型
        Self {
            bits: Self::ENDPOINT | Self::MIDPOINT | Self::CENTER | Self::INTERSECTION | Self::NODE,
        }
    }
}

/// 捕捉引擎
///
/// 负责计算和管理对象捕捉
#[derive(Debug, Clone)]
pub struct SnapEngine {
    config: SnapConfig,
    /// 缓存的候选捕捉点
    candidates: Vec<SnapPoint>,
}

impl SnapEngine {
    pub fn new(config: SnapConfig) -> Self {
        Self {
            config,
            candidates: Vec::with_capacity(64),
        }
    }

    /// 获取配置
    pub fn config(&self) -> &SnapConfig {
        &self.config
    }

    /// 解析光标点：返回吸附后的点或原始点
    ///
    /// # 参数
    /// - `mouse_world`: 鼠标的世界坐标
    /// - `entities`: 要搜索的实体列表（不可见或锁定的实体会被跳过）
    /// - `view_scale`: 每个世界单位对应的像素数
    /// - `reference_point`: 参考点（用于垂足、切点等计算）
    pub fn resolve(
        &mut self,
        mouse_world: Point2,
        entities: &[&Entity],
        view_scale: f64,
        reference_point: Option<Point2>,
    ) -> SnapResult {
        if !self.config.enabled {
            return SnapResult::Raw {
                point: mouse_world,
                candidate: None,
            };
        }
        match self.find_snap_point(mouse_world, entities, view_scale, reference_point) {
            Some(snap) => {
                let pull = self.world_tolerance(view_scale) * self.config.magnet_strength.clamp(0.0, 1.0);
                if self.config.magnet && snap.distance <= pull {
                    SnapResult::Snapped {
                        point: snap.point,
                        mode: snap.snap_type,
                        entity: snap.entity_id,
                    }
                } else {
                    SnapResult::Raw {
                        point: mouse_world,
                        candidate: Some(snap),
                    }
                }
            }
            None => SnapResult::Raw {
                point: mouse_world,
                candidate: None,
            },
        }
    }

    fn world_tolerance(&self, view_scale: f64) -> f64 {
        if view_scale > EPSILON {
            self.config.tolerance / view_scale
        } else {
            self.config.tolerance
        }
    }

    /// 寻找最佳捕捉点
    pub fn find_snap_point(
        &mut self,
        mouse_world: Point2,
        entities: &[&Entity],
        view_scale: f64,
        reference_point: Option<Point2>,
    ) -> Option<SnapPoint> {
        self.candidates.clear();

        // 世界坐标容差
        let world_tolerance = self.world_tolerance(view_scale);

        let active: Vec<&Entity> = entities
            .iter()
            .copied()
            .filter(|e| e.visible && !e.locked)
            .collect();

        // 1. 网格捕捉
        if self.config.enabled_types.is_enabled(SnapType::Grid) {
            if let Some(snap) = self.snap_to_grid(mouse_world, world_tolerance) {
                self.candidates.push(snap);
            }
        }

        // 2. 收集所有实体的捕捉点
        for entity in &active {
            self.collect_entity_snap_points(entity, mouse_world, world_tolerance, reference_point);
        }

        // 3. 交点捕捉（需要成对的实体）
        if self.config.enabled_types.is_enabled(SnapType::Intersection) {
            self.collect_intersection_points(&active, mouse_world, world_tolerance);
        }

        // 4. 找到最近的捕捉点，距离相同时按优先级
        let config = &self.config;
        self.candidates
            .iter()
            .filter(|p| p.distance <= world_tolerance)
            .min_by(|a, b| {
                if (a.distance - b.distance).abs() <= 1e-9 {
                    config.rank(a.snap_type).cmp(&config.rank(b.snap_type))
                } else {
                    a.distance.total_cmp(&b.distance)
                }
            })
            .cloned()
    }

    /// 本次查询收集到的全部候选点
    pub fn candidates(&self) -> &[SnapPoint] {
        &self.candidates
    }

    fn push(&mut self, point: Point2, snap_type: SnapType, entity_id: EntityId, mouse: Point2, tolerance: f64) {
        if !self.config.enabled_types.is_enabled(snap_type) {
            return;
        }
        let dist = (point - mouse).norm();
        if dist <= tolerance {
            self.candidates
                .push(SnapPoint::new(point, snap_type, Some(entity_id), dist));
        }
    }

    /// 收集单个实体的捕捉点
    fn collect_entity_snap_points(
        &mut self,
        entity: &Entity,
        mouse: Point2,
        tolerance: f64,
        reference_point: Option<Point2>,
    ) {
        let id = entity.id;
        match &entity.geometry {
            Geometry::Point(p) => self.push(p.position, SnapType::Node, id, mouse, tolerance),
            Geometry::Line(line) => {
                self.collect_line_snap_points(line, id, mouse, tolerance, reference_point);
            }
            Geometry::Ray(ray) => {
                self.push(ray.origin, SnapType::Endpoint, id, mouse, tolerance);
                if let Some(ref_point) = reference_point {
                    let t = (ref_point - ray.origin).dot(&ray.direction);
                    if t >= 0.0 {
                        self.push(ray.origin + ray.direction * t, SnapType::Perpendicular, id, mouse, tolerance);
                    }
                }
                self.push(ray.closest_point(&mouse), SnapType::Nearest, id, mouse, tolerance);
            }
            Geometry::XLine(xline) => {
                if let Some(ref_point) = reference_point {
                    self.push(xline.closest_point(&ref_point), SnapType::Perpendicular, id, mouse, tolerance);
                }
                self.push(xline.closest_point(&mouse), SnapType::Nearest, id, mouse, tolerance);
            }
            Geometry::Circle(circle) => {
                self.collect_circle_snap_points(circle, id, mouse, tolerance, reference_point);
            }
            Geometry::Arc(arc) => {
                self.collect_arc_snap_points(arc, id, mouse, tolerance, reference_point);
            }
            Geometry::Ellipse(e) => {
                self.push(e.center, SnapType::Center, id, mouse, tolerance);
                for p in e.axis_points() {
                    self.push(p, SnapType::Quadrant, id, mouse, tolerance);
                }
                if self.config.enabled_types.is_enabled(SnapType::Nearest) {
                    self.push(e.closest_point(&mouse), SnapType::Nearest, id, mouse, tolerance);
                }
            }
            Geometry::Polyline(polyline) => {
                // 顶点（端点）
                for vertex in &polyline.vertices {
                    self.push(vertex.point, SnapType::Endpoint, id, mouse, tolerance);
                }
                for seg in polyline.segments() {
                    match seg {
                        PolylineSegment::Line(line) => {
                            self.push(line.midpoint(), SnapType::Midpoint, id, mouse, tolerance);
                            if let Some(ref_point) = reference_point {
                                if let Some(perp) = perpendicular_to_line(&line, ref_point) {
                                    self.push(perp, SnapType::Perpendicular, id, mouse, tolerance);
                                }
                            }
                        }
                        PolylineSegment::Arc(arc) => {
                            self.push(arc.midpoint(), SnapType::Midpoint, id, mouse, tolerance);
                        }
                    }
                }
                if let Some(nearest) = polyline.closest_point(&mouse) {
                    self.push(nearest, SnapType::Nearest, id, mouse, tolerance);
                }
            }
            Geometry::Spline(spline) => {
                if let (Some(start), Some(end)) = (spline.start_point(), spline.end_point()) {
                    if !spline.closed {
                        self.push(start, SnapType::Endpoint, id, mouse, tolerance);
                        self.push(end, SnapType::Endpoint, id, mouse, tolerance);
                    }
                }
                if self.config.enabled_types.is_enabled(SnapType::Nearest) {
                    if let Some(nearest) = spline.closest_point(&mouse) {
                        self.push(nearest, SnapType::Nearest, id, mouse, tolerance);
                    }
                }
            }
            Geometry::Donut(donut) => {
                let outer = Circle::new(donut.center, donut.outer_radius);
                self.push(donut.center, SnapType::Center, id, mouse, tolerance);
                for p in outer.quadrant_points() {
                    self.push(p, SnapType::Quadrant, id, mouse, tolerance);
                }
            }
            // 文本只捕捉插入点
            Geometry::Text(text) => self.push(text.position, SnapType::Node, id, mouse, tolerance),
            Geometry::MText(text) => self.push(text.position, SnapType::Node, id, mouse, tolerance),
            Geometry::Insert(insert) => self.push(insert.position, SnapType::Node, id, mouse, tolerance),
            Geometry::Table(table) => self.push(table.position, SnapType::Node, id, mouse, tolerance),
            Geometry::Hatch(_) => {}
            // 标注捕捉定义点
            Geometry::Dimension(dim) => {
                let points: Vec<Point2> = match &dim.definition {
                    DimDefinition::Linear { start, end, .. } | DimDefinition::Aligned { start, end } => {
                        vec![*start, *end]
                    }
                    DimDefinition::Angular { first, second } => {
                        vec![first.start, first.end, second.start, second.end]
                    }
                    DimDefinition::Radial { center, .. } => vec![*center],
                };
                for p in points {
                    self.push(p, SnapType::Node, id, mouse, tolerance);
                }
            }
        }
    }

    /// 线段的捕捉点
    fn collect_line_snap_points(
        &mut self,
        line: &Line,
        entity_id: EntityId,
        mouse: Point2,
        tolerance: f64,
        reference_point: Option<Point2>,
    ) {
        // 端点
        self.push(line.start, SnapType::Endpoint, entity_id, mouse, tolerance);
        self.push(line.end, SnapType::Endpoint, entity_id, mouse, tolerance);

        // 中点
        self.push(line.midpoint(), SnapType::Midpoint, entity_id, mouse, tolerance);

        // 垂足
        if let Some(ref_point) = reference_point {
            if let Some(perp) = perpendicular_to_line(line, ref_point) {
                self.push(perp, SnapType::Perpendicular, entity_id, mouse, tolerance);
            }
        }

        // 最近点
        self.push(line.closest_point(&mouse), SnapType::Nearest, entity_id, mouse, tolerance);
    }

    /// 圆的捕捉点
    fn collect_circle_snap_points(
        &mut self,
        circle: &Circle,
        entity_id: EntityId,
        mouse: Point2,
        tolerance: f64,
        reference_point: Option<Point2>,
    ) {
        // 圆心
        self.push(circle.center, SnapType::Center, entity_id, mouse, tolerance);

        // 象限点
        for point in circle.quadrant_points() {
            self.push(point, SnapType::Quadrant, entity_id, mouse, tolerance);
        }

        if let Some(ref_point) = reference_point {
            // 切点
            for tangent in tangent_points_to_circle(circle, ref_point) {
                self.push(tangent, SnapType::Tangent, entity_id, mouse, tolerance);
            }
            // 垂足：参考点到圆周的径向投影
            if let Some(foot) = circle.closest_point(&ref_point) {
                self.push(foot, SnapType::Perpendicular, entity_id, mouse, tolerance);
            }
        }

        // 最近点（圆上）
        if let Some(nearest) = circle.closest_point(&mouse) {
            self.push(nearest, SnapType::Nearest, entity_id, mouse, tolerance);
        }
    }

    /// 圆弧的捕捉点
    fn collect_arc_snap_points(
        &mut self,
        arc: &Arc,
        entity_id: EntityId,
        mouse: Point2,
        tolerance: f64,
        reference_point: Option<Point2>,
    ) {
        // 端点
        self.push(arc.start_point(), SnapType::Endpoint, entity_id, mouse, tolerance);
        self.push(arc.end_point(), SnapType::Endpoint, entity_id, mouse, tolerance);

        // 圆心
        self.push(arc.center, SnapType::Center, entity_id, mouse, tolerance);

        // 中点（弧的中点）
        self.push(arc.midpoint(), SnapType::Midpoint, entity_id, mouse, tolerance);

        // 象限点，仅限扫掠范围内
        for angle in [0.0, FRAC_PI_2, PI, 3.0 * FRAC_PI_2] {
            if arc.contains_angle(angle) {
                let point = arc.to_circle().point_at_angle(angle);
                self.push(point, SnapType::Quadrant, entity_id, mouse, tolerance);
            }
        }

        if let Some(ref_point) = reference_point {
            let circle = arc.to_circle();
            for tangent in tangent_points_to_circle(&circle, ref_point) {
                if arc.contains_point(&tangent) {
                    self.push(tangent, SnapType::Tangent, entity_id, mouse, tolerance);
                }
            }
            if let Some(foot) = circle.closest_point(&ref_point) {
                if arc.contains_point(&foot) {
                    self.push(foot, SnapType::Perpendicular, entity_id, mouse, tolerance);
                }
            }
        }

        self.push(arc.closest_point(&mouse), SnapType::Nearest, entity_id, mouse, tolerance);
    }

    /// 收集交点
    fn collect_intersection_points(&mut self, entities: &[&Entity], mouse: Point2, tolerance: f64) {
        // 双重循环检查所有实体对
        for i in 0..entities.len() {
            // 包围盒远离光标的实体对可以跳过
            let bi = entities[i].bounding_box();
            for j in (i + 1)..entities.len() {
                let bj = entities[j].bounding_box();
                if !bi.is_empty() && !bj.is_empty() && !bi.intersects(&bj) {
                    let unbounded = |g: &Geometry| matches!(g, Geometry::Ray(_) | Geometry::XLine(_));
                    if !unbounded(&entities[i].geometry) && !unbounded(&entities[j].geometry) {
                        continue;
                    }
                }
                for hit in find_entity_intersections(&entities[i].geometry, &entities[j].geometry) {
                    self.push(hit.point, SnapType::Intersection, entities[i].id, mouse, tolerance);
                }
            }
        }
    }

    /// 网格捕捉
    fn snap_to_grid(&self, mouse: Point2, tolerance: f64) -> Option<SnapPoint> {
        let spacing = self.config.grid_spacing;
        if spacing <= EPSILON {
            return None;
        }

        let grid_x = (mouse.x / spacing).round() * spacing;
        let grid_y = (mouse.y / spacing).round() * spacing;
        let grid_point = Point2::new(grid_x, grid_y);

        let dist = (grid_point - mouse).norm();
        if dist <= tolerance {
            Some(SnapPoint::new(grid_point, SnapType::Grid, None, dist))
        } else {
            None
        }
    }
}

impl Default for SnapEngine {
    fn default() -> Self {
        Self::new(SnapConfig::default())
    }
}

// ========== 几何计算辅助方法 ==========

/// 计算从参考点到线段的垂足，垂足必须在线段上
fn perpendicular_to_line(line: &Line, ref_point: Point2) -> Option<Point2> {
    if line.is_degenerate() {
        return None;
    }
    let b = line.project_param(&ref_point);
    (0.0..=1.0).contains(&b).then(|| line.point_at(b))
}

/// 计算从点到圆的切点
fn tangent_points_to_circle(circle: &Circle, point: Point2) -> Vec<Point2> {
    let d = (point - circle.center).norm();

    // 点在圆内，没有切点
    if d <= circle.radius {
        return vec![];
    }

    // 切点相对连心线的夹角
    let angle = (circle.radius / d).acos();
    let base_angle = angle_of(&circle.center, &point);

    vec![
        circle.point_at_angle(base_angle + angle),
        circle.point_at_angle(base_angle - angle),
    ]
}
