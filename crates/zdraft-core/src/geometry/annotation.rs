//! 注释类图元：单行文本、多行文本、填充、块参照、表格

use crate::math::{BoundingBox2, Point2, EPSILON};
use crate::properties::Color;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 文本对齐方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TextAlignment {
    #[default]
    Left,
    Center,
    Right,
}

/// 文本样式（由外部编辑器回传）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font: String,
    pub height: f64,
    pub rotation: f64,
    pub alignment: TextAlignment,
    pub bold: bool,
    pub italic: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font: "Standard".to_string(),
            height: 2.5,
            rotation: 0.0,
            alignment: TextAlignment::Left,
            bold: false,
            italic: false,
        }
    }
}

/// 估算文本宽度：CJK 字符约等于字高，其余约 0.6 倍字高
pub fn estimate_text_width(content: &str, height: f64) -> f64 {
    let char_count = content.chars().count();
    let cjk_count = content.chars().filter(|c| is_cjk(*c)).count();
    let ascii_count = char_count - cjk_count;
    (cjk_count as f64 * height) + (ascii_count as f64 * height * 0.6)
}

fn is_cjk(c: char) -> bool {
    matches!(c, '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}' | '\u{F900}'..='\u{FAFF}')
}

/// 以 `origin` 为锚点旋转一个本地矩形，返回旋转后的包围盒
fn rotated_rect(origin: Point2, x0: f64, y0: f64, w: f64, h: f64, rotation: f64) -> BoundingBox2 {
    if rotation.abs() < EPSILON {
        return BoundingBox2::new(
            Point2::new(origin.x + x0, origin.y + y0),
            Point2::new(origin.x + x0 + w, origin.y + y0 + h),
        );
    }
    let (sin_r, cos_r) = rotation.sin_cos();
    BoundingBox2::from_points(
        [(x0, y0), (x0 + w, y0), (x0 + w, y0 + h), (x0, y0 + h)].map(|(x, y)| {
            Point2::new(
                origin.x + x * cos_r - y * sin_r,
                origin.y + x * sin_r + y * cos_r,
            )
        }),
    )
}

/// 单行文本
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    /// 插入点
    pub position: Point2,
    pub content: String,
    pub height: f64,
    /// 旋转角度（弧度）
    pub rotation: f64,
    pub alignment: TextAlignment,
    pub style: String,
}

impl Text {
    pub fn new(position: Point2, content: impl Into<String>, height: f64) -> Self {
        Self {
            position,
            content: content.into(),
            height,
            rotation: 0.0,
            alignment: TextAlignment::Left,
            style: "Standard".to_string(),
        }
    }

    pub fn with_alignment(mut self, alignment: TextAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// 按外部编辑器回传的样式创建
    pub fn from_style(position: Point2, content: impl Into<String>, style: &TextStyle) -> Self {
        Self {
            position,
            content: content.into(),
            height: style.height,
            rotation: style.rotation,
            alignment: style.alignment,
            style: style.font.clone(),
        }
    }

    pub fn estimated_width(&self) -> f64 {
        estimate_text_width(&self.content, self.height)
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        let width = self.estimated_width();
        let x0 = match self.alignment {
            TextAlignment::Left => 0.0,
            TextAlignment::Center => -width / 2.0,
            TextAlignment::Right => -width,
        };
        rotated_rect(self.position, x0, 0.0, width, self.height, self.rotation)
    }

    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        self.bounding_box().distance_to_point(point)
    }
}

/// 多行文本（插入点为左上角）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MText {
    pub position: Point2,
    pub content: String,
    pub height: f64,
    pub rotation: f64,
    /// 参考宽度，0 表示不换行
    pub width: f64,
    pub line_spacing: f64,
    pub alignment: TextAlignment,
    pub style: String,
}

impl MText {
    pub fn new(position: Point2, content: impl Into<String>, height: f64) -> Self {
        Self {
            position,
            content: content.into(),
            height,
            rotation: 0.0,
            width: 0.0,
            line_spacing: 1.0,
            alignment: TextAlignment::Left,
            style: "Standard".to_string(),
        }
    }

    pub fn from_style(position: Point2, content: impl Into<String>, style: &TextStyle) -> Self {
        Self {
            rotation: style.rotation,
            alignment: style.alignment,
            style: style.font.clone(),
            ..Self::new(position, content, style.height)
        }
    }

    pub fn line_count(&self) -> usize {
        self.content.lines().count().max(1)
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        let widest = self
            .content
            .lines()
            .map(|l| estimate_text_width(l, self.height))
            .fold(0.0, f64::max);
        let w = widest.max(self.width);
        let h = self.line_count() as f64 * self.height * 1.667 * self.line_spacing;
        rotated_rect(self.position, 0.0, -h, w, h, self.rotation)
    }

    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        self.bounding_box().distance_to_point(point)
    }
}

/// 填充
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hatch {
    /// 外边界
    pub boundary: Vec<Point2>,
    /// 孤岛
    pub islands: Vec<Vec<Point2>>,
    pub pattern: String,
    pub scale: f64,
    pub angle: f64,
}

impl Hatch {
    pub fn new(boundary: Vec<Point2>, pattern: impl Into<String>) -> Self {
        Self {
            boundary,
            islands: Vec::new(),
            pattern: pattern.into(),
            scale: 1.0,
            angle: 0.0,
        }
    }

    pub fn loops(&self) -> impl Iterator<Item = &Vec<Point2>> {
        std::iter::once(&self.boundary).chain(self.islands.iter())
    }

    /// 奇偶规则判断点是否在填充区域内
    pub fn contains(&self, point: &Point2) -> bool {
        let mut inside = false;
        for ring in self.loops() {
            let n = ring.len();
            if n < 3 {
                continue;
            }
            let mut j = n - 1;
            for i in 0..n {
                let (pi, pj) = (ring[i], ring[j]);
                if (pi.y > point.y) != (pj.y > point.y)
                    && point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x
                {
                    inside = !inside;
                }
                j = i;
            }
        }
        inside
    }

    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        if self.contains(point) {
            return 0.0;
        }
        self.loops()
            .filter_map(|ring| super::curves::closest_on_chain(ring, true, point))
            .map(|p| (p - point).norm())
            .fold(super::curves::FAR_DISTANCE, f64::min)
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        BoundingBox2::from_points(self.boundary.iter().copied())
    }
}

/// 块参照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insert {
    pub block_name: String,
    pub position: Point2,
    pub scale_x: f64,
    pub scale_y: f64,
    pub rotation: f64,
    /// 属性标签 -> 值
    pub attributes: BTreeMap<String, String>,
}

impl Insert {
    pub fn new(block_name: impl Into<String>, position: Point2) -> Self {
        Self {
            block_name: block_name.into(),
            position,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
            attributes: BTreeMap::new(),
        }
    }

    /// 块定义由外部提供，这里以插入点作为拾取代理
    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        (point - self.position).norm()
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        BoundingBox2::new(self.position, self.position)
    }
}

/// 表格单元样式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellStyle {
    pub text_height: f64,
    pub alignment: TextAlignment,
    pub text_color: Option<Color>,
    pub background: Option<Color>,
}

impl Default for CellStyle {
    fn default() -> Self {
        Self {
            text_height: 2.5,
            alignment: TextAlignment::Center,
            text_color: None,
            background: None,
        }
    }
}

/// 表格单元
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TableCell {
    pub text: String,
    pub style: CellStyle,
}

/// 表格（插入点为左上角，行向下排列）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub position: Point2,
    pub row_heights: Vec<f64>,
    pub column_widths: Vec<f64>,
    /// 行优先存储
    pub cells: Vec<TableCell>,
}

impl Table {
    pub fn new(position: Point2, rows: usize, cols: usize, row_height: f64, col_width: f64) -> Self {
        Self {
            position,
            row_heights: vec![row_height; rows],
            column_widths: vec![col_width; cols],
            cells: vec![TableCell::default(); rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.row_heights.len()
    }

    pub fn cols(&self) -> usize {
        self.column_widths.len()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&TableCell> {
        (row < self.rows() && col < self.cols())
            .then(|| self.cells.get(row * self.cols() + col))
            .flatten()
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut TableCell> {
        let cols = self.cols();
        if row < self.rows() && col < cols {
            self.cells.get_mut(row * cols + col)
        } else {
            None
        }
    }

    pub fn width(&self) -> f64 {
        self.column_widths.iter().sum()
    }

    pub fn height(&self) -> f64 {
        self.row_heights.iter().sum()
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        BoundingBox2::new(
            Point2::new(self.position.x, self.position.y - self.height()),
            Point2::new(self.position.x + self.width(), self.position.y),
        )
    }

    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        self.bounding_box().distance_to_point(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_bbox_alignment() {
        let text = Text::new(Point2::new(0.0, 0.0), "ABCD", 10.0).with_alignment(TextAlignment::Center);
        let bbox = text.bounding_box();
        assert!((bbox.min.x + 12.0).abs() < EPSILON);
        assert!((bbox.max.x - 12.0).abs() < EPSILON);
        assert_eq!(text.distance_to_point(&Point2::new(0.0, 5.0)), 0.0);
    }

    #[test]
    fn test_hatch_island_is_outside() {
        let mut hatch = Hatch::new(
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(10.0, 0.0),
                Point2::new(10.0, 10.0),
                Point2::new(0.0, 10.0),
            ],
            "ANSI31",
        );
        hatch.islands.push(vec![
            Point2::new(4.0, 4.0),
            Point2::new(6.0, 4.0),
            Point2::new(6.0, 6.0),
            Point2::new(4.0, 6.0),
        ]);
        assert!(hatch.contains(&Point2::new(2.0, 2.0)));
        assert!(!hatch.contains(&Point2::new(5.0, 5.0)));
        assert!((hatch.distance_to_point(&Point2::new(5.0, 5.0)) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_table_cells() {
        let mut table = Table::new(Point2::new(0.0, 0.0), 2, 3, 8.0, 20.0);
        table.cell_mut(1, 2).unwrap().text = "x".to_string();
        assert_eq!(table.cell(1, 2).unwrap().text, "x");
        assert!(table.cell(2, 0).is_none());
        assert_eq!(table.bounding_box().min.y, -16.0);
    }
}
