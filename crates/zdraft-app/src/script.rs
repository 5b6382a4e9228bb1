//! 命令脚本
//!
//! 每行一个输入，按命令行的方式交给引擎：
//!
//! ```text
//! # 注释
//! LINE
//! 0,0
//! @100,0
//!                      <- 空行等同回车
//! !pick 50,0           <- 不经捕捉的拾取
//! !click 10,10,5       <- 经过捕捉的点击，可带 Z
//! !dblclick 3,4        <- 双击编辑文本/表格
//! !polar 100 45        <- 长度+角度
//! !text 标注内容        <- 文本编辑器回传
//! !table 2 3 a|b|c|d   <- 表格编辑器回传
//! !esc                 <- 取消
//! ```

use anyhow::{anyhow, bail, Context, Result};
use tracing::{debug, info};
use zdraft_command::{CommandEngine, TablePayload, TextPayload};
use zdraft_core::math::{Point2, Point3};

/// 脚本中的一步
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptStep {
    /// 命令行键入（空字符串为回车）
    Input(String),
    Cancel,
    Pick(Point2),
    Click(Point3),
    DoubleClick(Point2),
    Polar { length: f64, angle: f64 },
    Text(String),
    Table { rows: usize, cols: usize, cells: Vec<String> },
}

/// 解析脚本，返回 (行号, 步骤)
pub fn parse_script(source: &str) -> Result<Vec<(usize, ScriptStep)>> {
    let mut steps = Vec::new();
    for (index, raw) in source.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        if line.starts_with('#') {
            continue;
        }
        let step = match line.strip_prefix('!') {
            Some(directive) => parse_directive(directive).with_context(|| format!("第 {line_no} 行: {line}"))?,
            None => ScriptStep::Input(line.to_string()),
        };
        steps.push((line_no, step));
    }
    Ok(steps)
}

fn parse_directive(directive: &str) -> Result<ScriptStep> {
    let (name, rest) = directive.split_once(char::is_whitespace).unwrap_or((directive, ""));
    let rest = rest.trim();
    match name.to_ascii_lowercase().as_str() {
        "esc" => Ok(ScriptStep::Cancel),
        "pick" => Ok(ScriptStep::Pick(parse_point2(rest)?)),
        "dblclick" => Ok(ScriptStep::DoubleClick(parse_point2(rest)?)),
        "click" => {
            let coords = parse_numbers(rest, ',')?;
            match coords.as_slice() {
                [x, y] => Ok(ScriptStep::Click(Point3::new(*x, *y, 0.0))),
                [x, y, z] => Ok(ScriptStep::Click(Point3::new(*x, *y, *z))),
                _ => bail!("点击需要 x,y 或 x,y,z"),
            }
        }
        "polar" => match parse_numbers(rest, ' ')?.as_slice() {
            [length, angle] => Ok(ScriptStep::Polar {
                length: *length,
                angle: *angle,
            }),
            _ => bail!("长度+角度需要两个数"),
        },
        "text" => Ok(ScriptStep::Text(rest.to_string())),
        "table" => {
            let mut parts = rest.splitn(3, char::is_whitespace);
            let rows = parts.next().unwrap_or_default().parse().context("表格行数")?;
            let cols = parts.next().unwrap_or_default().parse().context("表格列数")?;
            let cells = parts
                .next()
                .map(|c| c.split('|').map(|s| s.trim().to_string()).collect())
                .unwrap_or_default();
            Ok(ScriptStep::Table { rows, cols, cells })
        }
        other => Err(anyhow!("未知指令: !{other}")),
    }
}

fn parse_numbers(input: &str, separator: char) -> Result<Vec<f64>> {
    input
        .split(separator)
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.trim().parse::<f64>().with_context(|| format!("无效数值: {s:?}")))
        .collect()
}

fn parse_point2(input: &str) -> Result<Point2> {
    match parse_numbers(input, ',')?.as_slice() {
        [x, y] => Ok(Point2::new(*x, *y)),
        _ => bail!("需要 x,y"),
    }
}

/// 逐步执行脚本，编辑器回传失败时中止
pub fn run_script(engine: &mut CommandEngine, steps: &[(usize, ScriptStep)]) -> Result<()> {
    for (line_no, step) in steps {
        debug!("第 {} 行: {:?}", line_no, step);
        match step {
            ScriptStep::Input(text) => engine.handle_value_input(text),
            ScriptStep::Cancel => engine.cancel_command(),
            ScriptStep::Pick(p) => engine.pick(*p),
            ScriptStep::Click(p) => {
                engine.begin_frame();
                engine.handle_command_input_3d(*p);
            }
            ScriptStep::DoubleClick(p) => {
                if !engine.double_click(*p) {
                    info!("第 {} 行: 双击位置没有可编辑的文本", line_no);
                }
            }
            ScriptStep::Polar { length, angle } => engine.handle_length_angle(*length, *angle),
            ScriptStep::Text(content) => {
                engine
                    .submit_text(TextPayload::new(content.clone()))
                    .with_context(|| format!("第 {line_no} 行: 提交文本失败"))?;
            }
            ScriptStep::Table { rows, cols, cells } => {
                let payload = TablePayload::new(*rows, *cols).with_cells(cells.iter().cloned());
                engine
                    .submit_table(payload)
                    .with_context(|| format!("第 {line_no} 行: 提交表格失败"))?;
            }
        }
    }
    if let Some(active) = engine.active_command() {
        info!("脚本结束时命令 {} 仍在进行", active.name());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use zdraft_core::geometry::Geometry;

    #[test]
    fn test_parse_directives() {
        let steps = parse_script("# 注释\nLINE\n\n!pick 1,2\n!click 1,2,3\n!polar 10 90\n!table 1 2 a | b\n!ESC\n").unwrap();
        let steps: Vec<ScriptStep> = steps.into_iter().map(|(_, s)| s).collect();
        assert_eq!(
            steps,
            vec![
                ScriptStep::Input("LINE".into()),
                ScriptStep::Input(String::new()),
                ScriptStep::Pick(Point2::new(1.0, 2.0)),
                ScriptStep::Click(Point3::new(1.0, 2.0, 3.0)),
                ScriptStep::Polar {
                    length: 10.0,
                    angle: 90.0
                },
                ScriptStep::Table {
                    rows: 1,
                    cols: 2,
                    cells: vec!["a".into(), "b".into()]
                },
                ScriptStep::Cancel,
            ]
        );
    }

    #[test]
    fn test_bad_directive_reports_line() {
        let err = parse_script("LINE\n!pick 1\n").unwrap_err();
        assert!(format!("{err:#}").contains("第 2 行"));
        assert!(parse_script("!jump 1,1").is_err());
    }

    #[test]
    fn test_run_text_script() {
        let mut engine = CommandEngine::default();
        let steps = parse_script("TEXT\n5,5\n!text 你好\n").unwrap();
        run_script(&mut engine, &steps).unwrap();
        let entity = engine.document().last().unwrap();
        assert!(matches!(&entity.geometry, Geometry::Text(t) if t.content == "你好"));
    }

    #[test]
    fn test_text_without_editor_fails() {
        let mut engine = CommandEngine::default();
        let steps = parse_script("!text 孤立\n").unwrap();
        let err = run_script(&mut engine, &steps).unwrap_err();
        assert!(format!("{err:#}").contains("第 1 行"));
    }
}
