//! ZDraft 命令行入口
//!
//! 读取命令脚本驱动命令引擎，把生成的实体以 JSON 输出。

mod script;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use zdraft_command::{ActionType, CommandEngine};
use zdraft_core::entity::Entity;
use zdraft_core::settings::DraftSettings;
use zdraft_core::units::DrawingUnit;

#[derive(Parser, Debug)]
#[command(name = "zdraft", version, about = "ZDraft 交互式绘图命令引擎")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 执行命令脚本并输出实体
    Run(RunArgs),
    /// 列出全部命令及快捷键
    Commands,
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// 脚本文件
    script: PathBuf,
    /// 设置文件（JSON），默认按环境变量和当前目录查找
    #[arg(long)]
    settings: Option<PathBuf>,
    /// 覆盖设置中的绘图单位（mm, cm, m, in, ft）
    #[arg(long)]
    units: Option<DrawingUnit>,
    /// 别名文件，每行 "alias<TAB>command"
    #[arg(long)]
    aliases: Option<PathBuf>,
    /// 输出文件，默认写到标准输出
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn load_settings(path: Option<&Path>) -> Result<DraftSettings> {
    match path {
        Some(path) => DraftSettings::load(path).with_context(|| format!("无法加载设置 {}", path.display())),
        None => DraftSettings::discover().context("无法加载设置"),
    }
}

/// 日志级别：设置文件 > RUST_LOG > warn
fn init_logging(level: Option<&str>) -> Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level).with_context(|| format!("无效的日志级别 {level:?}"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish(),
    )?;
    Ok(())
}

/// 执行脚本，返回结束后的引擎
fn execute(args: &RunArgs, mut settings: DraftSettings) -> Result<CommandEngine> {
    if let Some(units) = args.units {
        settings.units = units;
    }
    let source = std::fs::read_to_string(&args.script)
        .with_context(|| format!("无法读取脚本 {}", args.script.display()))?;
    let steps = script::parse_script(&source)?;

    let mut engine = CommandEngine::new(settings);
    if let Some(path) = &args.aliases {
        let loaded = engine
            .registry_mut()
            .load_aliases(path)
            .with_context(|| format!("无法加载别名 {}", path.display()))?;
        info!("加载了 {} 个别名", loaded);
    }

    script::run_script(&mut engine, &steps)?;
    Ok(engine)
}

fn write_output(engine: &CommandEngine, output: Option<&Path>) -> Result<()> {
    let entities: Vec<&Entity> = engine.document().entities().collect();
    let json = serde_json::to_string_pretty(&entities)?;
    match output {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("无法写入 {}", path.display()))?;
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn list_commands() {
    for action in ActionType::ALL {
        let shortcuts = action.shortcuts().join(", ");
        println!("{:<12} {}", action.name(), shortcuts);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Commands => list_commands(),
        Commands::Run(args) => {
            let settings = load_settings(args.settings.as_deref())?;
            init_logging(settings.log_level.as_deref())?;
            info!("执行脚本 {}", args.script.display());

            let mut engine = execute(&args, settings)?;
            for message in engine.take_messages() {
                eprintln!("{message}");
            }
            write_output(&engine, args.output.as_deref())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use zdraft_core::geometry::Geometry;

    fn run_args(dir: &Path, script: &str) -> RunArgs {
        let path = dir.join("draw.zds");
        std::fs::write(&path, script).unwrap();
        RunArgs {
            script: path,
            settings: None,
            units: None,
            aliases: None,
            output: Some(dir.join("out.json")),
        }
    }

    #[test]
    fn test_cli_parses_run() {
        let cli = Cli::try_parse_from(["zdraft", "run", "a.zds", "--units", "cm", "-o", "out.json"]).unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.units, Some(DrawingUnit::Centimeter));
        assert_eq!(args.output, Some(PathBuf::from("out.json")));
        assert!(Cli::try_parse_from(["zdraft", "run", "a.zds", "--units", "furlong"]).is_err());
    }

    #[test]
    fn test_execute_writes_entities() {
        let dir = tempfile::tempdir().unwrap();
        let args = run_args(dir.path(), "LINE\n0,0\n@10,0\n\nCIRCLE\n5,5\n2\n");
        let engine = execute(&args, DraftSettings::default()).unwrap();
        write_output(&engine, args.output.as_deref()).unwrap();

        let json = std::fs::read_to_string(dir.path().join("out.json")).unwrap();
        let entities: Vec<Entity> = serde_json::from_str(&json).unwrap();
        assert_eq!(entities.len(), 2);
        assert!(matches!(entities[0].geometry, Geometry::Line(_)));
        assert!(matches!(&entities[1].geometry, Geometry::Circle(c) if c.radius == 2.0));
    }

    #[test]
    fn test_units_and_aliases() {
        let dir = tempfile::tempdir().unwrap();
        let aliases = dir.path().join("aliases.txt");
        std::fs::write(&aliases, "# 别名\nyy\tcircle\n").unwrap();
        let mut args = run_args(dir.path(), "YY\n0,0\n3\n");
        args.units = Some(DrawingUnit::Centimeter);
        args.aliases = Some(aliases);

        let engine = execute(&args, DraftSettings::default()).unwrap();
        let entity = engine.document().last().unwrap();
        assert!(matches!(&entity.geometry, Geometry::Circle(c) if (c.radius - 30.0).abs() < 1e-9));
    }

    #[test]
    fn test_missing_script_is_error() {
        let args = RunArgs {
            script: PathBuf::from("/nonexistent/draw.zds"),
            settings: None,
            units: None,
            aliases: None,
            output: None,
        };
        let err = execute(&args, DraftSettings::default()).unwrap_err();
        assert!(format!("{err:#}").contains("无法读取脚本"));
    }
}
