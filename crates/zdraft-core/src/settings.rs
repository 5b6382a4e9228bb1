//! 绘图设置
//!
//! 所有字段都带默认值，设置文件里缺少的部分按默认补齐。

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::dimension::DimensionSettings;
use crate::error::SettingsError;
use crate::snap::SnapConfig;
use crate::units::DrawingUnit;

/// 指定设置文件路径的环境变量
pub const SETTINGS_ENV: &str = "ZDRAFT_SETTINGS";

/// 当前目录下的默认设置文件名
pub const SETTINGS_FILE: &str = "zdraft.json";

/// 拾取容差（像素，按视图比例换算到世界坐标）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionSettings {
    /// 选择对象阶段使用的宽松容差
    pub select_tolerance: f64,
    /// 编辑拾取（修剪、延伸、双击编辑）使用的严格容差
    pub pick_tolerance: f64,
}

impl Default for SelectionSettings {
    fn default() -> Self {
        Self {
            select_tolerance: 10.0,
            pick_tolerance: 5.0,
        }
    }
}

/// 栅格
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    pub visible: bool,
    pub spacing: f64,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            visible: true,
            spacing: 10.0,
        }
    }
}

/// 全部设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DraftSettings {
    /// 输入单位
    pub units: DrawingUnit,
    pub snap: SnapConfig,
    pub dimension: DimensionSettings,
    pub selection: SelectionSettings,
    pub grid: GridSettings,
    /// 日志级别（未设置时由 RUST_LOG 决定）
    pub log_level: Option<String>,
}

impl DraftSettings {
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: DraftSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json_string(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 从文件加载
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: DraftSettings =
            serde_json::from_str(&content).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        tracing::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// 保存到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let content = self.to_json_string()?;
        std::fs::write(path, content).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Saved settings to {}", path.display());
        Ok(())
    }

    /// 查找设置文件：环境变量 > 当前目录 > 默认值
    pub fn discover() -> Result<Self, SettingsError> {
        match Self::discover_path() {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn discover_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(SETTINGS_ENV) {
            if !path.is_empty() {
                return Some(PathBuf::from(path));
            }
        }
        let local = PathBuf::from(SETTINGS_FILE);
        local.is_file().then_some(local)
    }

    /// 捕捉配置（栅格间距取自栅格设置）
    pub fn snap_config(&self) -> SnapConfig {
        let mut snap = self.snap.clone();
        snap.grid_spacing = self.grid.spacing;
        snap
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if !(self.snap.tolerance > 0.0) {
            return Err(SettingsError::Invalid(format!(
                "snap.tolerance must be positive, got {}",
                self.snap.tolerance
            )));
        }
        if !(self.snap.magnet_strength > 0.0 && self.snap.magnet_strength <= 1.0) {
            return Err(SettingsError::Invalid(format!(
                "snap.magnet_strength must be in (0, 1], got {}",
                self.snap.magnet_strength
            )));
        }
        if !(self.selection.select_tolerance > 0.0 && self.selection.pick_tolerance > 0.0) {
            return Err(SettingsError::Invalid("selection tolerances must be positive".to_string()));
        }
        if !(self.grid.spacing > 0.0) {
            return Err(SettingsError::Invalid(format!(
                "grid.spacing must be positive, got {}",
                self.grid.spacing
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snap::SnapType;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = DraftSettings::from_json_str(r#"{ "units": "inch", "snap": { "tolerance": 4.0 } }"#).unwrap();
        assert_eq!(settings.units, DrawingUnit::Inch);
        assert_eq!(settings.snap.tolerance, 4.0);
        assert!(settings.snap.magnet);
        assert_eq!(settings.selection, SelectionSettings::default());
        assert_eq!(settings.snap.priority[0], SnapType::Endpoint);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zdraft.json");

        let mut settings = DraftSettings::default();
        settings.units = DrawingUnit::Centimeter;
        settings.dimension.defaults.precision = Some(3);
        settings.grid.spacing = 5.0;
        settings.save(&path).unwrap();

        let loaded = DraftSettings::load(&path).unwrap();
        assert_eq!(loaded, settings);
        assert_eq!(loaded.snap_config().grid_spacing, 5.0);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(DraftSettings::load(&missing), Err(SettingsError::Io { .. })));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();
        assert!(matches!(DraftSettings::load(&broken), Err(SettingsError::Parse { .. })));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let result = DraftSettings::from_json_str(r#"{ "snap": { "magnet_strength": 2.0 } }"#);
        assert!(matches!(result, Err(SettingsError::Invalid(_))));
    }
}
