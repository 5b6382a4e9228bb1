//! 命令注册表
//!
//! 完整命令、快捷键和用户别名到 [`ActionType`] 的映射，大小写不敏感，
//! 支持 Tab 补全。

use crate::action::ActionType;
use std::collections::HashMap;
use std::path::Path;

/// 命令注册表
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    /// 完整命令 -> ActionType
    main_commands: HashMap<String, ActionType>,
    /// 快捷键/短命令 -> ActionType
    short_commands: HashMap<String, ActionType>,
    /// 用户别名 -> 完整命令
    aliases: HashMap<String, String>,
    /// ActionType -> 完整命令（反向查找）
    action_to_command: HashMap<ActionType, String>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            main_commands: HashMap::new(),
            short_commands: HashMap::new(),
            aliases: HashMap::new(),
            action_to_command: HashMap::new(),
        };

        for action in ActionType::ALL {
            registry.register(action, action.name(), action.shortcuts());
        }

        registry
    }

    /// 注册命令
    ///
    /// # 参数
    /// - `action`: ActionType
    /// - `full_cmd`: 完整命令名（如 "LINE"）
    /// - `shortcuts`: 快捷键/短命令列表（如 ["L"]）
    pub fn register(&mut self, action: ActionType, full_cmd: &str, shortcuts: &[&str]) {
        let full_cmd_upper = full_cmd.to_uppercase();

        self.main_commands.insert(full_cmd_upper.clone(), action);
        self.action_to_command.insert(action, full_cmd_upper);

        for shortcut in shortcuts {
            self.short_commands.insert(shortcut.to_uppercase(), action);
        }
    }

    /// 查找命令对应的 ActionType
    pub fn lookup(&self, input: &str) -> Option<ActionType> {
        let input_upper = input.trim().to_uppercase();

        // 完整命令优先，其次快捷键，最后用户别名
        if let Some(&action) = self.main_commands.get(&input_upper) {
            return Some(action);
        }
        if let Some(&action) = self.short_commands.get(&input_upper) {
            return Some(action);
        }
        self.aliases
            .get(&input_upper)
            .and_then(|cmd| self.main_commands.get(cmd).copied())
    }

    /// Tab 补全：所有以 prefix 开头的完整命令
    pub fn complete(&self, prefix: &str) -> Vec<String> {
        let prefix_upper = prefix.trim().to_uppercase();
        let mut results: Vec<String> = self
            .main_commands
            .keys()
            .filter(|cmd| cmd.starts_with(&prefix_upper))
            .cloned()
            .collect();

        results.sort();
        results
    }

    pub fn get_command_name(&self, action: ActionType) -> Option<&str> {
        self.action_to_command.get(&action).map(|s| s.as_str())
    }

    /// 添加用户别名
    ///
    /// 不能覆盖已有的完整命令或快捷键，目标命令必须存在。
    pub fn add_alias(&mut self, alias: &str, command: &str) -> bool {
        let alias_upper = alias.to_uppercase();
        let command_upper = command.to_uppercase();

        if self.main_commands.contains_key(&alias_upper) || self.short_commands.contains_key(&alias_upper) {
            return false;
        }
        if !self.main_commands.contains_key(&command_upper) {
            return false;
        }
        self.aliases.insert(alias_upper, command_upper);
        true
    }

    pub fn remove_alias(&mut self, alias: &str) {
        self.aliases.remove(&alias.to_uppercase());
    }

    /// 从文件加载别名
    ///
    /// 文件格式：每行 "alias\tcommand"，以 # 开头的行是注释。返回加载的条数。
    pub fn load_aliases(&mut self, path: &Path) -> Result<usize, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        let mut loaded = 0;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut parts = line.split_whitespace();
            if let (Some(alias), Some(command)) = (parts.next(), parts.next()) {
                if self.add_alias(alias, command) {
                    loaded += 1;
                } else {
                    tracing::warn!("忽略无效别名: {} -> {}", alias, command);
                }
            }
        }

        tracing::debug!("从 {} 加载了 {} 个别名", path.display(), loaded);
        Ok(loaded)
    }

    /// 保存别名到文件（按别名排序）
    pub fn save_aliases(&self, path: &Path) -> Result<(), std::io::Error> {
        let mut content = String::new();
        content.push_str("# ZDraft Command Aliases\n");
        content.push_str("# Format: alias\\tcommand\n\n");

        let mut entries: Vec<_> = self.aliases.iter().collect();
        entries.sort();
        for (alias, command) in entries {
            content.push_str(&format!("{}\t{}\n", alias.to_lowercase(), command.to_lowercase()));
        }

        std::fs::write(path, content)
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let registry = CommandRegistry::new();

        assert_eq!(registry.lookup("LINE"), Some(ActionType::DrawLine));
        assert_eq!(registry.lookup("line"), Some(ActionType::DrawLine));
        assert_eq!(registry.lookup(" l "), Some(ActionType::DrawLine));
        assert_eq!(registry.lookup("pline"), Some(ActionType::DrawPolyline));
        assert_eq!(registry.lookup("Rect"), Some(ActionType::DrawRectangle));
        assert_eq!(registry.lookup("ray"), Some(ActionType::DrawRay));
        assert_eq!(registry.lookup("dt"), Some(ActionType::Text));
        assert_eq!(registry.lookup("dco"), Some(ActionType::DimContinue));

        assert_eq!(registry.lookup("NOTEXIST"), None);
        assert_eq!(registry.lookup(""), None);
    }

    #[test]
    fn test_only_ray_lacks_shortcuts() {
        let bare: Vec<ActionType> = ActionType::ALL
            .iter()
            .copied()
            .filter(|a| a.shortcuts().is_empty())
            .collect();
        assert_eq!(bare, vec![ActionType::DrawRay]);
    }

    #[test]
    fn test_every_action_is_registered() {
        let registry = CommandRegistry::new();
        for action in ActionType::ALL {
            assert_eq!(registry.lookup(action.name()), Some(action));
            assert_eq!(registry.get_command_name(action), Some(action.name()));
            for shortcut in action.shortcuts() {
                assert_eq!(registry.lookup(shortcut), Some(action), "shortcut {shortcut}");
            }
        }
    }

    #[test]
    fn test_complete() {
        let registry = CommandRegistry::new();

        let completions = registry.complete("dim");
        assert_eq!(completions.len(), 7);
        assert_eq!(completions[0], "DIMALIGNED");
        assert!(completions.contains(&"DIMRADIUS".to_string()));
        assert!(completions.contains(&"DIMDIAMETER".to_string()));
    }

    #[test]
    fn test_alias() {
        let mut registry = CommandRegistry::new();

        assert!(registry.add_alias("LL", "LINE"));
        assert_eq!(registry.lookup("ll"), Some(ActionType::DrawLine));

        // 不能覆盖已有命令，目标必须存在
        assert!(!registry.add_alias("C", "LINE"));
        assert!(!registry.add_alias("ZZ", "NOPE"));

        registry.remove_alias("LL");
        assert_eq!(registry.lookup("LL"), None);
    }

    #[test]
    fn test_alias_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aliases.txt");

        let mut registry = CommandRegistry::new();
        registry.add_alias("ci", "circle");
        registry.add_alias("zz", "zoom");
        registry.save_aliases(&path).unwrap();

        let mut loaded = CommandRegistry::new();
        assert_eq!(loaded.load_aliases(&path).unwrap(), 1);
        assert_eq!(loaded.lookup("CI"), Some(ActionType::DrawCircle));
    }
}
