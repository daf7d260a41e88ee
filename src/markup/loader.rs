use std::path::Path;

use tokio::fs;
use tracing::info;

use crate::error::ConfigError;
use crate::markup::selectors::SelectorSet;

/// 加载选择器集合
///
/// 未指定文件时使用默认选择器；文件中缺省的字段同样回落到默认值。
pub async fn load_selector_set(path: Option<&str>) -> Result<SelectorSet, ConfigError> {
    let Some(path) = path else {
        return Ok(SelectorSet::default());
    };

    let content = fs::read_to_string(Path::new(path))
        .await
        .map_err(|source| ConfigError::SelectorsReadFailed {
            path: path.to_string(),
            source,
        })?;

    let selectors = parse_selector_set(&content).map_err(|source| {
        ConfigError::SelectorsParseFailed {
            path: path.to_string(),
            source,
        }
    })?;

    info!("✓ 已加载自定义选择器: {}", path);
    Ok(selectors)
}

fn parse_selector_set(content: &str) -> Result<SelectorSet, toml::de::Error> {
    toml::from_str(content)
}
