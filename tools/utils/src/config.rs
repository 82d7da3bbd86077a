//! 扫描配置. 全部来自环境变量, 未设置时使用默认值.

use pocket_berry::consts::{DEFAULT_MIN_REGION, DEFAULT_OPENING};
use pocket_berry::segment::{Threshold, ThresholdLabeler};
use std::env;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// 切片目录.
pub const ENV_SLICE_DIR: &str = "POCKET_SLICE_DIR";
/// 输出目录.
pub const ENV_OUT_DIR: &str = "POCKET_OUT_DIR";
/// 二值化门限, `0..=255` 的整数或 `otsu`.
pub const ENV_THRESHOLD: &str = "POCKET_THRESHOLD";
/// 最小区域像素数.
pub const ENV_MIN_REGION: &str = "POCKET_MIN_REGION";
/// 开运算结构元素边长, 0 表示不做开运算.
pub const ENV_OPENING: &str = "POCKET_OPENING";
/// 是否反相.
pub const ENV_INVERT: &str = "POCKET_INVERT";
/// 缩放后的正方形边长.
pub const ENV_TARGET_SIZE: &str = "POCKET_TARGET_SIZE";
/// 最多读取的切片数.
pub const ENV_LIMIT: &str = "POCKET_LIMIT";
/// 每批并行分割的切片数.
pub const ENV_CHUNK: &str = "POCKET_CHUNK";

/// 配置错误.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量的值无法解析.
    #[error("invalid value `{value}` for ${name}")]
    Invalid {
        /// 环境变量名.
        name: &'static str,
        /// 原始值.
        value: String,
    },

    /// 未设置切片目录, 且无法确定用户主目录.
    #[error("$POCKET_SLICE_DIR is not set and the home directory is unknown")]
    NoSliceDir,
}

/// 一次完整扫描的配置.
#[derive(Clone, Debug)]
pub struct ScanConfig {
    /// 切片目录.
    pub slice_dir: PathBuf,

    /// CSV 输出目录.
    pub out_dir: PathBuf,

    /// 分割器.
    pub labeler: ThresholdLabeler,

    /// 缩放后的正方形边长.
    pub target_size: Option<u32>,

    /// 最多读取的切片数.
    pub limit: Option<usize>,

    /// 每批并行分割的切片数.
    pub chunk: NonZeroUsize,
}

impl ScanConfig {
    /// 从环境变量读取配置.
    pub fn from_env() -> Result<Self, ConfigError> {
        let threshold = parse_or(ENV_THRESHOLD, Threshold::default())?;
        let min_region = parse_or(ENV_MIN_REGION, DEFAULT_MIN_REGION)?;
        let opening = parse_or(ENV_OPENING, DEFAULT_OPENING)?;
        let invert = parse_flag(ENV_INVERT)?;
        let default_chunk = NonZeroUsize::new(crate::cpus() * 2).unwrap_or(NonZeroUsize::MIN);

        Ok(Self {
            slice_dir: slice_dir_from_env_or_home()?,
            out_dir: env::var(ENV_OUT_DIR).map_or_else(|_| PathBuf::from("."), PathBuf::from),
            labeler: ThresholdLabeler::default()
                .with_threshold(threshold)
                .with_min_region(min_region)
                .with_opening(opening)
                .inverted(invert),
            target_size: parse_opt(ENV_TARGET_SIZE)?,
            limit: parse_opt(ENV_LIMIT)?,
            chunk: parse_or(ENV_CHUNK, default_chunk)?,
        })
    }
}

/// 获取切片目录.
///
/// 1. 若环境变量 `$POCKET_SLICE_DIR` 非空, 则返回其值;
/// 2. 否则, 返回 `$HOME/dataset/slices`.
pub fn slice_dir_from_env_or_home() -> Result<PathBuf, ConfigError> {
    match env::var(ENV_SLICE_DIR) {
        Ok(d) if !d.is_empty() => Ok(PathBuf::from(d)),
        _ => pocket_berry::dataset::home_dataset_dir_with(["slices"]).ok_or(ConfigError::NoSliceDir),
    }
}

/// 解析单个值.
fn parse_value<T: FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value })
}

/// 读取可选的环境变量. 未设置或为空时返回 `None`.
fn parse_opt<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(v) if !v.trim().is_empty() => parse_value(name, v).map(Some),
        _ => Ok(None),
    }
}

/// 读取环境变量, 未设置时返回 `default`.
fn parse_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    Ok(parse_opt(name)?.unwrap_or(default))
}

/// 读取开关. 接受 `1/0`, `true/false`, `yes/no`, `on/off`.
fn parse_flag(name: &'static str) -> Result<bool, ConfigError> {
    let Some(v) = parse_opt::<String>(name)? else {
        return Ok(false);
    };
    match v.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid { name, value: v }),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_value, ConfigError};
    use pocket_berry::segment::Threshold;
    use std::num::NonZeroUsize;

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value::<u8>("X", " 42 ".to_string()).unwrap(), 42);
        assert!(matches!(
            parse_value::<u8>("X", "300".to_string()),
            Err(ConfigError::Invalid { name: "X", .. })
        ));
        assert!(parse_value::<NonZeroUsize>("X", "0".to_string()).is_err());
        assert_eq!(
            parse_value::<Threshold>("X", "Otsu".to_string()).unwrap(),
            Threshold::Otsu
        );
        assert_eq!(
            parse_value::<Threshold>("X", "90".to_string()).unwrap(),
            Threshold::Fixed(90)
        );
    }
}
