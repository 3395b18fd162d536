use std::fs;
use std::path::{Path, PathBuf};

use candy_engine::LevelError;
use thiserror::Error;

use super::gameplay::LevelFile;

#[derive(Debug, Error)]
pub(crate) enum LevelLoadError {
    #[error("failed to read level file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse level file {path} at '{json_path}': {source}")]
    Parse {
        path: PathBuf,
        json_path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("level file {path} is invalid: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: LevelError,
    },
    #[error("level file {path} has no win trigger prop")]
    MissingWinTrigger { path: PathBuf },
}

pub(crate) fn load_level_file(path: &Path) -> Result<LevelFile, LevelLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| LevelLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_level_file(path, &raw)
}

/// Decodes and validates a level document. `path` is only used in errors.
pub(crate) fn parse_level_file(path: &Path, raw: &str) -> Result<LevelFile, LevelLoadError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    let file: LevelFile =
        serde_path_to_error::deserialize(&mut deserializer).map_err(|error| {
            LevelLoadError::Parse {
                path: path.to_path_buf(),
                json_path: error.path().to_string(),
                source: error.into_inner(),
            }
        })?;

    file.level
        .validate()
        .map_err(|source| LevelLoadError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;

    if !file.level.has_win_trigger() {
        return Err(LevelLoadError::MissingWinTrigger {
            path: path.to_path_buf(),
        });
    }

    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::gameplay::HeistRules;

    fn shipped_level_path() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("assets")
            .join("levels")
            .join("mall.json")
    }

    fn shipped_level_json() -> String {
        fs::read_to_string(shipped_level_path()).expect("read mall.json")
    }

    #[test]
    fn shipped_mall_level_loads() {
        let file = load_level_file(&shipped_level_path()).expect("mall loads");

        assert_eq!(file.level.name, "mall");
        assert_eq!(file.level.mothers.len(), 5);
        assert_eq!(file.level.guards.len(), 2);
        assert_eq!(file.rules.candy_to_win, 5);
        assert_eq!(file.rules.decoy.cooldown_ticks, 450);
    }

    #[test]
    fn missing_file_reports_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nowhere.json");

        let err = load_level_file(&path).expect_err("missing file");
        assert!(matches!(err, LevelLoadError::Io { .. }));
    }

    #[test]
    fn bad_field_reports_json_path() {
        let raw = shipped_level_json().replacen("\"speed\"", "\"sped\"", 1);

        let err = parse_level_file(Path::new("mall.json"), &raw).expect_err("unknown field");
        match err {
            LevelLoadError::Parse { json_path, .. } => {
                assert!(json_path.starts_with("level.mothers[0]"), "{json_path}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn out_of_range_tier_is_a_parse_error() {
        let raw = shipped_level_json().replacen("\"tier\": 2", "\"tier\": 7", 1);

        let err = parse_level_file(Path::new("mall.json"), &raw).expect_err("bad tier");
        match err {
            LevelLoadError::Parse { json_path, .. } => {
                assert_eq!(json_path, "level.player.tier");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rules_section_is_optional() {
        let shipped: serde_json::Value =
            serde_json::from_str(&shipped_level_json()).expect("json");
        let raw = serde_json::json!({ "level": shipped["level"] }).to_string();

        let file = parse_level_file(Path::new("mall.json"), &raw).expect("defaults");
        assert_eq!(file.rules, HeistRules::default());
    }

    #[test]
    fn level_validation_errors_are_wrapped() {
        let raw = shipped_level_json().replace("\"Bush2\"", "\"Bush1\"");

        let err = parse_level_file(Path::new("mall.json"), &raw).expect_err("duplicate");
        assert!(matches!(
            err,
            LevelLoadError::Invalid {
                source: LevelError::DuplicateName { .. },
                ..
            }
        ));
    }

    #[test]
    fn level_without_exit_is_rejected() {
        let raw = shipped_level_json().replace("\"win_trigger\"", "\"decor\"");

        let err = parse_level_file(Path::new("mall.json"), &raw).expect_err("no exit");
        assert!(matches!(err, LevelLoadError::MissingWinTrigger { .. }));
    }
}
