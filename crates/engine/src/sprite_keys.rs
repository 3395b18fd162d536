use thiserror::Error;

/// Why a sheet key cannot be turned into a path under the sprite directory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpriteKeyError {
    #[error("sprite key must not be empty")]
    Empty,
    #[error("sprite key must be relative")]
    Absolute,
    #[error("sprite key must not contain '..'")]
    ParentTraversal,
    #[error("sprite key contains invalid character '{character}'")]
    InvalidCharacter { character: char },
}

/// Sheet keys are lowercase relative paths without an extension, e.g.
/// `mom1/down_moving`.
pub(crate) fn validate_sprite_key(key: &str) -> Result<(), SpriteKeyError> {
    if key.is_empty() {
        return Err(SpriteKeyError::Empty);
    }
    if key.starts_with('/') {
        return Err(SpriteKeyError::Absolute);
    }
    if key.split('/').any(|segment| segment == "..") {
        return Err(SpriteKeyError::ParentTraversal);
    }
    match key
        .chars()
        .find(|ch| !(ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, '_' | '-' | '/')))
    {
        Some(character) => Err(SpriteKeyError::InvalidCharacter { character }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_sheet_keys() {
        for key in ["player_down_still", "mom1/left_moving", "mall-floor"] {
            assert_eq!(validate_sprite_key(key), Ok(()), "key={key}");
        }
    }

    #[test]
    fn rejects_keys_escaping_sprite_dir() {
        assert_eq!(validate_sprite_key(""), Err(SpriteKeyError::Empty));
        assert_eq!(validate_sprite_key("/etc"), Err(SpriteKeyError::Absolute));
        assert_eq!(
            validate_sprite_key("mom/../../x"),
            Err(SpriteKeyError::ParentTraversal)
        );
        assert_eq!(
            validate_sprite_key(r"mom\down"),
            Err(SpriteKeyError::InvalidCharacter { character: '\\' })
        );
        assert_eq!(
            validate_sprite_key("Mom.png"),
            Err(SpriteKeyError::InvalidCharacter { character: 'M' })
        );
    }
}
