//! On-disk naming rules
//!
//! Every file lives flat in one data directory, so filenames carry all the
//! addressing: `{session}.json` for the current snapshot, `{session}.{k}.json`
//! for history backups, `profile_{name}_{session}.json` for loadouts. Session
//! ids are validated at construction; profile names pass the whitelist here.

use crate::error::{Error, Result};
use restash_core::SessionId;
use std::path::{Path, PathBuf};

/// Filename prefix of loadout profiles
pub const PROFILE_PREFIX: &str = "profile_";

/// Name of the one-shot restoration summary artifact
pub const SUMMARY_FILE: &str = "restoration_summary.json";

/// Longest accepted profile name, after sanitization
pub const MAX_PROFILE_NAME_LEN: usize = 20;

/// Path of a session's current snapshot
pub fn snapshot_path(dir: &Path, session: &SessionId) -> PathBuf {
    dir.join(format!("{}.json", session))
}

/// Path of a session's history backup at the given ring index
pub fn history_path(dir: &Path, session: &SessionId, index: usize) -> PathBuf {
    dir.join(format!("{}.{}.json", session, index))
}

/// Path of a named loadout, `name` already sanitized
pub fn profile_path(dir: &Path, name: &str, session: &SessionId) -> PathBuf {
    dir.join(format!("{}{}_{}.json", PROFILE_PREFIX, name, session))
}

/// Whitelist a raw profile name
///
/// Keeps ASCII alphanumerics, spaces and hyphens, trims the result and
/// truncates it to [`MAX_PROFILE_NAME_LEN`]. A name with nothing left is
/// rejected.
pub fn sanitize_profile_name(raw: &str) -> Result<String> {
    let filtered: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ' || *c == '-')
        .collect();
    let mut name = filtered.trim().to_string();
    name.truncate(MAX_PROFILE_NAME_LEN);
    if name.is_empty() {
        return Err(Error::InvalidProfileName(raw.to_string()));
    }
    Ok(name)
}

/// Session id of a current-snapshot file, if the path is one
///
/// History backups fail the whitelist through their extra dot suffix;
/// profile files and the summary artifact are excluded by name.
pub fn session_of(path: &Path) -> Option<SessionId> {
    let file_name = path.file_name()?.to_str()?;
    if file_name == SUMMARY_FILE || file_name.starts_with(PROFILE_PREFIX) {
        return None;
    }
    let stem = file_name.strip_suffix(".json")?;
    SessionId::parse(stem).ok()
}

/// Profile name of a loadout file belonging to the given session
pub fn profile_name_of(path: &Path, session: &SessionId) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    let stem = file_name.strip_suffix(".json")?;
    let rest = stem.strip_prefix(PROFILE_PREFIX)?;
    let name = rest
        .strip_suffix(session.as_str())?
        .strip_suffix('_')?;
    if name.is_empty() {
        return None;
    }
    Some(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> SessionId {
        SessionId::parse("5fe49444").unwrap()
    }

    #[test]
    fn test_path_layout() {
        let dir = Path::new("/data");
        assert_eq!(
            snapshot_path(dir, &session()),
            Path::new("/data/5fe49444.json")
        );
        assert_eq!(
            history_path(dir, &session(), 2),
            Path::new("/data/5fe49444.2.json")
        );
        assert_eq!(
            profile_path(dir, "PvP Kit", &session()),
            Path::new("/data/profile_PvP Kit_5fe49444.json")
        );
    }

    #[test]
    fn test_sanitize_strips_hostile_characters() {
        assert_eq!(sanitize_profile_name("../..\\evil?*").unwrap(), "evil");
        assert_eq!(sanitize_profile_name("My:Lo/adout!").unwrap(), "MyLoadout");
        assert_eq!(sanitize_profile_name("  padded  ").unwrap(), "padded");
    }

    #[test]
    fn test_sanitize_truncates() {
        let long = "abcdefghijklmnopqrstuvwxyz";
        assert_eq!(sanitize_profile_name(long).unwrap().len(), MAX_PROFILE_NAME_LEN);
    }

    #[test]
    fn test_sanitize_rejects_empty() {
        assert!(matches!(
            sanitize_profile_name(""),
            Err(Error::InvalidProfileName(_))
        ));
        assert!(matches!(
            sanitize_profile_name("@#$%"),
            Err(Error::InvalidProfileName(_))
        ));
    }

    #[test]
    fn test_session_of_recognizes_only_current_files() {
        assert_eq!(
            session_of(Path::new("/data/abc-123.json")),
            Some(SessionId::parse("abc-123").unwrap())
        );
        assert_eq!(session_of(Path::new("/data/abc-123.2.json")), None);
        assert_eq!(session_of(Path::new("/data/profile_Kit_abc.json")), None);
        assert_eq!(session_of(Path::new("/data/restoration_summary.json")), None);
        assert_eq!(session_of(Path::new("/data/abc.tmp.x81ka0")), None);
    }

    #[test]
    fn test_profile_name_of() {
        let path = profile_path(Path::new("/data"), "PvP Kit", &session());
        assert_eq!(
            profile_name_of(&path, &session()),
            Some("PvP Kit".to_string())
        );
        assert_eq!(
            profile_name_of(&path, &SessionId::parse("other").unwrap()),
            None
        );
        assert_eq!(
            profile_name_of(Path::new("/data/5fe49444.json"), &session()),
            None
        );
    }

    #[test]
    fn test_profile_name_survives_underscored_session() {
        let session = SessionId::parse("a_b").unwrap();
        let path = profile_path(Path::new("/data"), "Kit-2", &session);
        assert_eq!(profile_name_of(&path, &session), Some("Kit-2".to_string()));
    }
}
