use crate::mapping::FolderCase;
use crate::utils::quote;
use percent_encoding::percent_decode_str;
use std::borrow::Cow;
use std::fmt;

const MARK_READ: &str = "Mark read";
const MARK_FLAGGED: &str = "Mark flagged";
const MOVE_TO_FOLDER: &str = "Move to folder";
const STOP_EXECUTION: &str = "Stop execution";

const INBOX: &str = "INBOX";
const TRASH_FOLDERS: &[&str] = &["Trash", "Deleted Items", "Deleted Messages"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    Seen,
    Flagged,
}

impl Flag {
    fn as_str(self) -> &'static str {
        match self {
            Flag::Seen => r"\Seen",
            Flag::Flagged => r"\Flagged",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SetFlag(Flag),
    FileInto(String),
    Stop,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Action::SetFlag(flag) => write!(f, "setflag {};", quote(flag.as_str())),
            Action::FileInto(folder) => write!(f, "fileinto {};", quote(folder)),
            Action::Stop => f.write_str("stop;"),
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct TranslatedActions {
    pub actions: Vec<Action>,
    /// Why a requested move was not converted.
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
enum FolderTarget {
    Folder(String),
    Trash,
    OutsideInbox,
}

fn decode(segment: &str) -> Cow<'_, str> {
    percent_decode_str(segment)
        .decode_utf8()
        .unwrap_or_else(|_| segment.into())
}

/// The path of a folder URI, without scheme and authority.
fn uri_path(uri: &str) -> Option<&str> {
    match uri.find("://") {
        Some(pos) => {
            let rest = &uri[pos + 3..];
            rest.find('/').map(|slash| &rest[slash + 1..])
        }
        None => Some(uri),
    }
}

fn is_trash(path: &str) -> bool {
    path.split('/').any(|segment| {
        let segment = decode(segment);
        TRASH_FOLDERS
            .iter()
            .any(|trash| segment.eq_ignore_ascii_case(trash))
    })
}

/// The part of `path` below its `INBOX` segment, if any.
fn inbox_subpath(path: &str) -> Option<&str> {
    const PREFIX: &str = "inbox/";
    // ASCII lowercasing keeps byte offsets intact.
    let lower = path.to_ascii_lowercase();
    std::iter::once(0)
        .chain(lower.match_indices('/').map(|(pos, _)| pos + 1))
        .find(|&pos| lower[pos..].starts_with(PREFIX))
        .map(|pos| &path[pos + PREFIX.len()..])
        .filter(|subpath| !subpath.is_empty())
}

/// Turns a percent-encoded path below INBOX into a name using `.` as
/// hierarchy separator. Literal dots in folder names become `-`.
fn normalize_folder(path: &str, case: FolderCase) -> String {
    let folder = path
        .split('/')
        .map(|segment| decode(segment).replace('.', "-"))
        .collect::<Vec<_>>()
        .join(".");
    match case {
        FolderCase::Preserve => format!("{}.{}", INBOX, folder),
        FolderCase::Lower => format!("{}.{}", INBOX, folder.to_lowercase()),
    }
}

fn folder_target(uri: &str, case: FolderCase) -> FolderTarget {
    let path = match uri_path(uri) {
        Some(path) => path,
        None => return FolderTarget::OutsideInbox,
    };
    if is_trash(path) {
        return FolderTarget::Trash;
    }
    match inbox_subpath(path) {
        Some(subpath) => FolderTarget::Folder(normalize_folder(subpath, case)),
        None => FolderTarget::OutsideInbox,
    }
}

/// Maps Thunderbird actions to Sieve statements.
///
/// The output order is fixed: flags, then `fileinto`, then `stop`.
/// Unknown actions are ignored.
pub fn translate_actions(
    actions: &[String],
    action_value: Option<&str>,
    case: FolderCase,
) -> TranslatedActions {
    let has = |name: &str| actions.iter().any(|a| a == name);
    let mut result = TranslatedActions::default();
    let mut trash = None;
    if has(MARK_READ) {
        result.actions.push(Action::SetFlag(Flag::Seen));
    }
    if has(MARK_FLAGGED) {
        result.actions.push(Action::SetFlag(Flag::Flagged));
    }
    if has(MOVE_TO_FOLDER) {
        match action_value {
            Some(uri) => match folder_target(uri, case) {
                FolderTarget::Folder(folder) => result.actions.push(Action::FileInto(folder)),
                FolderTarget::Trash => trash = Some(uri),
                FolderTarget::OutsideInbox => {
                    result.hint = Some(format!("target folder '{}' is outside INBOX", uri));
                }
            },
            None => result.hint = Some("move without target folder".to_string()),
        }
    }
    if has(STOP_EXECUTION) {
        result.actions.push(Action::Stop);
    }
    if let Some(uri) = trash {
        result.hint = Some(if result.actions.is_empty() {
            format!("rule deactivated because target is Trash '{}'", uri)
        } else {
            format!("move to Trash '{}' dropped", uri)
        });
    }
    result
}
