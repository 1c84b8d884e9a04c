//! Line-oriented calibration scripts replayed against a `CalibrationSession`.
//!
//! ```text
//! # move the name block down a little
//! select last_name
//! select+ first_name
//! nudge down fine
//! drag farmer_id 65,45 70,45
//! save
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{info, warn};

use crate::editor::{CalibrationSession, Direction, OnSwitch, Surface};
use crate::error::{AppError, Result};
use crate::form_type::FormType;
use crate::layout::PageSize;
use crate::store::{KeyValueStore, LayoutStore};

/// Drag surface when a `drag` line names none: the portrait page in mm.
const DEFAULT_SURFACE: PageSize = PageSize::A4_PORTRAIT;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Select { key: String, additive: bool },
    Clear,
    Drag {
        key: String,
        from: (f64, f64),
        to: (f64, f64),
        surface: Surface,
    },
    Nudge { direction: Direction, fine: bool },
    AlignX,
    AlignY,
    Labels(bool),
    Switch { form_type: FormType, policy: OnSwitch },
    Reset,
    Save,
    Import(PathBuf),
    Export(PathBuf),
}

/// A command and the 1-based line it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptLine {
    pub line: usize,
    pub command: Command,
}

pub fn parse_script(text: &str) -> Result<Vec<ScriptLine>> {
    let mut lines = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let content = raw.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }
        let command = parse_command(content)
            .map_err(|e| AppError::ScriptError(format!("line {}: {}", line, e)))?;
        lines.push(ScriptLine { line, command });
    }
    Ok(lines)
}

fn parse_command(content: &str) -> std::result::Result<Command, String> {
    let words: Vec<&str> = content.split_whitespace().collect();
    let (verb, args) = words.split_first().ok_or("empty command")?;

    let command = match (*verb, args) {
        ("select", [key]) => Command::Select {
            key: key.to_string(),
            additive: false,
        },
        ("select+", [key]) => Command::Select {
            key: key.to_string(),
            additive: true,
        },
        ("clear", []) => Command::Clear,
        ("drag", [key, from, to, rest @ ..]) if rest.len() <= 1 => {
            let surface = match rest.first() {
                Some(size) => {
                    let (width, height) = parse_pair(size, 'x')?;
                    Surface::new(width, height)
                }
                None => Surface::new(DEFAULT_SURFACE.width, DEFAULT_SURFACE.height),
            };
            Command::Drag {
                key: key.to_string(),
                from: parse_pair(from, ',')?,
                to: parse_pair(to, ',')?,
                surface,
            }
        }
        ("nudge", [direction, rest @ ..]) if rest.len() <= 1 => {
            let fine = match rest.first() {
                None => false,
                Some(&"fine") => true,
                Some(other) => return Err(format!("expected 'fine', found '{}'", other)),
            };
            Command::Nudge {
                direction: Direction::from_str(direction).map_err(|e| e.to_string())?,
                fine,
            }
        }
        ("align-x", []) => Command::AlignX,
        ("align-y", []) => Command::AlignY,
        ("labels", [state]) => match *state {
            "on" => Command::Labels(true),
            "off" => Command::Labels(false),
            other => return Err(format!("expected on|off, found '{}'", other)),
        },
        ("switch", [form_type, rest @ ..]) if rest.len() <= 1 => {
            let policy = match rest.first() {
                None | Some(&"refuse") => OnSwitch::Refuse,
                Some(&"save") => OnSwitch::Save,
                Some(&"discard") => OnSwitch::Discard,
                Some(other) => return Err(format!("expected save|discard|refuse, found '{}'", other)),
            };
            Command::Switch {
                form_type: FormType::from_str(form_type).map_err(|e| e.to_string())?,
                policy,
            }
        }
        ("reset", []) => Command::Reset,
        ("save", []) => Command::Save,
        ("import", [path]) => Command::Import(PathBuf::from(path)),
        ("export", [path]) => Command::Export(PathBuf::from(path)),
        _ => return Err(format!("unrecognised command '{}'", content)),
    };
    Ok(command)
}

fn parse_pair(text: &str, separator: char) -> std::result::Result<(f64, f64), String> {
    let (a, b) = text
        .split_once(separator)
        .ok_or_else(|| format!("expected A{}B, found '{}'", separator, text))?;
    let a = a.trim().parse::<f64>().map_err(|_| format!("not a number: '{}'", a))?;
    let b = b.trim().parse::<f64>().map_err(|_| format!("not a number: '{}'", b))?;
    Ok((a, b))
}

/// Replays `script` in order, stopping at the first failing command.
/// Relative file paths resolve against `base_dir`.
pub fn run_script<S: KeyValueStore>(
    session: &mut CalibrationSession,
    store: &mut LayoutStore<S>,
    script: &[ScriptLine],
    base_dir: &Path,
) -> Result<()> {
    for step in script {
        apply(session, store, &step.command, base_dir).map_err(|e| {
            warn!(line = step.line, error = %e, "calibration script stopped");
            e
        })?;
    }
    info!(commands = script.len(), form_type = %session.form_type(), "calibration script finished");
    Ok(())
}

fn apply<S: KeyValueStore>(
    session: &mut CalibrationSession,
    store: &mut LayoutStore<S>,
    command: &Command,
    base_dir: &Path,
) -> Result<()> {
    match command {
        Command::Select { key, additive } => session.select_field(key, *additive),
        Command::Clear => session.clear_selection(),
        Command::Drag {
            key,
            from,
            to,
            surface,
        } => {
            if session.begin_drag(key, *from, *surface) {
                session.drag_to(*to);
                session.end_drag();
            } else {
                warn!(key = key.as_str(), "drag ignored, no such field");
            }
        }
        Command::Nudge { direction, fine } => session.nudge(*direction, *fine),
        Command::AlignX => session.align_selected_x(),
        Command::AlignY => session.align_selected_y(),
        Command::Labels(show) => session.set_show_labels(*show),
        Command::Switch { form_type, policy } => session.switch_form_type(store, *form_type, *policy)?,
        Command::Reset => session.reset_to_default(store)?,
        Command::Save => session.save(store)?,
        Command::Import(path) => {
            let path = base_dir.join(path);
            let json = std::fs::read_to_string(&path)
                .map_err(|e| AppError::ImportError(format!("{}: {}", path.display(), e)))?;
            session.import_layout(store, &json)?;
        }
        Command::Export(path) => {
            let path = base_dir.join(path);
            std::fs::write(&path, session.export_layout()?)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_commands_and_skips_comments() {
        let script = parse_script(
            "# header\n\nselect last_name\nselect+ first_name  # second\nnudge up fine\ndrag farmer_id 10,20 15.5,20 100x100\nswitch adss save\n",
        )
        .unwrap();
        let lines: Vec<usize> = script.iter().map(|s| s.line).collect();
        assert_eq!(lines, vec![3, 4, 5, 6, 7]);
        assert_eq!(
            script[1].command,
            Command::Select {
                key: "first_name".to_string(),
                additive: true
            }
        );
        assert_eq!(
            script[2].command,
            Command::Nudge {
                direction: Direction::Up,
                fine: true
            }
        );
        assert_eq!(
            script[3].command,
            Command::Drag {
                key: "farmer_id".to_string(),
                from: (10.0, 20.0),
                to: (15.5, 20.0),
                surface: Surface::new(100.0, 100.0),
            }
        );
        assert_eq!(
            script[4].command,
            Command::Switch {
                form_type: FormType::Adss,
                policy: OnSwitch::Save
            }
        );
    }

    #[test]
    fn errors_name_the_line() {
        let err = parse_script("select a\nwiggle b\n").unwrap_err();
        assert_eq!(err.to_string(), "Invalid calibration script: line 2: unrecognised command 'wiggle b'");

        assert!(parse_script("nudge sideways").is_err());
        assert!(parse_script("drag k 1;2 3,4").is_err());
        assert!(parse_script("switch tractor").is_err());
        assert!(parse_script("select").is_err());
    }

    #[test]
    fn replays_edits_and_saves() {
        let mut store = LayoutStore::new(MemoryStore::new());
        let mut session = CalibrationSession::open(&store, FormType::Crop);
        let script = parse_script(
            "drag farmer_id 0,0 21,29.7\nselect last_name\nselect+ first_name\nalign-y\nlabels on\nsave\n",
        )
        .unwrap();
        run_script(&mut session, &mut store, &script, Path::new(".")).unwrap();

        let saved = store.get_layout(FormType::Crop).unwrap().unwrap();
        let farmer = saved["farmer_id"];
        assert!((farmer.x - 41.01564644582508).abs() < 1e-9);
        assert!((farmer.y - 25.350183513110016).abs() < 1e-9);
        assert_eq!(saved["last_name"].y, saved["first_name"].y);
        assert!(session.show_labels());
        assert!(!session.is_dirty());
    }

    #[test]
    fn refused_switch_stops_the_script() {
        let mut store = LayoutStore::new(MemoryStore::new());
        let mut session = CalibrationSession::open(&store, FormType::Crop);
        let script = parse_script("select contact\nnudge left\nswitch banca\nsave\n").unwrap();
        let result = run_script(&mut session, &mut store, &script, Path::new("."));
        assert!(matches!(result, Err(AppError::UnsavedChanges(FormType::Crop))));
        assert_eq!(store.get_layout(FormType::Crop).unwrap(), None);
    }

    #[test]
    fn export_and_import_use_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = LayoutStore::new(MemoryStore::new());
        let mut session = CalibrationSession::open(&store, FormType::Banca);

        let script = parse_script("select bn_usage\nnudge right\nexport banca.json\nreset\nimport banca.json\n").unwrap();
        run_script(&mut session, &mut store, &script, dir.path()).unwrap();

        assert!(dir.path().join("banca.json").exists());
        let saved = store.get_layout(FormType::Banca).unwrap().unwrap();
        assert!((saved["bn_usage"].x - 27.405893487050484).abs() < 1e-9);
    }
}
