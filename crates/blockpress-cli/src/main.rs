use anyhow::{Context, Result};
use blockpress_config::{Config, EditorSection};
use blockpress_engine::{Cmd, Editor, EditorSettings, IoError, io};
use std::{
    env, fs,
    path::{Path, PathBuf},
    process,
};

fn settings_from(section: &EditorSection) -> Result<EditorSettings> {
    EditorSettings::new(
        section.spacing_step_px,
        section.spacing_max_steps,
        section.default_heading_level,
    )
    .context("invalid [editor] settings in config file")
}

/// Open `path`, or start an empty document if it does not exist yet
fn open_document(path: &Path, settings: EditorSettings) -> Result<Editor> {
    let loaded = match io::read_document(path) {
        Ok(loaded) => loaded,
        Err(IoError::NotFound(_)) => {
            log::info!("{} not found, starting a new document", path.display());
            return Ok(Editor::new(settings));
        }
        Err(e) => return Err(e).with_context(|| format!("failed to read {}", path.display())),
    };

    if !loaded.issues.is_empty() {
        log::warn!(
            "{} block(s) in {} could not be loaded",
            loaded.issues.len(),
            path.display()
        );
    }
    Ok(Editor::with_blocks(loaded.blocks, settings)?)
}

fn load_commands(path: &Path) -> Result<Vec<Cmd>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read commands from {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("invalid command script {}", path.display()))
}

/// Apply `commands` in order, stopping at the first failure
fn replay(editor: &mut Editor, commands: Vec<Cmd>) -> Result<usize> {
    let count = commands.len();
    for (step, cmd) in commands.into_iter().enumerate() {
        log::debug!("step {step}: {cmd:?}");
        editor
            .apply(cmd)
            .with_context(|| format!("command {step} failed"))?;
    }
    Ok(count)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <document.json> [commands.json]", args[0]);
        process::exit(1);
    }

    let config = match Config::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };
    let settings = settings_from(&config.editor)?;
    let document_path: PathBuf = config.document_path(Path::new(&args[1]));

    let mut editor = open_document(&document_path, settings)?;

    if let Some(commands_path) = args.get(2) {
        let commands = load_commands(Path::new(commands_path))?;
        let applied = replay(&mut editor, commands)?;
        io::write_document(&document_path, editor.blocks())
            .with_context(|| format!("failed to save {}", document_path.display()))?;
        log::info!(
            "applied {applied} command(s); {} now at version {}",
            document_path.display(),
            editor.version()
        );
    }

    println!("{}", editor.save()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_document_starts_empty() {
        let temp_dir = TempDir::new().unwrap();
        let editor = open_document(
            &temp_dir.path().join("new.json"),
            EditorSettings::default(),
        )
        .unwrap();

        assert!(editor.blocks().is_empty());
    }

    #[test]
    fn test_replay_and_save() {
        let temp_dir = TempDir::new().unwrap();
        let document = temp_dir.path().join("post.json");
        let script = temp_dir.path().join("edits.json");
        fs::write(
            &script,
            r#"[
                {"cmd": "addBlock", "type": "heading", "defaults": {"content": "Hello"}},
                {"cmd": "addBlock", "type": "paragraph", "defaults": {"content": "World"}},
                {"cmd": "moveBlock", "from": 1, "to": 0}
            ]"#,
        )
        .unwrap();

        let mut editor = open_document(&document, EditorSettings::default()).unwrap();
        let applied = replay(&mut editor, load_commands(&script).unwrap()).unwrap();
        io::write_document(&document, editor.blocks()).unwrap();

        assert_eq!(applied, 3);
        let reopened = open_document(&document, EditorSettings::default()).unwrap();
        let contents: Vec<_> = reopened.blocks().iter().map(|b| b.content()).collect();
        assert_eq!(contents, vec![Some("World"), Some("Hello")]);
    }

    #[test]
    fn test_failed_command_is_reported() {
        let mut editor = Editor::default();
        let commands: Vec<Cmd> =
            serde_json::from_str(r#"[{"cmd": "moveBlock", "from": 0, "to": 1}]"#).unwrap();

        let err = replay(&mut editor, commands).unwrap_err();
        assert!(err.to_string().contains("command 0"));
    }

    #[test]
    fn test_settings_reject_bad_heading_level() {
        let section = EditorSection {
            default_heading_level: 7,
            ..EditorSection::default()
        };
        assert!(settings_from(&section).is_err());
    }
}
