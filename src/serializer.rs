//! This module persists a lexer model so that a runtime lexer can load it without compiling the
//! specification again.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use log::{debug, trace};

use crate::{errors::SerializationError, LexGenError, LexGenErrorKind, LexerModel, Result};

/// The default location of the persisted model.
pub const DEFAULT_OUTPUT: &str = "analizator/lexerStates.ser";

/// Write the model to a writer.
pub fn write_model<W: Write>(
    model: &LexerModel,
    writer: W,
) -> std::result::Result<(), serde_json::Error> {
    serde_json::to_writer(writer, model)
}

/// Read a model from a reader.
/// The start state of the loaded model is resolved against its loaded states.
pub fn read_model<R: Read>(reader: R) -> std::result::Result<LexerModel, serde_json::Error> {
    serde_json::from_reader(reader)
}

/// Persist the model at `path`, creating missing parent directories.
///
/// The model is written to a temporary file next to `path` first which is then renamed to
/// `path`. On failure the temporary file is removed and `path` is left untouched.
/// # Errors
/// `SerializationFailure` if any step of writing fails.
pub fn persist_model<P: AsRef<Path>>(model: &LexerModel, path: P) -> Result<()> {
    let now = Instant::now();
    let path = path.as_ref();
    let temporary = temporary_path(path);

    let result = write_temporary(model, path, &temporary)
        .and_then(|_| fs::rename(&temporary, path).map_err(SerializationError::from));
    if let Err(source) = result {
        // The temporary file may not exist at all, so a failed removal is of no interest
        let _ = fs::remove_file(&temporary);
        return Err(failure(path, source));
    }

    trace!(
        "Persisting the lexer model to {} took {} milliseconds.",
        path.display(),
        now.elapsed().as_millis()
    );
    Ok(())
}

/// Load a model persisted by [`persist_model`].
/// # Errors
/// `SerializationFailure` if the file cannot be read or does not hold a consistent model.
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<LexerModel> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| failure(path, e.into()))?;
    read_model(BufReader::new(file)).map_err(|e| failure(path, e.into()))
}

fn write_temporary(
    model: &LexerModel,
    path: &Path,
    temporary: &Path,
) -> std::result::Result<(), SerializationError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    debug!("Writing lexer model to {}", temporary.display());
    let mut writer = BufWriter::new(File::create(temporary)?);
    write_model(model, &mut writer)?;
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(())
}

fn temporary_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn failure(path: &Path, source: SerializationError) -> LexGenError {
    LexGenError::new(LexGenErrorKind::SerializationFailure {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compile_lexer_model, LexerSpecification, RuleDescription};

    fn model() -> LexerModel {
        compile_lexer_model(&LexerSpecification {
            regular_definitions: Vec::new(),
            state_names: vec!["S_pocetno".to_string(), "S_komentar".to_string()],
            token_names: vec!["IDN".to_string()],
            rules: vec![
                RuleDescription::new("S_komentar", "\\|#", "-")
                    .with_extra_lines(["UDJI_U_STANJE S_komentar", "UDJI_U_STANJE S_pocetno"]),
                RuleDescription::new("S_pocetno", "#\\|", "-")
                    .with_extra_lines(["UDJI_U_STANJE S_komentar"]),
                RuleDescription::new("S_pocetno", "(a|b)(a|b)*", "IDN")
                    .with_extra_lines(["VRATI_SE 1", "NOVI_REDAK"]),
            ],
        })
        .unwrap()
    }

    fn test_path(name: &str) -> PathBuf {
        std::env::temp_dir().join("lexgen_serializer_tests").join(name)
    }

    #[test]
    fn test_round_trip_keeps_start_state_identity() {
        let model = model();
        let path = test_path("round_trip.ser");
        persist_model(&model, &path).unwrap();
        assert!(!temporary_path(&path).exists());

        let loaded = load_model(&path).unwrap();
        assert_eq!(loaded, model);
        assert_eq!(loaded.start_state().name(), "S_pocetno");
        assert!(std::ptr::eq(
            loaded.start_state(),
            loaded.state("S_pocetno").unwrap()
        ));
        let (rule, length) = loaded.start_state().find_longest_match("abba c").unwrap();
        assert_eq!(rule.token_class(), Some("IDN"));
        assert_eq!(length, 4);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_states_are_written_before_start_state() {
        let mut buffer = Vec::new();
        write_model(&model(), &mut buffer).unwrap();
        let json = String::from_utf8(buffer).unwrap();
        let states = json.find("\"states\"").unwrap();
        let start_state = json.find("\"start_state\"").unwrap();
        assert!(states < start_state);
    }

    #[test]
    fn test_persist_overwrites_existing_artifact() {
        let path = test_path("overwrite.ser");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "stale").unwrap();
        persist_model(&model(), &path).unwrap();
        assert_eq!(load_model(&path).unwrap(), model());
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_persist_failure_leaves_no_artifact() {
        // A directory cannot be replaced by the renamed file
        let path = test_path("occupied");
        fs::create_dir_all(path.join("inner")).unwrap();
        let error = persist_model(&model(), &path).unwrap_err();
        assert!(matches!(
            error.kind(),
            LexGenErrorKind::SerializationFailure { .. }
        ));
        assert!(!temporary_path(&path).exists());
        assert!(path.is_dir());
    }

    #[test]
    fn test_load_corrupted_artifact() {
        let path = test_path("corrupted.ser");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"states":[],"start_state":"S"}"#).unwrap();
        let error = load_model(&path).unwrap_err();
        assert!(matches!(
            error.kind(),
            LexGenErrorKind::SerializationFailure { .. }
        ));
        assert!(error.to_string().contains("Unknown start state 'S'"));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_missing_artifact() {
        let error = load_model(test_path("missing.ser")).unwrap_err();
        assert!(matches!(
            error.kind(),
            LexGenErrorKind::SerializationFailure { .. }
        ));
    }
}
