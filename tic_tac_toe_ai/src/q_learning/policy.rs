//! Flat JSON snapshot of a whole [`QTable`]: `{ state key: { action key: value } }`.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::error::{AgentError, AgentResult, PolicyLoadError};
use crate::q_learning::q_table::{Entries, QTable, QValue};

/// JSON has no encoding for infinities or NaN, they would come back as `null`.
fn check_finite(table: &QTable) -> AgentResult<()> {
    for (state, row) in table.entries() {
        if let Some((action, &value)) = row.iter().find(|(_, value)| !value.is_finite()) {
            return Err(AgentError::NonFiniteValue {
                state: state.to_string(),
                action: action.to_string(),
                value,
            });
        }
    }
    Ok(())
}

pub(crate) fn save(table: &QTable, path: &Path) -> AgentResult<()> {
    check_finite(table)?;

    let write_error = |source| AgentError::PolicyWrite {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(write_error)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, table.entries()).map_err(|err| {
        if err.is_io() {
            write_error(std::io::Error::from(err))
        } else {
            AgentError::from(err)
        }
    })?;
    writer.flush().map_err(write_error)?;
    debug!(
        path = %path.display(),
        states = table.state_count(),
        values = table.len(),
        "policy saved"
    );
    Ok(())
}

/// Reads a snapshot into a new table, the caller's table is left alone on failure.
pub(crate) fn load(path: &Path, default: QValue) -> Result<QTable, PolicyLoadError> {
    let file = File::open(path).map_err(|source| PolicyLoadError::Missing {
        path: path.to_path_buf(),
        source,
    })?;
    let entries: Entries =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| PolicyLoadError::Corrupt {
            path: path.to_path_buf(),
            source,
        })?;
    let table = QTable::from_entries(entries, default);
    debug!(
        path = %path.display(),
        states = table.state_count(),
        values = table.len(),
        "policy loaded"
    );
    Ok(table)
}

#[cfg(test)]
mod test {
    use super::*;

    use game_environment::game::{Board, Position};

    use crate::q_learning::{ActionKey, StateKey};

    #[test]
    fn test_snapshot_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.json");

        let mut table = QTable::default();
        let board = Board::from_rows(&[[1, 0, 0], [0, 0, 0], [0, 0, 0]]).unwrap();
        table.set(
            StateKey::from(&board),
            ActionKey::from(Position::new(1, 1)),
            0.5,
        );
        save(&table, &path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "[[1, 0, 0], [0, 0, 0], [0, 0, 0]]": { "(1, 1)": 0.5 } })
        );

        assert_eq!(load(&path, 0.0).unwrap(), table);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("missing.json");
        assert!(matches!(
            load(&missing, 0.0),
            Err(PolicyLoadError::Missing { .. })
        ));

        let corrupt = dir.path().join("corrupt.json");
        std::fs::write(&corrupt, b"{\"[[0, 0, 0]]\": [1, 2").unwrap();
        assert!(matches!(
            load(&corrupt, 0.0),
            Err(PolicyLoadError::Corrupt { .. })
        ));

        let wrong_shape = dir.path().join("wrong_shape.json");
        std::fs::write(&wrong_shape, b"{\"a\": {\"b\": \"c\"}}").unwrap();
        assert!(matches!(
            load(&wrong_shape, 0.0),
            Err(PolicyLoadError::Corrupt { .. })
        ));
    }

    #[test]
    fn test_non_finite_values_are_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.json");

        let mut table = QTable::default();
        table.set(
            StateKey::from(&Board::new()),
            ActionKey::from(Position::new(0, 0)),
            0.5,
        );
        table.set(
            StateKey::from(&Board::new()),
            ActionKey::from(Position::new(1, 1)),
            f32::INFINITY,
        );
        let err = save(&table, &path).unwrap_err();
        assert!(matches!(
            err,
            AgentError::NonFiniteValue { ref action, .. } if action == "(1, 1)"
        ));
        // nothing was written
        assert!(!path.exists());

        table.set(
            StateKey::from(&Board::new()),
            ActionKey::from(Position::new(1, 1)),
            f32::NAN,
        );
        assert!(matches!(
            save(&table, &path),
            Err(AgentError::NonFiniteValue { .. })
        ));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_write_failure_keeps_path() {
        let path = Path::new("/dev/full");
        if !path.exists() {
            return;
        }
        // large enough to overflow the writer's buffer while serializing
        let mut table = QTable::default();
        for n in 0..2_000u32 {
            let cells: Vec<i8> = (0..9)
                .scan(n, |rest, _| {
                    let cell = (*rest % 3) as i8 - 1;
                    *rest /= 3;
                    Some(cell)
                })
                .collect();
            let board = Board::from_cells(&cells).unwrap();
            table.set(StateKey::from(&board), ActionKey::from(Position::new(0, 0)), 0.25);
        }
        assert!(table.entries().len() > 1_000);

        let err = save(&table, path).unwrap_err();
        assert!(
            matches!(err, AgentError::PolicyWrite { ref path, .. } if path.as_path() == Path::new("/dev/full")),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn test_save_to_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("policy.json");
        assert!(matches!(
            save(&QTable::default(), &path),
            Err(AgentError::PolicyWrite { .. })
        ));
    }
}
