// Storage migrations
// Upgrades stored documents step by step to the current layout

use serde_json::{Map, Value};

use super::{StorageError, STORAGE_VERSION};

type Migration = fn(Value) -> Result<Value, StorageError>;

/// Migration producing each version from the one before it.
const MIGRATIONS: &[(u32, Migration)] = &[(2, single_slot_to_schedule)];

/// Bring `data` stored at `from_version` up to [`STORAGE_VERSION`].
pub fn migrate(mut data: Value, from_version: u32) -> Result<Value, StorageError> {
    if from_version == 0 || from_version > STORAGE_VERSION {
        return Err(StorageError::UnsupportedVersion(from_version));
    }

    for (target, migration) in MIGRATIONS {
        if *target > from_version {
            log::info!("Migrating stored data to version {}", target);
            data = migration(data)?;
        }
    }
    Ok(data)
}

/// Version 1 lessons carried one flat `dayOfWeek/startTime/duration`.
fn single_slot_to_schedule(mut data: Value) -> Result<Value, StorageError> {
    let Some(lessons) = data.get_mut("lessons").and_then(Value::as_array_mut) else {
        return Ok(data);
    };

    for lesson in lessons {
        let lesson = lesson
            .as_object_mut()
            .ok_or_else(|| StorageError::Malformed("lesson is not an object".to_string()))?;
        if lesson.contains_key("schedule") {
            continue;
        }

        let mut slot = Map::new();
        for key in ["dayOfWeek", "startTime", "duration"] {
            let value = lesson.remove(key).ok_or_else(|| {
                StorageError::Malformed(format!("version 1 lesson is missing \"{}\"", key))
            })?;
            slot.insert(key.to_string(), value);
        }
        lesson.insert("schedule".to_string(), Value::Array(vec![Value::Object(slot)]));
    }

    Ok(data)
}
