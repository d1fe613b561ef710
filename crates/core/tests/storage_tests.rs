// ═══════════════════════════════════════════════════════════════════
// Storage Tests — expense file format, StorageManager, key-value
// preference backends
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;

use expense_tracker_core::errors::CoreError;
use expense_tracker_core::models::expense::{Expense, ExpenseCategory};
use expense_tracker_core::storage::format::{self, CURRENT_VERSION, HEADER_SIZE, MAGIC};
use expense_tracker_core::storage::kv::{
    JsonFileKeyValueStore, KeyValueStore, MemoryKeyValueStore, PrefValue,
};
use expense_tracker_core::storage::manager::StorageManager;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample_expenses() -> Vec<Expense> {
    vec![
        Expense::new(12.5, ExpenseCategory::Food, date(2025, 4, 2)),
        Expense::with_note(60.0, ExpenseCategory::Bills, date(2025, 4, 5), "electricity"),
    ]
}

// ── File format ─────────────────────────────────────────────────────

mod file_format {
    use super::*;

    #[test]
    fn header_layout() {
        let bytes = format::write_file(CURRENT_VERSION, b"payload");
        assert_eq!(&bytes[0..4], MAGIC);
        assert_eq!(u16::from_le_bytes([bytes[4], bytes[5]]), CURRENT_VERSION);
        assert_eq!(u64::from_le_bytes(bytes[6..14].try_into().unwrap()), 7);
        assert_eq!(bytes.len(), HEADER_SIZE + 7);
    }

    #[test]
    fn read_returns_payload() {
        let bytes = format::write_file(CURRENT_VERSION, b"abc");
        let (header, payload) = format::read_file(&bytes).unwrap();
        assert_eq!(header.version, CURRENT_VERSION);
        assert_eq!(header.payload_len, 3);
        assert_eq!(payload, b"abc");
    }

    #[test]
    fn too_small_rejected() {
        let result = format::read_file(b"EXPT");
        assert!(matches!(result, Err(CoreError::InvalidFileFormat(_))));
    }

    #[test]
    fn wrong_magic_rejected() {
        let mut bytes = format::write_file(CURRENT_VERSION, b"abc");
        bytes[0..4].copy_from_slice(b"XXXX");
        let result = format::read_file(&bytes);
        assert!(matches!(result, Err(CoreError::InvalidFileFormat(_))));
    }

    #[test]
    fn version_zero_rejected() {
        let bytes = format::write_file(0, b"abc");
        assert!(matches!(
            format::read_file(&bytes),
            Err(CoreError::UnsupportedVersion(0))
        ));
    }

    #[test]
    fn future_version_rejected() {
        let bytes = format::write_file(CURRENT_VERSION + 1, b"abc");
        assert!(matches!(
            format::read_file(&bytes),
            Err(CoreError::UnsupportedVersion(v)) if v == CURRENT_VERSION + 1
        ));
    }

    #[test]
    fn truncated_payload_rejected() {
        let mut bytes = format::write_file(CURRENT_VERSION, b"abcdef");
        bytes.truncate(bytes.len() - 2);
        let result = format::read_file(&bytes);
        assert!(matches!(result, Err(CoreError::InvalidFileFormat(ref m)) if m.contains("truncated")));
    }
}

// ── StorageManager ──────────────────────────────────────────────────

mod manager {
    use super::*;

    #[test]
    fn bytes_preserve_expenses() {
        let expenses = sample_expenses();
        let bytes = StorageManager::save_to_bytes(&expenses).unwrap();
        let loaded = StorageManager::load_from_bytes(&bytes).unwrap();
        assert_eq!(loaded, expenses);
    }

    #[test]
    fn empty_list_is_valid() {
        let bytes = StorageManager::save_to_bytes(&[]).unwrap();
        assert!(StorageManager::load_from_bytes(&bytes).unwrap().is_empty());
    }

    #[test]
    fn garbage_payload_rejected() {
        let bytes = format::write_file(CURRENT_VERSION, &[0xFF, 0xFF, 0xFF]);
        let result = StorageManager::load_from_bytes(&bytes);
        assert!(matches!(result, Err(CoreError::Deserialization(_))));
    }

    #[test]
    fn save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("expenses.bin");

        let expenses = sample_expenses();
        StorageManager::save_to_file(&expenses, &path).unwrap();
        assert!(path.exists());
        assert!(!dir.path().join("nested").join("expenses.bin.tmp").exists());

        let loaded = StorageManager::load_from_file(&path).unwrap();
        assert_eq!(loaded, expenses);
    }

    #[test]
    fn overwrite_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("expenses.bin");

        StorageManager::save_to_file(&sample_expenses(), &path).unwrap();
        let single = vec![Expense::new(1.0, ExpenseCategory::Other, date(2025, 1, 1))];
        StorageManager::save_to_file(&single, &path).unwrap();

        assert_eq!(StorageManager::load_from_file(&path).unwrap(), single);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = StorageManager::load_from_file(&dir.path().join("nope.bin"));
        assert!(matches!(result, Err(CoreError::FileIO(_))));
    }

    #[test]
    fn load_or_empty_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = StorageManager::load_or_empty(&dir.path().join("nope.bin")).unwrap();
        assert!(loaded.is_empty());
    }
}

// ── Key-value backends ──────────────────────────────────────────────

mod key_value {
    use super::*;

    #[tokio::test]
    async fn memory_starts_empty_and_merges_batches() {
        let store = MemoryKeyValueStore::new();
        assert!(store.load_all().await.unwrap().is_empty());

        store
            .write_batch(vec![("dark_mode".into(), PrefValue::Bool(true))])
            .await
            .unwrap();
        store
            .write_batch(vec![
                ("budget_limit".into(), PrefValue::Double(250.0)),
                ("currency".into(), PrefValue::Text("$".into())),
            ])
            .await
            .unwrap();

        let values = store.load_all().await.unwrap();
        assert_eq!(values.len(), 3);
        assert_eq!(values["dark_mode"], PrefValue::Bool(true));
        assert_eq!(values["budget_limit"], PrefValue::Double(250.0));
    }

    #[tokio::test]
    async fn json_file_missing_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileKeyValueStore::new(dir.path().join("settings.json"));
        assert!(store.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn json_file_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs").join("settings.json");

        {
            let store = JsonFileKeyValueStore::new(&path);
            store
                .write_batch(vec![
                    ("budget_limit".into(), PrefValue::Double(420.5)),
                    ("currency".into(), PrefValue::Text("CHF".into())),
                ])
                .await
                .unwrap();
            store
                .write_batch(vec![("currency".into(), PrefValue::Text("£".into()))])
                .await
                .unwrap();
        }

        let reopened = JsonFileKeyValueStore::new(&path);
        let values = reopened.load_all().await.unwrap();
        assert_eq!(values["budget_limit"].as_f64(), Some(420.5));
        assert_eq!(values["currency"].as_str(), Some("£"));
        assert_eq!(reopened.path(), path.as_path());
    }

    #[tokio::test]
    async fn json_file_ignores_unreadable_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"dark_mode": true, "budget_limit": null, "currency": ["$"]}"#,
        )
        .unwrap();

        let store = JsonFileKeyValueStore::new(&path);
        let values = store.load_all().await.unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values["dark_mode"], PrefValue::Bool(true));

        store
            .write_batch(vec![("budget_limit".into(), PrefValue::Double(75.0))])
            .await
            .unwrap();
        let values = store.load_all().await.unwrap();
        assert_eq!(values["budget_limit"].as_f64(), Some(75.0));
        assert!(!values.contains_key("currency"));
    }

    #[tokio::test]
    async fn json_file_corrupt_is_deserialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = JsonFileKeyValueStore::new(&path);
        assert!(matches!(
            store.load_all().await,
            Err(CoreError::Deserialization(_))
        ));
    }
}
