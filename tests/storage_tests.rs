use campus_portal::storage::{FileTokenStore, MemoryTokenStore, StorageError, TokenStore};
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

fn scratch_path() -> PathBuf {
    std::env::temp_dir()
        .join("campus-portal-tests")
        .join(format!("{}.json", Uuid::new_v4()))
}

mod memory_tests {
    use super::*;

    #[test]
    fn test_memory_round_trip() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.load_token(), None);

        store.save_token("tok-123").unwrap();
        assert_eq!(store.load_token().as_deref(), Some("tok-123"));

        store.clear_token().unwrap();
        assert_eq!(store.load_token(), None);
    }

    #[test]
    fn test_memory_prepopulated() {
        let store = MemoryTokenStore::with_token("tok-old");
        assert_eq!(store.load_token().as_deref(), Some("tok-old"));
    }

    #[test]
    fn test_memory_failure_mode() {
        let store = MemoryTokenStore::new_failing();

        assert!(matches!(store.save_token("tok-123"), Err(StorageError::Simulated)));
        assert!(matches!(store.clear_token(), Err(StorageError::Simulated)));
        // Reads still behave; only writes simulate the outage.
        assert_eq!(store.load_token(), None);
    }
}

mod file_tests {
    use super::*;

    #[test]
    fn test_missing_file_is_the_logged_out_state() {
        let store = FileTokenStore::new(scratch_path());
        assert_eq!(store.load_token(), None);
    }

    #[test]
    fn test_file_round_trip_creates_parent_directories() {
        let path = scratch_path();
        let store = FileTokenStore::new(&path);

        store.save_token("tok-77cd90").unwrap();
        assert!(path.exists());
        assert_eq!(store.load_token().as_deref(), Some("tok-77cd90"));

        store.clear_token().unwrap();
        assert_eq!(store.load_token(), None);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_clear_without_a_document_is_a_no_op() {
        let store = FileTokenStore::new(scratch_path());
        store.clear_token().unwrap();
        assert_eq!(store.load_token(), None);
    }

    #[test]
    fn test_corrupt_document_degrades_to_logged_out() {
        let path = scratch_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not-json{{{{").unwrap();

        let store = FileTokenStore::new(&path);
        // restore() relies on this never failing.
        assert_eq!(store.load_token(), None);

        // A fresh save repairs the document.
        store.save_token("tok-repaired").unwrap();
        assert_eq!(store.load_token().as_deref(), Some("tok-repaired"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_document_only_ever_holds_the_token_key() {
        let path = scratch_path();
        let store = FileTokenStore::new(&path);
        store.save_token("tok-1").unwrap();
        store.save_token("tok-2").unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let document: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let map = document.as_object().unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["token"], "tok-2");

        let _ = fs::remove_file(&path);
    }
}
