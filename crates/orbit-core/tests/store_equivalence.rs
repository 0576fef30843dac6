//! The file-backed store must behave like the in-memory store, including
//! after a reopen.

use std::collections::BTreeMap;

use orbit_core::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore};
use proptest::prelude::*;

fn key() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("chatbotWidth".to_owned()),
        Just("chatbotVisible".to_owned()),
        "[a-z]{1,4}",
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn file_and_memory_stores_agree(writes in prop::collection::vec((key(), ".{0,8}"), 0..20)) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("prefs.json");
        let mut file = FilePreferenceStore::open(&path);
        let mut memory = MemoryPreferenceStore::new();
        let mut expected = BTreeMap::new();

        for (key, value) in &writes {
            file.set(key, value);
            memory.set(key, value);
            expected.insert(key.clone(), value.clone());
        }

        let reopened = FilePreferenceStore::open(&path);
        for (key, value) in &expected {
            let memory_value = memory.get(key);
            prop_assert_eq!(memory_value.as_ref(), Some(value));
            let file_value = file.get(key);
            prop_assert_eq!(file_value.as_ref(), Some(value));
            let reopened_value = reopened.get(key);
            prop_assert_eq!(reopened_value.as_ref(), Some(value));
        }
        prop_assert_eq!(memory.write_count(), writes.len() as u64);
    }
}
