use promptdeckapp::api::PromptDeckApi;
use promptdeckapp::model::{Template, TemplateDraft, TemplatePatch};
use promptdeckapp::presets::preset_drafts;
use promptdeckapp::store::backend::StorageBackend;
use promptdeckapp::store::fs::FileStore;
use promptdeckapp::store::fs_backend::FsBackend;
use promptdeckapp::store::{DataStore, COLLECTION_KEY, LEGACY_KEY};
use std::fs;
use tempfile::TempDir;

fn draft(name: &str, subject: &str) -> TemplateDraft {
    TemplateDraft::new(name, subject)
        .with_action("standing still")
        .with_environment("open field")
        .with_style("oil painting")
        .with_lighting("golden hour")
        .with_camera("50mm")
}

fn empty_store(dir: &TempDir) -> FileStore {
    FileStore::open(dir.path().to_path_buf()).with_seed_presets(false)
}

#[test]
fn test_fs_backend_blob_io() {
    let dir = TempDir::new().unwrap();
    let backend = FsBackend::new(dir.path().join("nested"));

    assert_eq!(backend.read_blob("things").unwrap(), None);

    backend.write_blob("things", "[1, 2]").unwrap();
    assert_eq!(backend.read_blob("things").unwrap(), Some("[1, 2]".to_string()));
    assert!(dir.path().join("nested").join("things.json").exists());

    backend.delete_blob("things").unwrap();
    assert_eq!(backend.read_blob("things").unwrap(), None);

    // Deleting a missing blob is not an error
    backend.delete_blob("things").unwrap();
}

#[test]
fn test_fs_backend_atomic_write_artifacts() {
    let dir = TempDir::new().unwrap();
    let backend = FsBackend::new(dir.path().to_path_buf());

    backend.write_blob(COLLECTION_KEY, "first").unwrap();
    backend.write_blob(COLLECTION_KEY, "second").unwrap();

    let on_disk = fs::read_to_string(backend.blob_path(COLLECTION_KEY)).unwrap();
    assert_eq!(on_disk, "second");

    for entry in fs::read_dir(dir.path()).unwrap() {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_str().unwrap().to_string();
        assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
    }
}

#[test]
fn test_collection_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let id = {
        let mut api = PromptDeckApi::new(empty_store(&dir));
        let result = api.create(&draft("Harbor", "a red boat").with_tags(["sea"])).unwrap();
        assert!(result.persisted);
        result.affected[0].id
    };

    let mut store = empty_store(&dir);
    let reloaded = store.get_template(&id).unwrap();
    assert_eq!(reloaded.name, "Harbor");
    assert_eq!(reloaded.tags, vec!["sea".to_string()]);
    assert_eq!(store.search_index().unwrap().len(), 1);
}

#[test]
fn test_collection_layout_is_a_json_array() {
    let dir = TempDir::new().unwrap();
    let mut api = PromptDeckApi::new(empty_store(&dir));
    api.create(&draft("Harbor", "a red boat")).unwrap();

    let raw = fs::read_to_string(dir.path().join(format!("{}.json", COLLECTION_KEY))).unwrap();
    let stored: Vec<Template> = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored.len(), 1);
    assert!(raw.contains("\"usageCount\""));
    assert!(raw.contains("\"renderSuccessCount\""));
}

#[test]
fn test_first_open_seeds_presets_once() {
    let dir = TempDir::new().unwrap();
    {
        let mut store = FileStore::open(dir.path().to_path_buf());
        let all = store.templates().unwrap();
        assert_eq!(all.len(), preset_drafts().len());
        assert!(all.iter().all(|t| t.pinned));
    }

    let mut store = FileStore::open(dir.path().to_path_buf());
    assert_eq!(store.templates().unwrap().len(), preset_drafts().len());
}

#[test]
fn test_legacy_file_is_migrated_and_removed() {
    let dir = TempDir::new().unwrap();
    let legacy = r#"[
        {"name": "Old Harbor", "data": {"subject": "a red boat", "style": "ink"}},
        {"name": "Old Harbor", "data": {"subject": "a red boat", "style": "ink"}},
        {"name": "Broken", "data": {"style": "ink"}}
    ]"#;
    fs::write(dir.path().join(format!("{}.json", LEGACY_KEY)), legacy).unwrap();

    let mut store = FileStore::open(dir.path().to_path_buf());
    let all = store.templates().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "Old Harbor");
    assert!(!dir.path().join(format!("{}.json", LEGACY_KEY)).exists());
    assert!(dir.path().join(format!("{}.json", COLLECTION_KEY)).exists());
}

#[test]
fn test_corrupt_collection_falls_back_to_bootstrap() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(format!("{}.json", COLLECTION_KEY)), "{ nope").unwrap();

    let mut store = FileStore::open(dir.path().to_path_buf());
    assert_eq!(store.templates().unwrap().len(), preset_drafts().len());
}

#[test]
fn test_edits_and_deletes_persist() {
    let dir = TempDir::new().unwrap();
    let (keep, gone) = {
        let mut api = PromptDeckApi::new(empty_store(&dir));
        let keep = api.create(&draft("Harbor", "a red boat")).unwrap().affected[0].id;
        let gone = api.create(&draft("Forest", "a red fox")).unwrap().affected[0].id;
        let patch = TemplatePatch {
            style: Some("watercolor".to_string()),
            ..Default::default()
        };
        api.update_by_id(&keep, &patch).unwrap();
        api.delete_by_id(&gone).unwrap();
        (keep, gone)
    };

    let mut store = empty_store(&dir);
    assert_eq!(store.templates().unwrap().len(), 1);
    assert_eq!(store.get_template(&keep).unwrap().style, "watercolor");
    assert!(store.get_template(&gone).is_err());
}
