//! Property tests for fix filename rules and GOG batching.

use camino::Utf8PathBuf;
use fixcheck::models::{FixModule, Platform};
use fixcheck::services::{FixNaming, HttpFetch, check_gogfixes};
use fixcheck::{Endpoint, FixCheckError};
use mockall::mock;
use proptest::prelude::*;
use std::cell::RefCell;
use std::fs;
use std::io::{Cursor, Read};
use tempfile::TempDir;

mock! {
    pub Fetch {}

    impl HttpFetch for Fetch {
        fn get(&self, url: &str) -> Result<Box<dyn Read>, FixCheckError>;
    }
}

fn steam_module(stem: &str) -> FixModule {
    FixModule::new(format!("root/gamefixes-steam/{stem}.py"), Platform::Steam)
}

fn gog_module(file_name: &str) -> FixModule {
    FixModule::new(
        format!("root/gamefixes-gog/{file_name}"),
        Platform::Other("gog".to_string()),
    )
}

proptest! {
    #[test]
    fn test_numeric_steam_stems_pass(stem in "[0-9]{1,12}") {
        let naming = FixNaming::new();
        prop_assert!(naming.check(&steam_module(&stem)).is_ok());
    }

    #[test]
    fn test_steam_stems_with_non_digits_fail(
        prefix in "[0-9]{0,6}",
        junk in "[a-zA-Z_\\-]{1,4}",
        suffix in "[0-9]{0,6}",
    ) {
        let naming = FixNaming::new();
        let stem = format!("{prefix}{junk}{suffix}");
        let err = naming.check(&steam_module(&stem)).unwrap_err();
        let is_invalid_filename = matches!(err, FixCheckError::InvalidSteamFilename(_));
        prop_assert!(is_invalid_filename);
    }

    #[test]
    fn test_umu_prefixed_names_pass(id in "[a-z0-9]{1,16}") {
        let naming = FixNaming::new();
        let file_name = format!("umu-{id}.py");
        prop_assert!(naming.check(&gog_module(&file_name)).is_ok());
    }

    #[test]
    fn test_names_without_umu_prefix_fail(name in "[a-z0-9]{1,16}") {
        prop_assume!(!name.starts_with("umu"));
        let naming = FixNaming::new();
        let file_name = format!("{name}.py");
        let err = naming.check(&gog_module(&file_name)).unwrap_err();
        let is_missing_prefix = matches!(err, FixCheckError::MissingUmuPrefix(_));
        prop_assert!(is_missing_prefix);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn test_gog_batches_cover_every_id_once(count in 0usize..160, batch_size in 1usize..80) {
        let temp_dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        fs::create_dir_all(root.join("gamefixes-gog")).unwrap();
        for i in 0..count {
            fs::write(root.join(format!("gamefixes-gog/umu-{}.py", 100 + i)), "").unwrap();
        }

        let seen = RefCell::new(Vec::<usize>::new());
        let mut catalog = MockFetch::new();
        catalog.expect_get().returning(|url| {
            let ids = url.rsplit('=').next().unwrap_or_default();
            let items: Vec<String> = ids
                .split("%2C")
                .map(|id| format!(r#"{{"id": {id}}}"#))
                .collect();
            Ok(Box::new(Cursor::new(format!("[{}]", items.join(",")).into_bytes())) as Box<dyn Read>)
        });
        let mut session = MockFetch::new();
        session.expect_get().never();

        let recording = RecordingFetch { inner: &catalog, batch_sizes: &seen };
        let resolution = check_gogfixes(
            &root,
            "https://gog.example/products?ids=",
            &Endpoint::new("umu.example", "/umu_api.php"),
            batch_size,
            &recording,
            &session,
        )
        .unwrap();

        let sizes = seen.into_inner();
        prop_assert_eq!(resolution.by_catalog, count);
        prop_assert_eq!(sizes.iter().sum::<usize>(), count);
        prop_assert!(sizes.iter().all(|size| *size <= batch_size.min(50)));
        prop_assert_eq!(sizes.len(), count.div_ceil(batch_size.min(50)));
    }
}

/// Records the number of IDs in each products request.
struct RecordingFetch<'a> {
    inner: &'a MockFetch,
    batch_sizes: &'a RefCell<Vec<usize>>,
}

impl HttpFetch for RecordingFetch<'_> {
    fn get(&self, url: &str) -> Result<Box<dyn Read>, FixCheckError> {
        let ids = url.rsplit('=').next().unwrap_or_default();
        self.batch_sizes.borrow_mut().push(ids.split("%2C").count());
        self.inner.get(url)
    }
}
