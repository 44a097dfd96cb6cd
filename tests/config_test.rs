use growbit::config::{BadgeCatalog, Config};
use growbit::model::RequirementKind;

// Env-var tests share process state, so they run inside one test.
#[test]
fn config_from_env() {
    unsafe {
        std::env::set_var("GROWBIT_DATA_DIR", "/tmp/growbit-config-test");
        std::env::remove_var("GROWBIT_BADGES");
        std::env::remove_var("GROWBIT_USER_NAME");
        std::env::remove_var("LOG_LEVEL");
    }

    let config = Config::from_env().unwrap();
    assert_eq!(
        config.data_dir,
        std::path::PathBuf::from("/tmp/growbit-config-test")
    );
    assert!(config.badges_path.is_none());
    assert_eq!(config.user_name, "Demo User");
    assert_eq!(config.log_level, "info");
    assert_eq!(config.badge_catalog().unwrap(), BadgeCatalog::builtin());

    // Set but blank is rejected
    unsafe {
        std::env::set_var("GROWBIT_USER_NAME", "  ");
    }
    assert!(Config::from_env().is_err());

    // Missing catalogue file surfaces at load time
    unsafe {
        std::env::remove_var("GROWBIT_USER_NAME");
        std::env::set_var("GROWBIT_BADGES", "/nonexistent/growbit/badges.toml");
    }
    let config = Config::from_env().unwrap();
    assert!(config.badge_catalog().is_err());

    unsafe {
        std::env::remove_var("GROWBIT_DATA_DIR");
        std::env::remove_var("GROWBIT_BADGES");
    }
}

#[test]
fn badge_catalog_parses_toml() {
    let catalog = BadgeCatalog::from_toml(
        r#"
        [[badge]]
        id = "streak-3"
        name = "Warming Up"
        description = "Maintained a 3-day streak"
        icon = "🔥"
        requirement = { type = "streak", value = 3 }

        [[badge]]
        id = "xp-50"
        name = "First Fifty"
        requirement = { type = "xp", value = 50 }
        "#,
    )
    .unwrap();

    let badges = catalog.badges();
    assert_eq!(badges.len(), 2);
    assert_eq!(badges[0].requirement.kind, RequirementKind::Streak);
    assert_eq!(badges[0].requirement.value, 3);
    assert_eq!(badges[1].description, "");
    assert!(badges.iter().all(|b| !b.unlocked));
}

#[test]
fn badge_catalog_rejects_bad_entries() {
    let duplicate = r#"
        [[badge]]
        id = "a"
        name = "A"
        requirement = { type = "xp", value = 1 }

        [[badge]]
        id = "a"
        name = "A again"
        requirement = { type = "xp", value = 2 }
    "#;
    assert!(BadgeCatalog::from_toml(duplicate).is_err());

    let zero = r#"
        [[badge]]
        id = "z"
        name = "Zero"
        requirement = { type = "completion", value = 0 }
    "#;
    assert!(BadgeCatalog::from_toml(zero).is_err());

    let unknown_kind = r#"
        [[badge]]
        id = "u"
        name = "Unknown"
        requirement = { type = "friends", value = 3 }
    "#;
    assert!(BadgeCatalog::from_toml(unknown_kind).is_err());
}

#[test]
fn badge_catalog_loads_from_file() {
    let dir = std::env::temp_dir()
        .join("growbit-test")
        .join(uuid::Uuid::new_v4().to_string());
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("badges.toml");
    std::fs::write(
        &path,
        "[[badge]]\nid = \"c-5\"\nname = \"Five\"\nrequirement = { type = \"completion\", value = 5 }\n",
    )
    .unwrap();

    let catalog = BadgeCatalog::load_from_file(&path).unwrap();
    assert_eq!(catalog.badges()[0].id, "c-5");

    let _ = std::fs::remove_dir_all(&dir);
}
