use std::fs;

use cozy_config::{ConfigError, ConfigSources, Environment, Layer, Settings, resolve};
use tempfile::TempDir;

fn write_config(dir: &TempDir, contents: &str) -> anyhow::Result<std::path::PathBuf> {
    let path = dir.path().join("cozy.yaml");
    fs::write(&path, contents)?;
    Ok(path)
}

#[test]
fn environment_beats_file_for_every_shared_key() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    write_config(
        &dir,
        "host: file-host\nport: 1111\nadmin:\n  host: file-admin\n  port: 2222\nlog:\n  level: warn\n",
    )?;
    let environment = Environment::from_pairs([
        ("COZY_HOST", "env-host"),
        ("COZY_PORT", "3333"),
        ("COZY_ADMIN_HOST", "env-admin"),
        ("COZY_ADMIN_PORT", "4444"),
        ("COZY_LOG_LEVEL", "trace"),
    ]);

    let sources =
        ConfigSources::new(environment).with_search_paths([dir.path().display().to_string()]);
    let store = resolve(sources)?;

    for key in ["host", "port", "admin.host", "admin.port", "log.level"] {
        assert_eq!(store.source_of(key), Some(Layer::Env), "key {key}");
    }
    let settings = Settings::from_store(&store)?;
    assert_eq!(settings.server_addr(), "env-host:3333");
    assert_eq!(settings.admin_server_addr(), "env-admin:4444");
    assert_eq!(settings.log.level, "trace");
    Ok(())
}

#[test]
fn default_only_keys_resolve_to_compiled_defaults() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    write_config(&dir, "host: file-host\n")?;

    let sources = ConfigSources::new(Environment::default())
        .with_search_paths([dir.path().display().to_string()]);
    let store = resolve(sources)?;

    assert_eq!(store.source_of("admin.port"), Some(Layer::Default));
    assert_eq!(store.get_u16("admin.port")?, 6060);
    assert_eq!(store.get_u16("port")?, 8080);
    assert_eq!(store.get_string("admin.host")?, "localhost");
    assert_eq!(store.get_string("log.level")?, "info");
    Ok(())
}

#[test]
fn missing_explicit_file_fails_without_searching() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    write_config(&dir, "host: discovered\n")?;
    let missing = dir.path().join("nope.yaml");

    let sources = ConfigSources::new(Environment::default())
        .with_search_paths([dir.path().display().to_string()])
        .with_explicit_path(&missing);

    match resolve(sources) {
        Err(ConfigError::NotFound { path }) => assert_eq!(path, missing),
        other => anyhow::bail!("expected NotFound, got {other:?}"),
    }
    Ok(())
}

#[test]
fn no_discoverable_file_is_not_an_error() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let environment = Environment::from_pairs([("COZY_ADMIN_HOST", "admin.internal")]);

    let sources =
        ConfigSources::new(environment).with_search_paths([dir.path().display().to_string()]);
    let store = resolve(sources)?;

    assert_eq!(store.config_file_used(), None);
    let settings = Settings::from_store(&store)?;
    assert_eq!(settings.admin_server_addr(), "admin.internal:6060");
    Ok(())
}

#[test]
fn explicit_path_reads_exactly_that_file() -> anyhow::Result<()> {
    let search = TempDir::new()?;
    write_config(&search, "host: discovered\n")?;
    let explicit_dir = TempDir::new()?;
    let explicit = explicit_dir.path().join("custom.yml");
    fs::write(&explicit, "host: explicit\n")?;

    let sources = ConfigSources::new(Environment::default())
        .with_search_paths([search.path().display().to_string()])
        .with_explicit_path(&explicit);
    let store = resolve(sources)?;

    assert_eq!(store.config_file_used(), Some(explicit.as_path()));
    assert_eq!(store.get_string("host")?, "explicit");
    Ok(())
}

#[test]
fn malformed_file_reports_its_path() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = write_config(&dir, "admin: [unclosed\n")?;

    let sources = ConfigSources::new(Environment::default())
        .with_search_paths([dir.path().display().to_string()]);

    match resolve(sources) {
        Err(err @ ConfigError::Parse { .. }) => {
            assert!(err.to_string().contains(&path.display().to_string()));
        }
        other => anyhow::bail!("expected Parse, got {other:?}"),
    }
    Ok(())
}

#[test]
fn admin_port_round_trips_from_file_and_default() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    write_config(&dir, "admin:\n  port: 6543\n")?;
    let from_file = resolve(
        ConfigSources::new(Environment::default())
            .with_search_paths([dir.path().display().to_string()]),
    )?;
    assert_eq!(from_file.get_u16("admin.port")?, 6543);

    let empty = TempDir::new()?;
    let from_default = resolve(
        ConfigSources::new(Environment::default())
            .with_search_paths([empty.path().display().to_string()])
            .with_default("admin.port", 6543),
    )?;
    assert_eq!(from_default.get_u16("admin.port")?, 6543);
    Ok(())
}

#[test]
fn empty_environment_values_do_not_shadow_lower_layers() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    write_config(&dir, "admin:\n  port: 7000\n")?;
    let environment = Environment::from_pairs([("COZY_ADMIN_PORT", ""), ("COZY_HOST", "")]);

    let sources =
        ConfigSources::new(environment).with_search_paths([dir.path().display().to_string()]);
    let store = resolve(sources)?;

    assert_eq!(store.source_of("admin.port"), Some(Layer::File));
    assert_eq!(store.source_of("host"), Some(Layer::Default));
    let settings = Settings::from_store(&store)?;
    assert_eq!(settings.admin_server_addr(), "localhost:7000");
    assert_eq!(settings.server_addr(), "localhost:8080");
    Ok(())
}
