use std::fs;
use std::path::Path;

use mail_map::{query, Error as MapError, FatalError, QueryKind};
use mail_map_db::DbBackend;
use mapd::{Config, Context, Error};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn write_config(dir: &Path, body: &str) -> Config {
    let path = dir.join("maps.toml");
    fs::write(&path, body).unwrap();
    Config::load(&path).unwrap()
}

fn start_context(dir: &Path) -> Context {
    fs::write(
        dir.join("virtual"),
        "# virtual domains\nexample.org vhost\n.example.net vhost\n",
    )
    .unwrap();

    let db_path = dir.join("senders.db");
    DbBackend::new()
        .unwrap()
        .import(db_path.to_str().unwrap(), [("alice@example.org", "ok")])
        .unwrap();

    let config = write_config(
        dir,
        &format!(
            r#"
            [[map]]
            name = "aliases"
            backend = "static"
            entries = [["root", "admin"], ["admin"]]

            [[map]]
            name = "virtual"
            backend = "file"
            config = "{vfile}"

            [[map]]
            name = "senders"
            backend = "db"
            config = "{senders}"

            [[map]]
            backend = "static"
            entries = [["127.0.0.0/8"], ["::1"]]
            "#,
            vfile = dir.join("virtual").display(),
            senders = db_path.display(),
        ),
    );
    Context::from_config(&config).unwrap()
}

#[test]
fn test_lookup_across_backends() {
    let dir = TempDir::new().unwrap();
    let ctx = start_context(dir.path());
    let maps = ctx.maps();

    let aliases = ctx.resolve("aliases").unwrap();
    assert_eq!(maps.lookup(aliases, "root", QueryKind::Alias).unwrap().as_deref(), Some("admin"));
    assert_eq!(maps.lookup(aliases, "admin", QueryKind::Alias).unwrap().as_deref(), Some(""));
    assert_eq!(maps.lookup(aliases, "nobody", QueryKind::Alias).unwrap(), None);

    let virtual_id = ctx.resolve("virtual").unwrap();
    assert_eq!(
        maps.lookup(virtual_id, "example.org", QueryKind::Virtual).unwrap().as_deref(),
        Some("vhost")
    );
    assert!(maps
        .compare(virtual_id, "mail.example.net", QueryKind::Virtual, &query::domain)
        .matched());

    let senders = ctx.resolve("senders").unwrap();
    assert_eq!(
        maps.lookup(senders, "alice@example.org", QueryKind::Exact).unwrap().as_deref(),
        Some("ok")
    );
    assert_eq!(maps.lookup(senders, "bob@example.org", QueryKind::Exact).unwrap(), None);
}

#[test]
fn test_unnamed_map_resolves_by_id() {
    let dir = TempDir::new().unwrap();
    let ctx = start_context(dir.path());

    let id = ctx.resolve("4").unwrap();
    assert_eq!(ctx.maps().maps().find_by_id(id).unwrap().name(), "<dynamic:4>");
    assert!(ctx
        .maps()
        .compare(id, "127.0.0.1", QueryKind::NetAddr, &query::netaddr)
        .matched());
    assert!(matches!(ctx.resolve("5"), Err(Error::UnknownMap(_))));
    assert!(matches!(ctx.resolve("relays"), Err(Error::UnknownMap(_))));
}

#[test]
fn test_file_map_update_reloads() {
    let dir = TempDir::new().unwrap();
    let ctx = start_context(dir.path());
    let id = ctx.resolve("virtual").unwrap();

    assert_eq!(ctx.maps().lookup(id, "example.com", QueryKind::Virtual).unwrap(), None);
    fs::write(dir.path().join("virtual"), "example.com vhost2\n").unwrap();
    ctx.maps().update(id).unwrap();
    assert_eq!(
        ctx.maps().lookup(id, "example.com", QueryKind::Virtual).unwrap().as_deref(),
        Some("vhost2")
    );
}

#[test]
fn test_duplicate_map_name_is_fatal() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        dir.path(),
        r#"
        [[map]]
        name = "aliases"
        backend = "static"

        [[map]]
        name = "aliases"
        backend = "file"
        config = "/etc/mail/aliases"
        "#,
    );

    let err = Context::from_config(&config).err().unwrap();
    assert!(err.is_fatal());
    assert!(matches!(err, Error::Map(MapError::Fatal(FatalError::DuplicateName(_)))));
}

#[test]
fn test_entries_on_file_map_are_fatal() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        dir.path(),
        r#"
        [[map]]
        name = "virtual"
        backend = "file"
        config = "/etc/mail/virtual"
        entries = [["example.org", "vhost"]]
        "#,
    );

    let err = Context::from_config(&config).err().unwrap();
    assert!(matches!(err, Error::Map(MapError::Fatal(FatalError::NotStatic { .. }))));
}

#[test]
fn test_malformed_entry_is_rejected() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        dir.path(),
        r#"
        [[map]]
        name = "aliases"
        backend = "static"
        entries = [["root", "admin", "extra"]]
        "#,
    );

    let err = Context::from_config(&config).err().unwrap();
    assert!(matches!(err, Error::Entry { index: 0, len: 3, .. }));
}

#[test]
fn test_missing_config_file() {
    let dir = TempDir::new().unwrap();
    let err = Config::load(&dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, Error::Read { .. }));
    assert!(err.is_fatal());
}
