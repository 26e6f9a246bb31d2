use mall_site::config::ConfigLoader;
use mall_site::seo::SettingType;
use std::{
    env, fs,
    path::PathBuf,
    sync::{Mutex, MutexGuard, OnceLock},
};
use tempfile::TempDir;

fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

fn env_guard() -> MutexGuard<'static, ()> {
    env_lock()
        .lock()
        .unwrap_or_else(|poison| poison.into_inner())
}

fn clear_env() {
    unsafe {
        env::remove_var("MALL_PROFILE");
        env::remove_var("MALL_API_BIND_ADDR");
        env::remove_var("MALL_LOG_LEVEL");
        env::remove_var("MALL_CINEMA_IDS");
        env::remove_var("MALL_CONTACT_COOLDOWN_SECONDS");
        env::remove_var("MALL_SEO_TRUSTED_TYPES");
    }
}

fn write_env_file(dir: &TempDir, name: &str, contents: &str) {
    let path = dir.path().join(name);
    fs::write(path, contents).unwrap();
}

#[test]
fn loads_defaults_when_no_env_present() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let cfg = loader.load().expect("config loads with defaults");

    assert_eq!(cfg.profile, "local");
    assert_eq!(cfg.api_bind_addr, "0.0.0.0:8080");
    assert_eq!(cfg.contact.cooldown_seconds, 30);
    assert_eq!(cfg.directory.page_size, 12);
    assert_eq!(cfg.cinema.cinema_ids, vec!["main".to_string()]);
    cfg.bind_addr().expect("default bind addr parses");
    clear_env();
}

#[test]
fn layered_env_files_apply_in_order() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    write_env_file(&temp_dir, ".env", "MALL_API_BIND_ADDR=127.0.0.1:3000\n");
    write_env_file(
        &temp_dir,
        ".env.test",
        "MALL_API_BIND_ADDR=192.168.0.10:5000\n",
    );
    write_env_file(
        &temp_dir,
        ".env.test.local",
        "MALL_API_BIND_ADDR=10.0.0.5:6000\n",
    );

    // Select profile via .env.local before profile-specific files load.
    write_env_file(
        &temp_dir,
        ".env.local",
        "MALL_PROFILE=test\nMALL_API_BIND_ADDR=127.0.0.1:4000\n",
    );

    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let cfg = loader.load().expect("config loads with layered env files");

    assert_eq!(cfg.profile, "test");
    assert_eq!(cfg.api_bind_addr, "10.0.0.5:6000");
    clear_env();
}

#[test]
fn os_environment_has_highest_precedence() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    write_env_file(
        &temp_dir,
        ".env",
        "MALL_API_BIND_ADDR=127.0.0.1:3000\nMALL_CONTACT_COOLDOWN_SECONDS=45\n",
    );

    unsafe {
        env::set_var("MALL_API_BIND_ADDR", "0.0.0.0:9090");
    }

    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let cfg = loader.load().expect("config loads with env override");
    assert_eq!(cfg.api_bind_addr, "0.0.0.0:9090");
    assert_eq!(cfg.contact.cooldown_seconds, 45);

    clear_env();
}

#[test]
fn comma_separated_lists_are_parsed() {
    let _guard = env_guard();
    clear_env();

    unsafe {
        env::set_var("MALL_CINEMA_IDS", "main, imax");
        env::set_var("MALL_SEO_TRUSTED_TYPES", "script");
    }

    let temp_dir = TempDir::new().unwrap();
    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let cfg = loader.load().expect("config loads with lists");

    assert_eq!(cfg.cinema.cinema_ids, vec!["main".to_string(), "imax".to_string()]);
    assert_eq!(cfg.seo.trusted_types, vec![SettingType::Script]);

    clear_env();
}

#[test]
fn unknown_trusted_type_returns_error() {
    let _guard = env_guard();
    clear_env();

    unsafe {
        env::set_var("MALL_SEO_TRUSTED_TYPES", "script,iframe");
    }
    let temp_dir = TempDir::new().unwrap();
    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let err = loader.load().expect_err("unknown type should fail");
    assert!(format!("{}", err).contains("unknown setting type 'iframe'"));

    clear_env();
}

#[test]
fn invalid_bind_addr_returns_error() {
    let _guard = env_guard();
    clear_env();

    unsafe {
        env::set_var("MALL_API_BIND_ADDR", "not-an-addr");
    }
    let temp_dir = TempDir::new().unwrap();
    let loader = ConfigLoader::with_base_dir(PathBuf::from(temp_dir.path()));
    let err = loader.load().expect_err("invalid bind addr should fail");
    assert!(format!("{}", err).contains("invalid api bind address"));

    clear_env();
}
