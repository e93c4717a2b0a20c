use assert_cmd::Command;

fn bookstore() -> Command {
    let mut cmd = Command::cargo_bin("bookstore").expect("bookstore binary is built");
    cmd.env_remove("BOOKSTORE_API_URL").env_remove("BOOKSTORE_PREFS");
    cmd
}

#[test]
fn theme_toggle_is_persisted() {
    let dir = tempfile::tempdir().expect("temp dir");
    let prefs = dir.path().join("prefs.json");

    bookstore()
        .arg("--prefs")
        .arg(&prefs)
        .arg("theme")
        .assert()
        .success()
        .stdout("light\n");

    bookstore()
        .arg("--prefs")
        .arg(&prefs)
        .args(["theme", "--toggle"])
        .assert()
        .success()
        .stdout("dark\n");

    bookstore()
        .arg("--prefs")
        .arg(&prefs)
        .arg("theme")
        .assert()
        .success()
        .stdout("dark\n");
}

#[test]
fn conflicting_list_filters_are_refused() {
    bookstore()
        .args(["list", "--genre", "Poetry", "--author", "Someone"])
        .assert()
        .failure();
}

#[test]
fn unreachable_api_fails_the_command() {
    bookstore()
        .args(["--api-url", "http://127.0.0.1:9/api", "genres"])
        .assert()
        .failure();
}
