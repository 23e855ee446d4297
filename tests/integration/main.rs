//! Integration tests for the npm buildpack binary

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use sha2::{Digest, Sha256};
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn buildpack() -> Command {
        cargo_bin_cmd!("npm-buildpack")
    }

    struct Workspace {
        _temp: TempDir,
        app: PathBuf,
        layers: PathBuf,
        platform: PathBuf,
        plan: PathBuf,
    }

    impl Workspace {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            let app = temp.path().join("app");
            let layers = temp.path().join("layers");
            let platform = temp.path().join("platform");
            for dir in [&app, &layers, &platform] {
                fs::create_dir_all(dir).unwrap();
            }
            let plan = temp.path().join("plan.toml");
            Self {
                _temp: temp,
                app,
                layers,
                platform,
                plan,
            }
        }

        fn detect(&self) -> Command {
            let mut cmd = buildpack();
            cmd.arg("detect")
                .arg("--app-dir")
                .arg(&self.app)
                .arg(&self.platform)
                .arg(&self.plan);
            cmd
        }

        fn build(&self) -> Command {
            let mut cmd = buildpack();
            cmd.env_remove("CNB_BUILDPACK_DIR")
                .env_remove("BP_LOG_LEVEL")
                .arg("build")
                .arg("--app-dir")
                .arg(&self.app)
                .arg(&self.layers)
                .arg(&self.platform)
                .arg(&self.plan);
            cmd
        }
    }

    fn read(path: &Path) -> String {
        fs::read_to_string(path).unwrap()
    }

    #[test]
    fn help_displays() {
        buildpack()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("detect"))
            .stdout(predicate::str::contains("build"));
    }

    #[test]
    fn version_displays() {
        buildpack()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("npm-buildpack"));
    }

    #[test]
    fn detect_writes_plan_with_node_version() {
        let ws = Workspace::new();
        fs::write(
            ws.app.join("package.json"),
            r#"{"name": "app", "engines": {"node": "10.x"}}"#,
        )
        .unwrap();

        ws.detect().assert().success();

        let plan: toml::Table = toml::from_str(&read(&ws.plan)).unwrap();
        let provides = plan["provides"].as_array().unwrap();
        assert_eq!(provides[0]["name"].as_str(), Some("node_modules"));

        let requires = plan["requires"].as_array().unwrap();
        let node = requires
            .iter()
            .find(|r| r["name"].as_str() == Some("node"))
            .unwrap();
        assert_eq!(node["version"].as_str(), Some("10.x"));
        assert_eq!(
            node["metadata"]["version-source"].as_str(),
            Some("package.json")
        );
        assert_eq!(node["metadata"]["launch"].as_bool(), Some(true));
    }

    #[test]
    fn detect_without_package_json_exits_100() {
        let ws = Workspace::new();

        ws.detect()
            .assert()
            .code(100)
            .stderr(predicate::str::contains("package.json"));

        assert!(!ws.plan.exists());
    }

    #[test]
    fn detect_invalid_package_json_is_an_error() {
        let ws = Workspace::new();
        fs::write(ws.app.join("package.json"), "{ not json").unwrap();

        ws.detect()
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Error:"));
    }

    #[test]
    fn build_reuses_layer_when_lockfile_unchanged() {
        let ws = Workspace::new();
        let lockfile = r#"{"lockfileVersion": 1}"#;
        fs::write(ws.app.join("package.json"), "{}").unwrap();
        fs::write(ws.app.join("package-lock.json"), lockfile).unwrap();
        let installed = ws.layers.join("modules/node_modules/left-pad");
        fs::create_dir_all(installed).unwrap();
        let manifest = format!(
            r#"launch = true

[metadata]
built_at = "2026-01-01T00:00:00Z"
cache_sha = "{}"
"#,
            hex::encode(Sha256::digest(lockfile.as_bytes()))
        );
        fs::write(ws.layers.join("modules.toml"), manifest).unwrap();
        fs::write(&ws.plan, "[[entries]]\nname = \"node_modules\"\n").unwrap();

        // No npm on PATH: the build must not try to run it
        ws.build()
            .env("PATH", ws.platform.as_os_str())
            .assert()
            .success()
            .stdout(predicate::str::contains("Selected NPM build process: 'npm ci'"))
            .stdout(predicate::str::contains("Reusing cached layer"));

        let link = ws.app.join("node_modules");
        assert_eq!(
            fs::read_link(&link).unwrap(),
            ws.layers.join("modules").join("node_modules")
        );

        let launch: toml::Table = toml::from_str(&read(&ws.layers.join("launch.toml"))).unwrap();
        let process = &launch["processes"].as_array().unwrap()[0];
        assert_eq!(process["type"].as_str(), Some("web"));
        assert_eq!(process["command"].as_str(), Some("npm start"));

        let modules: toml::Table = toml::from_str(&read(&ws.layers.join("modules.toml"))).unwrap();
        assert_eq!(modules["launch"].as_bool(), Some(true));
        assert_eq!(
            modules["metadata"]["built_at"].as_str(),
            Some("2026-01-01T00:00:00Z")
        );

        assert!(read(&ws.plan).contains("node_modules"));
    }

    #[test]
    fn build_without_npm_reports_hint() {
        let ws = Workspace::new();
        fs::write(ws.app.join("package.json"), "{}").unwrap();

        ws.build()
            .env("PATH", ws.platform.as_os_str())
            .assert()
            .code(1)
            .stdout(predicate::str::contains("Selected NPM build process: 'npm install'"))
            .stderr(predicate::str::contains("Make sure npm is installed"));
    }

    #[test]
    fn build_uses_descriptor_title() {
        let ws = Workspace::new();
        let buildpack_dir = ws.platform.join("buildpack");
        fs::create_dir_all(&buildpack_dir).unwrap();
        let descriptor = r#"api = "0.2"

[buildpack]
id = "example/npm"
name = "Example NPM"
version = "1.2.3"
"#;
        fs::write(buildpack_dir.join("buildpack.toml"), descriptor).unwrap();

        ws.build()
            .env("PATH", ws.platform.as_os_str())
            .arg("--buildpack-dir")
            .arg(&buildpack_dir)
            .assert()
            .code(1)
            .stdout(predicate::str::contains("Example NPM 1.2.3"));
    }
}
