use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const TRAINING_ORDER: [&str; 13] = [
    "age",
    "gender",
    "height",
    "weight",
    "ap_hi",
    "ap_lo",
    "cholesterol",
    "gluc",
    "smoke",
    "alco",
    "active",
    "age_years",
    "bmi",
];

pub const DATASET: &str = "id;age;gender;height;weight;ap_hi;ap_lo;cholesterol;gluc;smoke;alco;active;cardio
0;18393;2;168;62.0;110;80;1;1;0;0;1;0
1;20228;1;156;85.0;140;90;3;1;0;0;1;1
2;18857;1;165;64.0;130;70;3;1;0;0;0;1
3;17623;2;169;82.0;150;100;1;1;0;0;1;1
4;17474;1;156;56.0;100;60;1;1;0;0;0;0
5;21914;1;151;67.0;120;80;2;2;0;0;0;0
6;22113;1;157;93.0;130;80;3;1;0;0;1;0
7;22584;2;178;95.0;130;90;3;3;0;0;1;1
";

pub struct TestEnv {
    _tmp: TempDir,
    pub home: PathBuf,
    pub model: PathBuf,
    pub dataset: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        fs::create_dir_all(&home).expect("create isolated home");

        let model = write_fixture_model(tmp.path());
        let dataset = tmp.path().join("cardio_train.csv");
        fs::write(&dataset, DATASET).expect("write dataset");

        Self {
            _tmp: tmp,
            home,
            model,
            dataset,
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self._tmp.path().join(name)
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("cardio");
        cmd.env("HOME", &self.home)
            .env_remove("RUST_LOG")
            .current_dir(self._tmp.path());
        cmd
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let mut cmd = self.cmd();
        let out = cmd
            .arg("--json")
            .arg("--model")
            .arg(&self.model)
            .arg("--dataset")
            .arg(&self.dataset)
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    pub fn run_json_failure(&self, args: &[&str]) -> Value {
        let mut cmd = self.cmd();
        let out = cmd
            .arg("--json")
            .args(args)
            .assert()
            .failure()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("error json output")
    }
}

/// Two-tree forest: tree 0 splits on systolic pressure, tree 1 on age in
/// days and then cholesterol.
pub fn fixture_model() -> Value {
    serde_json::json!({
        "format_version": 1,
        "features": TRAINING_ORDER,
        "model": {
            "kind": "random_forest",
            "classes": [0, 1],
            "trees": [
                {
                    "children_left": [1, -1, -1],
                    "children_right": [2, -1, -1],
                    "feature": [4, -2, -2],
                    "threshold": [139.5, -2.0, -2.0],
                    "value": [[90.0, 110.0], [70.0, 30.0], [20.0, 80.0]]
                },
                {
                    "children_left": [1, 2, -1, -1, -1],
                    "children_right": [4, 3, -1, -1, -1],
                    "feature": [0, 6, -2, -2, -2],
                    "threshold": [20089.0, 2.5, -2.0, -2.0, -2.0],
                    "value": [[115.0, 185.0], [90.0, 110.0], [60.0, 40.0], [30.0, 70.0], [25.0, 75.0]]
                }
            ]
        }
    })
}

pub fn write_json(path: &Path, body: &Value) {
    fs::write(
        path,
        serde_json::to_string_pretty(body).expect("serialize fixture"),
    )
    .expect("write fixture");
}

fn write_fixture_model(base: &Path) -> PathBuf {
    let path = base.join("cardio_rf_model.json");
    write_json(&path, &fixture_model());
    path
}
