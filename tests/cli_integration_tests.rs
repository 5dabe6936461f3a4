//! End-to-end tests for the chronotree binary

use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Inputs {
    _dir: TempDir,
    timestamps: PathBuf,
    assoc: PathBuf,
    lines: PathBuf,
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// A,B fall into one cluster and C,D into another (alpha = 2h)
fn inputs(lines: &str) -> Inputs {
    let dir = TempDir::new().unwrap();
    let timestamps = write(
        dir.path(),
        "timestamps.txt",
        "2012-10-01 10:00:00 A\n\
         2012-10-01 11:00:00 B\n\
         2012-10-01 15:30:00 C\n\
         2012-10-01 16:00:00 D\n",
    );
    let assoc = write(dir.path(), "biword_assoc.dat", "A-C 5\nA 1\n");
    let lines = write(dir.path(), "lines.txt", lines);
    Inputs {
        _dir: dir,
        timestamps,
        assoc,
        lines,
    }
}

fn build_cmd(inputs: &Inputs) -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("chronotree");
    cmd.arg("build")
        .arg("--timestamps")
        .arg(&inputs.timestamps)
        .arg("--assoc")
        .arg(&inputs.assoc)
        .arg("--lines")
        .arg(&inputs.lines);
    cmd
}

#[test]
fn test_build_text_output() {
    let inputs = inputs("A B C D\n\n");
    build_cmd(&inputs)
        .assert()
        .success()
        .stdout("-root:0:1 \n\t-A:0:1 \n\t\t-C:0:0 \n\n-root:0:0 \n\n");
}

#[test]
fn test_build_no_root() {
    let inputs = inputs("D C B A\n");
    build_cmd(&inputs)
        .arg("--no-root")
        .assert()
        .success()
        .stdout("\t-A:0:1 \n\t\t-C:0:0 \n\n");
}

#[test]
fn test_build_small_alpha_splits_everything() {
    let inputs = inputs("A B\n");
    build_cmd(&inputs)
        .arg("--alpha-hours")
        .arg("0.25")
        .assert()
        .success()
        .stdout("-root:0:2 \n\t-A:0:0 \n\t-B:0:0 \n\n");
}

#[test]
fn test_build_json_output() {
    let inputs = inputs("A B C D\n");
    let output = build_cmd(&inputs)
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let record: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(record["line"], 1);
    assert_eq!(record["clusters"].as_array().unwrap().len(), 2);
    assert_eq!(record["tree"]["children"][0]["name"], "A");
    assert_eq!(record["tree"]["children"][0]["children"][0]["name"], "C");
}

#[test]
fn test_build_missing_timestamp_fails() {
    let inputs = inputs("A ghost\n");
    build_cmd(&inputs)
        .assert()
        .failure()
        .stderr(predicate::str::contains("ghost"));
}

#[test]
fn test_build_keep_going_leaves_empty_block() {
    let inputs = inputs("A ghost\nC\n");
    build_cmd(&inputs)
        .arg("--keep-going")
        .assert()
        .success()
        .stdout("\n-root:0:1 \n\t-C:0:0 \n\n");
}

#[test]
fn test_build_output_file_and_config() {
    let inputs = inputs("A B C D\n");
    let dir = TempDir::new().unwrap();
    let config = write(dir.path(), "chronotree.toml", "emit_root = false\njobs = 2\n");
    let output = dir.path().join("forest.txt");

    build_cmd(&inputs)
        .arg("--config")
        .arg(&config)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout("");

    assert_eq!(fs::read_to_string(output).unwrap(), "\t-A:0:1 \n\t\t-C:0:0 \n\n");
}

#[test]
fn test_build_rejects_bad_config() {
    let inputs = inputs("A\n");
    let dir = TempDir::new().unwrap();
    let config = write(dir.path(), "chronotree.toml", "jobs = 0\n");

    build_cmd(&inputs)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("jobs"));
}

#[test]
fn test_build_malformed_assoc_fails() {
    let inputs = inputs("A\n");
    fs::write(&inputs.assoc, "A-C five\n").unwrap();
    build_cmd(&inputs)
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 1"));
}

#[test]
fn test_build_missing_assoc_source_names_file() {
    let inputs = inputs("A\n");
    let missing = inputs.assoc.with_file_name("missing.dat");
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("chronotree");
    cmd.arg("build")
        .arg("--timestamps")
        .arg(&inputs.timestamps)
        .arg("--assoc")
        .arg(&inputs.assoc)
        .arg(&missing)
        .arg("--lines")
        .arg(&inputs.lines)
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read"))
        .stderr(predicate::str::contains("missing.dat"));
}

#[test]
fn test_build_non_utf8_assoc_reports_origin_and_line() {
    let inputs = inputs("A\n");
    fs::write(&inputs.assoc, b"A-C 5\n\xff\xfe 2\n").unwrap();
    build_cmd(&inputs)
        .assert()
        .failure()
        .stderr(predicate::str::contains("biword_assoc.dat at line 2"));
}

#[test]
fn test_count_then_build() {
    let dir = TempDir::new().unwrap();
    let phenomena = write(dir.path(), "phenomena.txt", "A C\n");
    let documents = write(dir.path(), "documents.txt", "A C\nC A\nA\n");
    let out_dir = dir.path().join("counts");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("chronotree");
    cmd.arg("count")
        .arg("--phenomena")
        .arg(&phenomena)
        .arg("--documents")
        .arg(&documents)
        .arg("--out-dir")
        .arg(&out_dir)
        .assert()
        .success();

    let biwords = out_dir.join("biword_assoc.dat");
    let monowords = out_dir.join("monoword_assoc.dat");
    assert_eq!(fs::read_to_string(&biwords).unwrap(), "A-C 2\n");
    assert_eq!(fs::read_to_string(&monowords).unwrap(), "A 1\nC 0\n");

    let inputs = inputs("A C\n");
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("chronotree");
    cmd.arg("build")
        .arg("--timestamps")
        .arg(&inputs.timestamps)
        .arg("--assoc")
        .arg(&biwords)
        .arg(&monowords)
        .arg("--lines")
        .arg(&inputs.lines)
        .assert()
        .success()
        .stdout("-root:0:1 \n\t-A:0:1 \n\t\t-C:0:0 \n\n");
}

#[test]
fn test_components_command() {
    let dir = TempDir::new().unwrap();
    let itemsets = write(dir.path(), "itemsets.txt", "a b 4\nc 2\nb d 1\n");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("chronotree");
    cmd.arg("components")
        .arg("--itemsets")
        .arg(&itemsets)
        .assert()
        .success()
        .stdout("a b d\nc\n");
}

#[test]
fn test_lifetime_command_writes_reports() {
    let dir = TempDir::new().unwrap();
    let phenomena = write(dir.path(), "consolidated.txt", "a b c\nx y\n");
    let daily = dir.path().join("daily");
    fs::create_dir_all(&daily).unwrap();
    write(&daily, "1.dat", "a *\nx y *\n");
    write(&daily, "4.dat", "a b c *\n");
    let out_dir = dir.path().join("out");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("chronotree");
    cmd.arg("lifetime")
        .arg("--phenomena")
        .arg(&phenomena)
        .arg("--daily-dir")
        .arg(&daily)
        .arg("--days")
        .arg("5")
        .arg("--out-dir")
        .arg(&out_dir)
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(out_dir.join("phen_lifetime.dat")).unwrap(),
        "Id:1 FDay:1 LDay:4 Dur:3\nId:2 FDay:1 LDay:1 Dur:0\n"
    );
    assert_eq!(
        fs::read_to_string(out_dir.join("delta_phen.dat")).unwrap(),
        "Id:1 Day:3 Len:2\n"
    );
}

#[test]
fn test_lifetime_missing_phenomena_fails() {
    let dir = TempDir::new().unwrap();
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("chronotree");
    cmd.arg("lifetime")
        .arg("--phenomena")
        .arg(dir.path().join("absent.txt"))
        .arg("--daily-dir")
        .arg(dir.path())
        .arg("--out-dir")
        .arg(dir.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("absent.txt"));
}

#[test]
fn test_split_command_writes_windows() {
    let dir = TempDir::new().unwrap();
    let input = write(
        dir.path(),
        "tweets.txt",
        "2012-10-01 06:30:00 #Rio #Gold\n2012-10-02 07:00:00 #Swim\n",
    );
    let out_dir = dir.path().join("windows");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("chronotree");
    cmd.arg("split")
        .arg("--input")
        .arg(&input)
        .arg("--start")
        .arg("2012/10/01-06:00:00")
        .arg("--window")
        .arg("0-12-0-0")
        .arg("--out-dir")
        .arg(&out_dir)
        .assert()
        .success();

    assert_eq!(fs::read_to_string(out_dir.join("1.dat")).unwrap(), "rio gold\n");
    assert_eq!(fs::read_to_string(out_dir.join("3.dat")).unwrap(), "swim\n");
    assert!(!out_dir.join("2.dat").exists());
}

#[test]
fn test_split_bad_record_reports_line() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "tweets.txt", "2012-10-01 06:30:00 #a\nlonely\n");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("chronotree");
    cmd.arg("split")
        .arg("--input")
        .arg(&input)
        .arg("--start")
        .arg("2012/10/01-06:00:00")
        .arg("--window")
        .arg("1-0-0-0")
        .arg("--out-dir")
        .arg(dir.path().join("windows"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("tweets.txt at line 2"));
}
