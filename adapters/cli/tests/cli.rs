use std::{fs, path::PathBuf, process::Command};

const SKIRMISH: &str = "\
#######
#.G...#
#...EG#
#.#.#G#
#..G#E#
#.....#
#######
";

fn scratch_file(name: &str, contents: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("beverage-bandits-cli-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("failed to create scratch directory");
    let path = dir.join(name);
    fs::write(&path, contents).expect("failed to write scratch file");
    path
}

fn run(args: &[&str]) -> (bool, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_beverage-bandits"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to invoke beverage-bandits binary");
    (
        output.status.success(),
        String::from_utf8_lossy(&output.stdout).into_owned(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
    )
}

#[test]
fn reports_battle_outcome() {
    let layout = scratch_file("skirmish.txt", SKIRMISH);

    let (success, stdout, _) = run(&[layout.to_str().expect("utf-8 path")]);

    assert!(success);
    assert!(stdout.contains("Combat ends after 47 full rounds"), "{stdout}");
    assert!(stdout.contains("Goblins win with 590 total hit points left"), "{stdout}");
    assert!(stdout.contains("Outcome: 47 * 590 = 27730"), "{stdout}");
}

#[test]
fn config_file_and_flags_set_attack_power() {
    let layout = scratch_file("skirmish-config.txt", SKIRMISH);
    let config = scratch_file("powers.toml", "[attack_power]\nelf = 3\n");

    let (success, stdout, _) = run(&[
        layout.to_str().expect("utf-8 path"),
        "--config",
        config.to_str().expect("utf-8 path"),
        "--elf-power",
        "15",
    ]);

    assert!(success);
    assert!(stdout.contains("Outcome: 29 * 172 = 4988"), "{stdout}");
}

#[test]
fn finds_flawless_elf_power() {
    let layout = scratch_file("skirmish-search.txt", SKIRMISH);

    let (success, stdout, _) = run(&[
        layout.to_str().expect("utf-8 path"),
        "--find-flawless",
        "elf",
    ]);

    assert!(success);
    assert!(stdout.contains("Elves win without losses at attack power 15"), "{stdout}");
    assert!(stdout.contains("Outcome: 29 * 172 = 4988"), "{stdout}");
}

#[test]
fn ragged_layout_fails_with_context() {
    let layout = scratch_file("ragged.txt", "#####\n#E.G#\n####\n");

    let (success, _, stderr) = run(&[layout.to_str().expect("utf-8 path")]);

    assert!(!success);
    assert!(stderr.contains("invalid layout"), "{stderr}");
}
