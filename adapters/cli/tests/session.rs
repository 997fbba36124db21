use std::{
    io::Write,
    process::{Command, Output, Stdio},
};

fn play(args: &[&str], input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_rogue"))
        .args(args)
        .env("RUST_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to launch rogue binary");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .expect("failed to send commands");
    child.wait_with_output().expect("rogue did not exit")
}

#[test]
fn quitting_ends_the_session() {
    let output = play(&["--seed", "7"], "x\nd\nq\n");

    assert!(output.status.success(), "rogue exited with {:?}", output.status);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Welcome to Rogue."));
    assert!(stdout.contains("Health : 10 / 10"));
    assert!(stdout.contains("is not a command"));
    assert!(stdout.trim_end().ends_with("Game Over"));
}

#[test]
fn closed_input_is_a_quit() {
    let output = play(&["--seed", "7"], "");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Game Over"));
}

#[test]
fn malformed_map_is_reported() {
    let map = std::env::temp_dir().join(format!("rogue-jagged-{}.txt", std::process::id()));
    std::fs::write(&map, "#<#\n#>\n").expect("write map");

    let output = play(&["--map", map.to_str().expect("utf-8 path")], "");
    let _ = std::fs::remove_file(&map);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to start level"), "stderr: {stderr}");
}
