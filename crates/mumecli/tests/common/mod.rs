#![allow(dead_code)]

use assert_cmd::Command;
use std::path::Path;

/// A format-1 file with one named track per `(name, pitches)`, quarter notes
/// from tick 0, in C major.
pub fn smf(tracks: &[(&str, &[u8])]) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(b"MThd");
    buf.extend_from_slice(&6u32.to_be_bytes());
    buf.extend_from_slice(&1u16.to_be_bytes());
    buf.extend_from_slice(&(tracks.len() as u16).to_be_bytes());
    buf.extend_from_slice(&480u16.to_be_bytes());

    for (channel, (name, pitches)) in tracks.iter().enumerate() {
        let mut data = Vec::new();
        data.extend_from_slice(&[0x00, 0xFF, 0x03, name.len() as u8]);
        data.extend_from_slice(name.as_bytes());
        data.extend_from_slice(&[0x00, 0xFF, 0x59, 0x02, 0x00, 0x00]);
        for &pitch in pitches.iter() {
            let ch = channel as u8 & 0x07;
            data.extend_from_slice(&[0x00, 0x90 | ch, pitch, 100]);
            // 480 ticks as a two-byte VLQ
            data.extend_from_slice(&[0x83, 0x60, 0x80 | ch, pitch, 0]);
        }
        data.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x00]);

        buf.extend_from_slice(b"MTrk");
        buf.extend_from_slice(&(data.len() as u32).to_be_bytes());
        buf.extend_from_slice(&data);
    }
    buf
}

/// Two melodies and a two-voice chorale.
pub fn write_corpus(dir: &Path) {
    std::fs::write(dir.join("M1.mid"), smf(&[("Melody", &[60, 64, 67, 72, 67, 64, 60])])).unwrap();
    std::fs::write(dir.join("M2.mid"), smf(&[("Melody", &[62, 60])])).unwrap();
    std::fs::write(
        dir.join("H1.mid"),
        smf(&[("S", &[67, 65, 64, 60]), ("B", &[48, 55, 57, 48])]),
    )
    .unwrap();
}

/// The binary with the environment scrubbed of config overrides.
pub fn mumecli(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("mumecli").unwrap();
    for var in [
        "MUME_CORPUS_DIR",
        "MUME_HARMONY_PATTERN",
        "MUME_LOG_LEVEL",
        "MUME_LOG_FILE",
        "MUME_SEED",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd.arg("--config").arg(config);
    cmd
}
