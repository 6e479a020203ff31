#![allow(dead_code)]

use std::fs;
use std::path::Path;

pub const NAMES: &str = "person\nbicycle\ncar\n";

/// A PNG signature and IHDR chunk, enough for header-only size probing.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(33);
    bytes.extend_from_slice(&[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
    bytes.extend_from_slice(&13u32.to_be_bytes());
    bytes.extend_from_slice(b"IHDR");
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&height.to_be_bytes());
    bytes.extend_from_slice(&[8, 2, 0, 0, 0]);
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    bytes
}

pub fn write_png(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, png_bytes(width, height)).expect("write png file");
}

pub fn write_names(path: &Path) {
    fs::write(path, NAMES).expect("write names file");
}

/// Three labeled images and one without labels:
///
/// - `a.png` 1000x800 with two boxes
/// - `b.png` 200x100 with one box
/// - `c.png` 50x50 with an empty label file
/// - `d.png` without a label file
pub fn create_image_dir(root: &Path) {
    write_png(&root.join("a.png"), 1000, 800);
    write_png(&root.join("b.png"), 200, 100);
    write_png(&root.join("c.png"), 50, 50);
    write_png(&root.join("d.png"), 10, 10);

    fs::write(root.join("a.txt"), "2 0.5 0.5 0.2 0.4\n0 0.1 0.1 0.1 0.1\n")
        .expect("write a labels");
    fs::write(root.join("b.txt"), "1 0.25 0.25 0.1 0.1\n").expect("write b labels");
    fs::write(root.join("c.txt"), "").expect("write c labels");
    write_names(&root.join("obj.names"));
}

pub fn read(path: &Path) -> String {
    fs::read_to_string(path).expect("read file")
}
