#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

use svcpack_core::tool::{ToolOutput, ToolRunner};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Stands in for msdeploy: records each call and writes a small package
/// at the `-dest:package=` path.
#[derive(Default)]
pub struct FakeToolRunner {
    pub calls: RefCell<Vec<(PathBuf, Vec<String>)>>,
    /// Entries of the produced package; defaults to a typical Web Deploy layout
    pub entries: Vec<(String, Vec<u8>)>,
}

impl FakeToolRunner {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            entries: vec![
                ("archive.xml".to_string(), b"<MSDeploy.manifest />".to_vec()),
                ("systemInfo.xml".to_string(), b"<systemInfo />".to_vec()),
            ],
        }
    }
}

impl ToolRunner for FakeToolRunner {
    fn run(&self, program: &Path, args: &[String]) -> std::io::Result<ToolOutput> {
        self.calls
            .borrow_mut()
            .push((program.to_path_buf(), args.to_vec()));

        let package = args
            .iter()
            .find_map(|a| a.strip_prefix("-dest:package="))
            .map(|p| p.trim_matches('"'))
            .expect("package destination argument");
        let entries: Vec<(&str, &[u8], CompressionMethod)> = self
            .entries
            .iter()
            .map(|(n, c)| (n.as_str(), c.as_slice(), CompressionMethod::Deflated))
            .collect();
        std::fs::write(package, zip_bytes(&entries))?;

        Ok(ToolOutput {
            exit_code: Some(0),
            stdout: "Total changes: 1".to_string(),
            stderr: String::new(),
        })
    }
}

/// Build a zip archive in memory
pub fn zip_bytes(entries: &[(&str, &[u8], CompressionMethod)]) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut zip = ZipWriter::new(&mut buf);
        for (name, content, method) in entries {
            let options = SimpleFileOptions::default().compression_method(*method);
            zip.start_file(*name, options).expect("Failed to start file");
            zip.write_all(content).expect("Failed to write");
        }
        zip.finish().expect("Failed to finish zip");
    }
    buf.into_inner()
}

/// Name, compression method, raw compressed bytes and CRC of every entry
pub fn raw_entries(path: &Path) -> Vec<(String, CompressionMethod, Vec<u8>, u32)> {
    let bytes = std::fs::read(path).expect("Failed to read zip");
    let mut archive = ZipArchive::new(Cursor::new(bytes)).expect("Failed to open zip");
    (0..archive.len())
        .map(|i| {
            let mut file = archive.by_index_raw(i).expect("Failed to read entry");
            let mut raw = Vec::new();
            file.read_to_end(&mut raw).expect("Failed to read raw entry");
            (file.name().to_string(), file.compression(), raw, file.crc32())
        })
        .collect()
}

/// Decompressed content of one entry
pub fn entry_content(path: &Path, name: &str) -> Option<Vec<u8>> {
    let bytes = std::fs::read(path).expect("Failed to read zip");
    let mut archive = ZipArchive::new(Cursor::new(bytes)).expect("Failed to open zip");
    let mut file = archive.by_name(name).ok()?;
    let mut out = Vec::new();
    file.read_to_end(&mut out).expect("Failed to read entry");
    Some(out)
}
