//! YAML and JSON output

use crate::domain::Manifest;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::io::{self, Write};

/// Write the manifest as YAML
pub fn write_yaml(manifest: &Manifest, out: &mut dyn Write) -> io::Result<()> {
    let yaml = serde_yaml::to_string(manifest).map_err(io::Error::other)?;
    out.write_all(yaml.as_bytes())
}

/// Write the manifest as JSON indented by four spaces
pub fn write_json(manifest: &Manifest, out: &mut dyn Write) -> io::Result<()> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    manifest.serialize(&mut ser).map_err(io::Error::other)?;
    buf.push(b'\n');
    out.write_all(&buf)
}
