// Shared test support: an in-memory BPS patch builder.
//
// The library deliberately has no patch creation API, so the tests
// assemble patches themselves. Well-formed commands build the expected
// target alongside the command stream; the `raw_*` methods emit bytes
// without touching it, for constructing deliberately broken patches.
// `build()` seals the stream with the three checksums (recomputed, so
// corruption tests must damage the patch *after* building).

#![allow(dead_code)]

use oxipatch::bps::varint;

pub struct PatchBuilder {
    source: Vec<u8>,
    metadata: Vec<u8>,
    body: Vec<u8>,
    target: Vec<u8>,
    source_position: usize,
    outread_position: usize,
    declared_source_size: Option<u64>,
    declared_target_size: Option<u64>,
}

impl PatchBuilder {
    pub fn new(source: &[u8]) -> Self {
        Self {
            source: source.to_vec(),
            metadata: Vec::new(),
            body: Vec::new(),
            target: Vec::new(),
            source_position: 0,
            outread_position: 0,
            declared_source_size: None,
            declared_target_size: None,
        }
    }

    pub fn metadata(&mut self, metadata: &[u8]) {
        self.metadata = metadata.to_vec();
    }

    /// Override the declared source size (defaults to the actual length).
    pub fn declared_source_size(&mut self, size: u64) {
        self.declared_source_size = Some(size);
    }

    /// Override the declared target size (defaults to the produced length).
    pub fn declared_target_size(&mut self, size: u64) {
        self.declared_target_size = Some(size);
    }

    // --- well-formed commands ------------------------------------------

    /// Lockstep copy from the source at the current output offset.
    pub fn source_read(&mut self, length: usize) {
        self.command(0, length as u64);
        let at = self.target.len();
        let bytes = self.source[at..at + length].to_vec();
        self.target.extend_from_slice(&bytes);
    }

    /// Literal bytes embedded in the patch.
    pub fn target_read(&mut self, literal: &[u8]) {
        self.command(1, literal.len() as u64);
        self.body.extend_from_slice(literal);
        self.target.extend_from_slice(literal);
    }

    /// Relative copy from the source.
    pub fn source_copy(&mut self, offset: i64, length: usize) {
        self.command(2, length as u64);
        self.signed(offset);
        let at = shift(self.source_position, offset);
        let bytes = self.source[at..at + length].to_vec();
        self.target.extend_from_slice(&bytes);
        self.source_position = at + length;
    }

    /// Relative copy from the output produced so far. Reproduces the
    /// overlapping-run semantics byte by byte.
    pub fn target_copy(&mut self, offset: i64, length: usize) {
        self.command(3, length as u64);
        self.signed(offset);
        let mut at = shift(self.outread_position, offset);
        for _ in 0..length {
            let byte = self.target[at];
            self.target.push(byte);
            at += 1;
        }
        self.outread_position = at;
    }

    // --- raw emission (for malformed patches) --------------------------

    pub fn raw_command(&mut self, tag: u8, length: u64) {
        self.command(tag, length);
    }

    pub fn raw_signed(&mut self, offset: i64) {
        self.signed(offset);
    }

    pub fn raw_bytes(&mut self, bytes: &[u8]) {
        self.body.extend_from_slice(bytes);
    }

    // --- accessors ------------------------------------------------------

    pub fn expected_target(&self) -> &[u8] {
        &self.target
    }

    pub fn target_len(&self) -> usize {
        self.target.len()
    }

    pub fn source_len(&self) -> usize {
        self.source.len()
    }

    pub fn source_position(&self) -> usize {
        self.source_position
    }

    pub fn outread_position(&self) -> usize {
        self.outread_position
    }

    // --- assembly -------------------------------------------------------

    pub fn build(&self) -> Vec<u8> {
        let source_size = self
            .declared_source_size
            .unwrap_or(self.source.len() as u64);
        let target_size = self
            .declared_target_size
            .unwrap_or(self.target.len() as u64);

        let mut patch = b"BPS1".to_vec();
        varint::write_u64(&mut patch, source_size).unwrap();
        varint::write_u64(&mut patch, target_size).unwrap();
        varint::write_usize(&mut patch, self.metadata.len()).unwrap();
        patch.extend_from_slice(&self.metadata);
        patch.extend_from_slice(&self.body);
        patch.extend_from_slice(&crc32fast::hash(&self.source).to_le_bytes());
        patch.extend_from_slice(&crc32fast::hash(&self.target).to_le_bytes());
        let self_crc = crc32fast::hash(&patch);
        patch.extend_from_slice(&self_crc.to_le_bytes());
        patch
    }

    fn command(&mut self, tag: u8, length: u64) {
        varint::write_u64(&mut self.body, ((length - 1) << 2) | u64::from(tag)).unwrap();
    }

    fn signed(&mut self, offset: i64) {
        let raw = (offset.unsigned_abs() << 1) | u64::from(offset < 0);
        varint::write_u64(&mut self.body, raw).unwrap();
    }
}

fn shift(position: usize, offset: i64) -> usize {
    if offset < 0 {
        position - offset.unsigned_abs() as usize
    } else {
        position + offset as usize
    }
}

pub fn hex_to_bytes(s: &str) -> Vec<u8> {
    let s = s.trim();
    if s.is_empty() {
        return Vec::new();
    }
    assert!(s.len().is_multiple_of(2), "hex string must have even length");
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
        .collect()
}
