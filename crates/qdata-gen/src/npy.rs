//! NumPy `.npy` encoding of the dataset containers.
//!
//! A dataset file is four `.npy` blocks back to back. Each block is
//!
//! ```text
//!   \x93NUMPY | major minor | header_len (u16 LE) | header dict + padding + \n | data
//! ```
//!
//! with the header padded by spaces so the data starts aligned, as
//! `numpy.save` does. Calling `numpy.load` four times on one open handle reads the
//! arrays back in order.
//!
//! Labeled containers use a packed structured dtype so the label travels
//! with its record; they are encoded here. Unlabeled containers are plain
//! 2-D arrays written with `ndarray-npy`. Reading is done here for all four,
//! since one stream holds several arrays back to back.

use std::io::{self, Read, Write};

use ndarray::Array2;
use ndarray_npy::{WritableElement, WriteNpyExt};
use num_complex::Complex64;
use tracing::debug;

use crate::error::{GenError, GenResult};
use crate::state::{BlochRecord, BlochVector, Label, QubitState, StateRecord};

const MAGIC: &[u8; 6] = b"\x93NUMPY";
const ALIGN: usize = 64;
/// magic + version + u16 header length
const PREAMBLE_V1: usize = 10;

/// Position and layout of one array in a dataset file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayKind {
    LabeledStates,
    LabeledBloch,
    UnlabeledStates,
    UnlabeledBloch,
}

impl ArrayKind {
    /// Order in which arrays appear in a file.
    pub const ORDER: [ArrayKind; 4] = [
        ArrayKind::LabeledStates,
        ArrayKind::LabeledBloch,
        ArrayKind::UnlabeledStates,
        ArrayKind::UnlabeledBloch,
    ];

    /// Short name used in logs and errors.
    pub fn name(self) -> &'static str {
        match self {
            ArrayKind::LabeledStates => "labeled_states",
            ArrayKind::LabeledBloch => "labeled_bloch",
            ArrayKind::UnlabeledStates => "unlabeled_states",
            ArrayKind::UnlabeledBloch => "unlabeled_bloch",
        }
    }

    /// Whether records carry an `<i8` label field.
    pub fn is_labeled(self) -> bool {
        matches!(self, ArrayKind::LabeledStates | ArrayKind::LabeledBloch)
    }

    /// Value of the `descr` key, as a Python literal.
    pub fn descr(self) -> &'static str {
        match self {
            ArrayKind::LabeledStates => "[('amplitudes', '<c16', (2,)), ('label', '<i8')]",
            ArrayKind::LabeledBloch => "[('coords', '<f8', (3,)), ('label', '<i8')]",
            ArrayKind::UnlabeledStates => "'<c16'",
            ArrayKind::UnlabeledBloch => "'<f8'",
        }
    }

    /// Scalar components per record: complex amplitudes or real coordinates.
    fn components(self) -> usize {
        match self {
            ArrayKind::LabeledStates | ArrayKind::UnlabeledStates => 2,
            ArrayKind::LabeledBloch | ArrayKind::UnlabeledBloch => 3,
        }
    }

    /// Bytes per record.
    pub fn record_size(self) -> usize {
        let scalar = match self {
            ArrayKind::LabeledStates | ArrayKind::UnlabeledStates => 16,
            ArrayKind::LabeledBloch | ArrayKind::UnlabeledBloch => 8,
        };
        let label = if self.is_labeled() { 8 } else { 0 };
        self.components() * scalar + label
    }

    fn shape(self, len: usize) -> Vec<usize> {
        if self.is_labeled() {
            vec![len]
        } else {
            vec![len, self.components()]
        }
    }
}

/// Parsed `.npy` header.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub descr: String,
    pub fortran_order: bool,
    pub shape: Vec<usize>,
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Write an amplitude container as one `.npy` block.
///
/// Labels of records written to an unlabeled layout are dropped.
pub fn write_states<W: Write>(
    writer: &mut W,
    kind: ArrayKind,
    records: &[StateRecord],
) -> GenResult<usize> {
    if !kind.is_labeled() {
        let array = Array2::from_shape_fn((records.len(), kind.components()), |(i, j)| {
            records[i].amplitudes.amplitudes()[j]
        });
        return write_plain(writer, kind, &array);
    }
    let mut data = Vec::with_capacity(records.len() * kind.record_size());
    for (index, record) in records.iter().enumerate() {
        for amp in record.amplitudes.amplitudes() {
            data.extend_from_slice(&amp.re.to_le_bytes());
            data.extend_from_slice(&amp.im.to_le_bytes());
        }
        push_label(&mut data, kind, record.label, index)?;
    }
    write_block(writer, kind, records.len(), &data)
}

/// Write a Bloch container as one `.npy` block.
pub fn write_bloch<W: Write>(
    writer: &mut W,
    kind: ArrayKind,
    records: &[BlochRecord],
) -> GenResult<usize> {
    if !kind.is_labeled() {
        let array = Array2::from_shape_fn((records.len(), kind.components()), |(i, j)| {
            records[i].coords.coords()[j]
        });
        return write_plain(writer, kind, &array);
    }
    let mut data = Vec::with_capacity(records.len() * kind.record_size());
    for (index, record) in records.iter().enumerate() {
        for c in record.coords.coords() {
            data.extend_from_slice(&c.to_le_bytes());
        }
        push_label(&mut data, kind, record.label, index)?;
    }
    write_block(writer, kind, records.len(), &data)
}

/// Plain 2-D layouts go through `ndarray-npy`; returns the number of bytes written.
fn write_plain<W: Write, A: WritableElement>(
    writer: &mut W,
    kind: ArrayKind,
    array: &Array2<A>,
) -> GenResult<usize> {
    let mut block = Vec::new();
    array.write_npy(&mut block)?;
    writer.write_all(&block)?;
    debug!(
        array = kind.name(),
        records = array.nrows(),
        bytes = block.len(),
        "wrote npy block"
    );
    Ok(block.len())
}

fn push_label(
    data: &mut Vec<u8>,
    kind: ArrayKind,
    label: Option<Label>,
    index: usize,
) -> GenResult<()> {
    if !kind.is_labeled() {
        return Ok(());
    }
    let label = label.ok_or(GenError::MissingLabel {
        array: kind.name(),
        index,
    })?;
    data.extend_from_slice(&label.as_i64().to_le_bytes());
    Ok(())
}

/// Returns the number of bytes written.
fn write_block<W: Write>(
    writer: &mut W,
    kind: ArrayKind,
    len: usize,
    data: &[u8],
) -> GenResult<usize> {
    let header = encode_header(kind.descr(), &kind.shape(len));
    writer.write_all(&header)?;
    writer.write_all(data)?;
    debug!(
        array = kind.name(),
        records = len,
        bytes = header.len() + data.len(),
        "wrote npy block"
    );
    Ok(header.len() + data.len())
}

/// Encode a v1.0 preamble and header, padded so the data is 64-byte aligned.
pub fn encode_header(descr: &str, shape: &[usize]) -> Vec<u8> {
    let dict = format!(
        "{{'descr': {descr}, 'fortran_order': False, 'shape': {}, }}",
        format_shape(shape)
    );
    // +1 for the terminating newline.
    let unpadded = PREAMBLE_V1 + dict.len() + 1;
    let padding = (ALIGN - unpadded % ALIGN) % ALIGN;
    let header_len = dict.len() + padding + 1;

    let mut out = Vec::with_capacity(PREAMBLE_V1 + header_len);
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&[1, 0]);
    // Our headers are well under 64 KiB.
    out.extend_from_slice(&(header_len as u16).to_le_bytes());
    out.extend_from_slice(dict.as_bytes());
    out.resize(out.len() + padding, b' ');
    out.push(b'\n');
    out
}

/// Python tuple literal: `(3,)`, `(4, 2)`.
fn format_shape(shape: &[usize]) -> String {
    match shape {
        [single] => format!("({single},)"),
        dims => {
            let parts: Vec<String> = dims.iter().map(ToString::to_string).collect();
            format!("({})", parts.join(", "))
        }
    }
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Read one amplitude container written by [`write_states`].
pub fn read_states<R: Read>(reader: &mut R, kind: ArrayKind) -> GenResult<Vec<StateRecord>> {
    let data = read_block(reader, kind)?;
    data.chunks_exact(kind.record_size())
        .map(|chunk| {
            let a = Complex64::new(f64_at(chunk, 0), f64_at(chunk, 8));
            let b = Complex64::new(f64_at(chunk, 16), f64_at(chunk, 24));
            Ok(StateRecord {
                amplitudes: QubitState::new(a, b),
                label: read_label(chunk, 32, kind)?,
            })
        })
        .collect()
}

/// Read one Bloch container written by [`write_bloch`].
pub fn read_bloch<R: Read>(reader: &mut R, kind: ArrayKind) -> GenResult<Vec<BlochRecord>> {
    let data = read_block(reader, kind)?;
    data.chunks_exact(kind.record_size())
        .map(|chunk| {
            Ok(BlochRecord {
                coords: BlochVector::new(f64_at(chunk, 0), f64_at(chunk, 8), f64_at(chunk, 16)),
                label: read_label(chunk, 24, kind)?,
            })
        })
        .collect()
}

fn read_label(chunk: &[u8], offset: usize, kind: ArrayKind) -> GenResult<Option<Label>> {
    if !kind.is_labeled() {
        return Ok(None);
    }
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&chunk[offset..offset + 8]);
    let value = i64::from_le_bytes(raw);
    Label::from_i64(value).map(Some).ok_or_else(|| GenError::Format {
        array: kind.name(),
        reason: format!("label must be 0 or 1, got {value}"),
    })
}

fn f64_at(chunk: &[u8], offset: usize) -> f64 {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&chunk[offset..offset + 8]);
    f64::from_le_bytes(raw)
}

/// Read a header, check it against `kind`, and return the raw data bytes.
fn read_block<R: Read>(reader: &mut R, kind: ArrayKind) -> GenResult<Vec<u8>> {
    let header = read_header(reader, kind)?;

    if normalize(&header.descr) != normalize(kind.descr()) {
        return Err(format_err(
            kind,
            format!("expected dtype {}, found {}", kind.descr(), header.descr),
        ));
    }
    if header.fortran_order {
        return Err(format_err(kind, "Fortran-ordered arrays are not supported"));
    }
    let expected_rank = kind.shape(0).len();
    if header.shape.len() != expected_rank {
        return Err(format_err(
            kind,
            format!("expected rank {expected_rank}, found shape {:?}", header.shape),
        ));
    }
    if !kind.is_labeled() && header.shape[1] != kind.components() {
        return Err(format_err(
            kind,
            format!(
                "expected {} columns, found shape {:?}",
                kind.components(),
                header.shape
            ),
        ));
    }

    let len = header.shape[0];
    let expected = len
        .checked_mul(kind.record_size())
        .ok_or_else(|| format_err(kind, "shape too large"))?;
    // Allocation follows the bytes present, not the claimed shape.
    let mut data = Vec::new();
    reader
        .by_ref()
        .take(expected as u64)
        .read_to_end(&mut data)?;
    if data.len() != expected {
        return Err(format_err(kind, "truncated data"));
    }
    debug!(array = kind.name(), records = len, "read npy block");
    Ok(data)
}

/// Read the preamble and header dict of the next block.
pub fn read_header<R: Read>(reader: &mut R, kind: ArrayKind) -> GenResult<Header> {
    let mut magic = [0u8; 6];
    read_exact_or_truncated(reader, &mut magic, kind, "magic")?;
    if &magic != MAGIC {
        return Err(format_err(kind, "not an npy block (bad magic)"));
    }

    let mut version = [0u8; 2];
    read_exact_or_truncated(reader, &mut version, kind, "version")?;

    // Header length field: 2 bytes in v1, 4 bytes in v2 and v3.
    let header_len = match version[0] {
        1 => {
            let mut buf = [0u8; 2];
            read_exact_or_truncated(reader, &mut buf, kind, "header length")?;
            u16::from_le_bytes(buf) as usize
        }
        2 | 3 => {
            let mut buf = [0u8; 4];
            read_exact_or_truncated(reader, &mut buf, kind, "header length")?;
            u32::from_le_bytes(buf) as usize
        }
        major => {
            return Err(format_err(
                kind,
                format!("unsupported format version {major}.{}", version[1]),
            ));
        }
    };

    let mut raw = vec![0u8; header_len];
    read_exact_or_truncated(reader, &mut raw, kind, "header")?;
    let text = String::from_utf8_lossy(&raw);
    parse_header(&text).map_err(|reason| format_err(kind, reason))
}

/// Parse the header dict, e.g.
/// `{'descr': '<f8', 'fortran_order': False, 'shape': (10, 3), }`.
pub fn parse_header(text: &str) -> Result<Header, String> {
    let descr = value_after(text, "'descr':")?;
    let descr = if descr.starts_with('[') {
        let end = matching_bracket(descr).ok_or("unterminated descr list")?;
        &descr[..=end]
    } else if let Some(rest) = descr.strip_prefix('\'') {
        let end = rest.find('\'').ok_or("unterminated descr string")?;
        &descr[..end + 2]
    } else {
        return Err(format!("unrecognised descr: {descr}"));
    };

    let fortran = value_after(text, "'fortran_order':")?;
    let fortran_order = if fortran.starts_with("True") {
        true
    } else if fortran.starts_with("False") {
        false
    } else {
        return Err("fortran_order must be True or False".to_string());
    };

    let shape_text = value_after(text, "'shape':")?;
    let shape_text = shape_text
        .strip_prefix('(')
        .and_then(|s| s.find(')').map(|end| &s[..end]))
        .ok_or("shape must be a tuple")?;
    let shape = shape_text
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<usize>().map_err(|e| format!("bad shape entry '{s}': {e}")))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Header {
        descr: descr.to_string(),
        fortran_order,
        shape,
    })
}

fn value_after<'a>(text: &'a str, key: &str) -> Result<&'a str, String> {
    text.find(key)
        .map(|pos| text[pos + key.len()..].trim_start())
        .ok_or_else(|| format!("header has no {key} key"))
}

/// Index of the `]` closing the `[` at position 0.
fn matching_bracket(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, ch) in text.char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn normalize(descr: &str) -> String {
    descr
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == '"' { '\'' } else { c })
        .collect()
}

fn read_exact_or_truncated<R: Read>(
    reader: &mut R,
    buf: &mut [u8],
    kind: ArrayKind,
    what: &str,
) -> GenResult<()> {
    match reader.read_exact(buf) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            Err(format_err(kind, format!("truncated {what}")))
        }
        Err(e) => Err(e.into()),
    }
}

fn format_err(kind: ArrayKind, reason: impl Into<String>) -> GenError {
    GenError::Format {
        array: kind.name(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Angles;

    #[test]
    fn test_header_is_aligned() {
        for kind in ArrayKind::ORDER {
            for len in [0, 1, 10, 123_456] {
                let header = encode_header(kind.descr(), &kind.shape(len));
                assert_eq!(header.len() % ALIGN, 0, "{kind:?} len={len}");
                assert_eq!(header.last(), Some(&b'\n'));
            }
        }
    }

    #[test]
    fn test_header_text() {
        let header = encode_header("'<f8'", &[10, 3]);
        let text = String::from_utf8_lossy(&header[PREAMBLE_V1..]);
        assert!(text.starts_with("{'descr': '<f8', 'fortran_order': False, 'shape': (10, 3), }"));
        assert_eq!(&header[..6], MAGIC);
        assert_eq!(&header[6..8], &[1, 0]);
    }

    #[test]
    fn test_parse_structured_header() {
        let header = parse_header(
            "{'descr': [('amplitudes', '<c16', (2,)), ('label', '<i8')], 'fortran_order': False, 'shape': (20,), }",
        )
        .unwrap();
        assert_eq!(header.descr, ArrayKind::LabeledStates.descr());
        assert!(!header.fortran_order);
        assert_eq!(header.shape, vec![20]);
    }

    #[test]
    fn test_parse_header_missing_shape() {
        let err = parse_header("{'descr': '<f8', 'fortran_order': False, }").unwrap_err();
        assert!(err.contains("'shape'"));
    }

    #[test]
    fn test_record_sizes() {
        assert_eq!(ArrayKind::LabeledStates.record_size(), 40);
        assert_eq!(ArrayKind::LabeledBloch.record_size(), 32);
        assert_eq!(ArrayKind::UnlabeledStates.record_size(), 32);
        assert_eq!(ArrayKind::UnlabeledBloch.record_size(), 24);
    }

    #[test]
    fn test_labeled_block_layout() {
        let record = StateRecord {
            amplitudes: Angles::new(0.0, 0.0).state(),
            label: Some(Label::One),
        };
        let mut buf = Vec::new();
        let written = write_states(&mut buf, ArrayKind::LabeledStates, &[record]).unwrap();
        assert_eq!(written, buf.len());
        assert_eq!(buf.len(), 128 + 40);
        // a = 1 + 0i
        assert_eq!(&buf[128..136], &1.0f64.to_le_bytes());
        // label field closes the record
        assert_eq!(&buf[160..168], &1i64.to_le_bytes());
    }

    #[test]
    fn test_missing_label_rejected() {
        let record = BlochRecord {
            coords: BlochVector::new(0.0, 0.0, 1.0),
            label: None,
        };
        let mut buf = Vec::new();
        let err = write_bloch(&mut buf, ArrayKind::LabeledBloch, &[record]).unwrap_err();
        assert!(matches!(err, GenError::MissingLabel { index: 0, .. }));
    }

    #[test]
    fn test_wrong_position_rejected() {
        let mut buf = Vec::new();
        write_bloch(&mut buf, ArrayKind::UnlabeledBloch, &[]).unwrap();
        let err = read_states(&mut buf.as_slice(), ArrayKind::UnlabeledStates).unwrap_err();
        assert!(err.to_string().contains("expected dtype"));
    }

    #[test]
    fn test_truncated_data() {
        let record = BlochRecord {
            coords: BlochVector::new(1.0, 0.0, 0.0),
            label: None,
        };
        let mut buf = Vec::new();
        write_bloch(&mut buf, ArrayKind::UnlabeledBloch, &[record, record]).unwrap();
        buf.truncate(buf.len() - 4);
        let err = read_bloch(&mut buf.as_slice(), ArrayKind::UnlabeledBloch).unwrap_err();
        assert!(err.to_string().contains("truncated data"));
    }

    #[test]
    fn test_oversized_shape_rejected() {
        let mut buf = encode_header(ArrayKind::LabeledStates.descr(), &[usize::MAX / 8]);
        buf.extend_from_slice(&[0u8; 40]);
        let err = read_states(&mut buf.as_slice(), ArrayKind::LabeledStates).unwrap_err();
        assert!(err.to_string().contains("shape too large"), "{err}");
    }

    #[test]
    fn test_claimed_length_beyond_stream() {
        let mut buf = encode_header(ArrayKind::LabeledBloch.descr(), &[1 << 40]);
        buf.extend_from_slice(&[0u8; 32]);
        let err = read_bloch(&mut buf.as_slice(), ArrayKind::LabeledBloch).unwrap_err();
        assert!(err.to_string().contains("truncated data"), "{err}");
    }

    #[test]
    fn test_plain_block_via_ndarray_npy() {
        let records = [
            BlochRecord {
                coords: BlochVector::new(1.0, 0.0, 0.0),
                label: None,
            },
            BlochRecord {
                coords: BlochVector::new(0.0, 0.0, -1.0),
                label: None,
            },
        ];
        let mut buf = Vec::new();
        let written = write_bloch(&mut buf, ArrayKind::UnlabeledBloch, &records).unwrap();
        assert_eq!(written, buf.len());

        let header = read_header(&mut buf.as_slice(), ArrayKind::UnlabeledBloch).unwrap();
        assert_eq!(normalize(&header.descr), normalize(ArrayKind::UnlabeledBloch.descr()));
        assert_eq!(header.shape, vec![2, 3]);
        assert!(!header.fortran_order);

        let back = read_bloch(&mut buf.as_slice(), ArrayKind::UnlabeledBloch).unwrap();
        assert_eq!(back, records);
    }

    #[test]
    fn test_bad_label_value() {
        let record = BlochRecord {
            coords: BlochVector::new(0.0, 0.0, 1.0),
            label: Some(Label::Zero),
        };
        let mut buf = Vec::new();
        write_bloch(&mut buf, ArrayKind::LabeledBloch, &[record]).unwrap();
        let label_at = buf.len() - 8;
        buf[label_at..].copy_from_slice(&7i64.to_le_bytes());
        let err = read_bloch(&mut buf.as_slice(), ArrayKind::LabeledBloch).unwrap_err();
        assert!(err.to_string().contains("got 7"));
    }

    #[test]
    fn test_bad_magic() {
        let buf = b"PK\x03\x04 not numpy at all".to_vec();
        let err = read_header(&mut buf.as_slice(), ArrayKind::LabeledStates).unwrap_err();
        assert!(err.to_string().contains("bad magic"));
    }
}
