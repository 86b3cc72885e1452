use super::{
    MAX_DEPTH, TYPE_COLOR, TYPE_DICT, TYPE_END, TYPE_END_ALT, TYPE_FLOAT32, TYPE_INT32,
    TYPE_INT64, TYPE_POINTER, TYPE_STRING, TYPE_UINT64, TYPE_WIDE_STRING, TaggedDict, Value,
    VdfError,
};

/// Decodes a complete binary VDF document.
///
/// The input must hold exactly one root dictionary including its end marker.
pub fn decode(data: &[u8]) -> Result<TaggedDict, VdfError> {
    let mut reader = Reader::new(data);
    let root = reader.read_dict(0)?;

    if reader.pos < data.len() {
        return Err(VdfError::TrailingData {
            offset: reader.pos,
            count: data.len() - reader.pos,
        });
    }
    Ok(root)
}

/// Cursor over an in-memory buffer.
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn read_dict(&mut self, depth: usize) -> Result<TaggedDict, VdfError> {
        if depth > MAX_DEPTH {
            return Err(VdfError::TooDeep { offset: self.pos });
        }

        let mut dict = TaggedDict::new();
        loop {
            let tag_offset = self.pos;
            let tag = self.read_u8()?;
            if tag == TYPE_END || tag == TYPE_END_ALT {
                return Ok(dict);
            }

            let key = self.read_cstr()?;
            let value = match tag {
                TYPE_DICT => Value::Dict(self.read_dict(depth + 1)?),
                TYPE_STRING => Value::String(self.read_cstr()?),
                TYPE_INT32 => Value::Int32(i32::from_le_bytes(self.read_array()?)),
                TYPE_FLOAT32 => Value::Float32(f32::from_le_bytes(self.read_array()?)),
                TYPE_POINTER => Value::Pointer(i32::from_le_bytes(self.read_array()?)),
                TYPE_WIDE_STRING => Value::WideString(self.read_wide_str()?),
                TYPE_COLOR => Value::Color(i32::from_le_bytes(self.read_array()?)),
                TYPE_UINT64 => Value::UInt64(u64::from_le_bytes(self.read_array()?)),
                TYPE_INT64 => Value::Int64(i64::from_le_bytes(self.read_array()?)),
                _ => {
                    return Err(VdfError::UnknownTag {
                        tag,
                        offset: tag_offset,
                    });
                }
            };
            dict.push(key, value);
        }
    }

    fn read_u8(&mut self) -> Result<u8, VdfError> {
        let b = *self
            .data
            .get(self.pos)
            .ok_or(VdfError::UnexpectedEof { offset: self.pos })?;
        self.pos += 1;
        Ok(b)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], VdfError> {
        let bytes = self
            .data
            .get(self.pos..self.pos + N)
            .ok_or(VdfError::UnexpectedEof {
                offset: self.data.len(),
            })?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        self.pos += N;
        Ok(out)
    }

    /// Reads a NUL-terminated UTF-8 string.
    fn read_cstr(&mut self) -> Result<String, VdfError> {
        let start = self.pos;
        let len = self.data[start..]
            .iter()
            .position(|&b| b == 0)
            .ok_or(VdfError::UnexpectedEof {
                offset: self.data.len(),
            })?;
        let s = std::str::from_utf8(&self.data[start..start + len])
            .map_err(|_| VdfError::InvalidUtf8 { offset: start })?;
        self.pos = start + len + 1;
        Ok(s.to_owned())
    }

    /// Reads a UTF-16LE string terminated by a zero code unit.
    fn read_wide_str(&mut self) -> Result<String, VdfError> {
        let start = self.pos;
        let mut units = Vec::new();
        loop {
            let unit = u16::from_le_bytes(self.read_array()?);
            if unit == 0 {
                break;
            }
            units.push(unit);
        }
        String::from_utf16(&units).map_err(|_| VdfError::InvalidUtf16 { offset: start })
    }
}
