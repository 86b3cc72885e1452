use super::{TYPE_END, TaggedDict, Value, VdfError};

/// Encodes a dictionary as a complete binary VDF document.
pub fn encode(dict: &TaggedDict) -> Result<Vec<u8>, VdfError> {
    let mut out = Vec::new();
    encode_into(dict, &mut out)?;
    Ok(out)
}

/// Appends the encoding of `dict`, including its end marker, to `out`.
pub fn encode_into(dict: &TaggedDict, out: &mut Vec<u8>) -> Result<(), VdfError> {
    for (key, value) in dict.entries() {
        out.push(value.type_tag());
        write_cstr(out, key)?;

        match value {
            Value::Dict(inner) => encode_into(inner, out)?,
            Value::String(s) => write_cstr(out, s)?,
            Value::WideString(s) => write_wide_str(out, s)?,
            Value::Int32(v) | Value::Pointer(v) | Value::Color(v) => {
                out.extend_from_slice(&v.to_le_bytes())
            }
            Value::Float32(v) => out.extend_from_slice(&v.to_le_bytes()),
            Value::UInt64(v) => out.extend_from_slice(&v.to_le_bytes()),
            Value::Int64(v) => out.extend_from_slice(&v.to_le_bytes()),
        }
    }
    out.push(TYPE_END);
    Ok(())
}

fn write_cstr(out: &mut Vec<u8>, s: &str) -> Result<(), VdfError> {
    if s.contains('\0') {
        return Err(VdfError::EmbeddedNul(s.to_owned()));
    }
    out.extend_from_slice(s.as_bytes());
    out.push(0x00);
    Ok(())
}

fn write_wide_str(out: &mut Vec<u8>, s: &str) -> Result<(), VdfError> {
    if s.contains('\0') {
        return Err(VdfError::EmbeddedNul(s.to_owned()));
    }
    for unit in s.encode_utf16() {
        out.extend_from_slice(&unit.to_le_bytes());
    }
    out.extend_from_slice(&[0x00, 0x00]);
    Ok(())
}
