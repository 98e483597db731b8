use std::io::{self, Cursor, Read, Seek, SeekFrom};

pub fn remaining(cursor: &Cursor<&[u8]>) -> u64 {
    (cursor.get_ref().len() as u64).saturating_sub(cursor.position())
}

pub fn read_u8(cursor: &mut Cursor<&[u8]>) -> io::Result<u8> {
    if remaining(cursor) < 1 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "End of buffer reached",
        ));
    }

    let mut buf = [0u8; 1];
    cursor.read_exact(&mut buf)?;
    Ok(buf[0])
}

pub fn read_i32_le(cursor: &mut Cursor<&[u8]>) -> io::Result<i32> {
    if remaining(cursor) < 4 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "End of buffer reached or not enough bytes for i32",
        ));
    }

    let mut buf = [0u8; 4];
    cursor.read_exact(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

/// Advance the cursor by `count` bytes without reading them.
pub fn skip(cursor: &mut Cursor<&[u8]>, count: u64) -> io::Result<()> {
    if remaining(cursor) < count {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("Not enough bytes remaining to skip {}", count),
        ));
    }

    cursor.seek(SeekFrom::Current(count as i64))?;
    Ok(())
}

pub fn seek_to(cursor: &mut Cursor<&[u8]>, position: u64) -> io::Result<()> {
    if position > cursor.get_ref().len() as u64 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "Cannot seek to position {} (buffer length: {})",
                position,
                cursor.get_ref().len()
            ),
        ));
    }

    cursor.seek(SeekFrom::Start(position))?;
    Ok(())
}
